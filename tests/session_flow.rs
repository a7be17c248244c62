mod support;

use std::sync::Arc;

use content_source::{StaticContentSource, UnavailableContentSource};
use cyberterm::runtime::persistence::{BANNER_SHOWN_KEY, COMMAND_HISTORY_KEY, HISTORY_KEY};
use cyberterm::runtime::rescue::RESCUE_BANNER;
use cyberterm::runtime::session::WELCOME_BANNER;
use cyberterm::{
    Clock, GameKind, HostPlatform, Key, KeyEvent, PowerAction, RescueControl, RescueMode,
    TerminalSession,
};
use pretty_assertions::assert_eq;
use session_store::{FileStore, KeyValueStore, MemoryStore};
use support::{manual_clock, session, session_with, HostCall, HostSpy};
use time::Duration;

fn submit(
    session: &mut TerminalSession<MemoryStore>,
    line: &str,
    host: &mut HostSpy,
    rescue: &mut RescueMode,
) {
    session.on_input_replace(line.to_string());
    session.on_submit(host, rescue);
}

#[test]
fn first_run_seeds_the_banner_once() {
    let session = TerminalSession::new(MemoryStore::new(), HostPlatform::Other, manual_clock());
    assert_eq!(session.history(), [WELCOME_BANNER.to_string()]);
    assert_eq!(session.persistence().store().get(BANNER_SHOWN_KEY), Some("true"));
}

#[test]
fn banner_is_not_reseeded_when_history_is_missing_but_flag_set() {
    let mut store = MemoryStore::new();
    store.persist(BANNER_SHOWN_KEY, "true").expect("memory store");
    let session = TerminalSession::new(store, HostPlatform::Other, manual_clock());
    assert!(session.history().is_empty());
}

#[test]
fn submit_records_prompt_line_and_output() {
    let mut session = session();
    let mut host = HostSpy::default();
    let mut rescue = RescueMode::new();

    submit(&mut session, "  pwd  ", &mut host, &mut rescue);
    let history = session.history();
    assert_eq!(&history[history.len() - 2..], ["guest@cyberdeck:~$ pwd", "/"]);
    assert_eq!(session.command_history(), ["pwd"]);
    assert_eq!(session.input(), "");
}

#[test]
fn empty_submission_is_a_noop() {
    let mut session = session();
    let before = session.history().to_vec();
    submit(&mut session, "   ", &mut HostSpy::default(), &mut RescueMode::new());
    assert_eq!(session.history(), before.as_slice());
    assert!(session.command_history().is_empty());
}

#[test]
fn navigation_updates_the_prompt() {
    let mut session = session();
    let mut host = HostSpy::default();
    let mut rescue = RescueMode::new();
    submit(&mut session, "cd blog", &mut host, &mut rescue);
    assert_eq!(session.prompt(&rescue), "guest@cyberdeck:~/blog$ ");
    assert_eq!(host.navigations(), vec!["/blog"]);
}

#[test]
fn clear_persists_an_empty_history() {
    let mut session = session();
    let mut host = HostSpy::default();
    submit(&mut session, "whoami", &mut host, &mut RescueMode::new());
    submit(&mut session, "clear", &mut host, &mut RescueMode::new());
    assert!(session.history().is_empty());
    assert_eq!(session.persistence().store().get(HISTORY_KEY), Some("[]"));
}

#[test]
fn history_survives_a_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = manual_clock();
    let mut host = HostSpy::default();
    let mut rescue = RescueMode::new();

    let expected = {
        let store = FileStore::open(dir.path()).expect("store");
        let mut session = TerminalSession::new(store, HostPlatform::Other, clock.clone());
        session.initialize_with(support::fixture_vfs());
        for line in ["echo one", "echo two", "cd projects"] {
            session.on_input_replace(line.to_string());
            session.on_submit(&mut host, &mut rescue);
        }
        session.history().to_vec()
    };

    let store = FileStore::open(dir.path()).expect("store");
    let reloaded = TerminalSession::new(store, HostPlatform::Other, clock);
    assert_eq!(reloaded.history(), expected.as_slice());
    assert_eq!(reloaded.command_history(), ["echo one", "echo two", "cd projects"]);
}

#[test]
fn cleared_history_reloads_empty_not_reseeded() {
    let mut store = MemoryStore::new();
    store.persist(HISTORY_KEY, "[]").expect("memory store");
    store.persist(BANNER_SHOWN_KEY, "true").expect("memory store");
    let session = TerminalSession::new(store, HostPlatform::Other, manual_clock());
    assert!(session.history().is_empty());
}

#[test]
fn arrow_keys_recall_commands() {
    let mut session = session();
    let mut host = HostSpy::default();
    let mut rescue = RescueMode::new();
    for line in ["ls", "pwd", "whoami"] {
        submit(&mut session, line, &mut host, &mut rescue);
    }

    session.on_history_previous();
    assert_eq!(session.input(), "whoami");
    session.on_history_previous();
    session.on_history_previous();
    session.on_history_previous();
    assert_eq!(session.input(), "ls");
    assert_eq!(session.history_cursor(), Some(2));

    session.on_history_next();
    assert_eq!(session.input(), "pwd");
    session.on_history_next();
    session.on_history_next();
    assert_eq!(session.input(), "");
    assert_eq!(session.history_cursor(), None);

    session.on_history_previous();
    submit(&mut session, "date", &mut host, &mut rescue);
    assert_eq!(session.history_cursor(), None);
    assert_eq!(session.persistence().store().get(COMMAND_HISTORY_KEY), Some(r#"["ls","pwd","whoami","date"]"#));
}

#[test]
fn tab_inserts_a_single_candidate_with_its_suffix() {
    let mut session = session();
    session.on_input_replace("cd a".to_string());
    session.on_tab(&RescueMode::new());
    assert_eq!(session.input(), "cd /about/");

    session.on_input_replace("wh".to_string());
    session.on_tab(&RescueMode::new());
    assert_eq!(session.input(), "whoami ");
}

#[test]
fn tab_with_several_candidates_lists_and_extends() {
    let mut session = session();
    let before = session.history().len();
    session.on_input_replace("read /blog/".to_string());
    session.on_tab(&RescueMode::new());

    let history = session.history();
    assert_eq!(history.len(), before + 2);
    assert_eq!(history[before], "guest@cyberdeck:~$ read /blog/");
    assert_eq!(history[before + 1], "/blog/ghost-protocol  /blog/my-post  /blog/neon-nights");
    assert_eq!(session.input(), "read /blog/");

    session.on_input_replace("sh".to_string());
    session.on_tab(&RescueMode::new());
    assert_eq!(session.input(), "shutdown ");

    session.on_input_replace("systemctl s".to_string());
    session.on_tab(&RescueMode::new());
    assert_eq!(session.input(), "systemctl st");
}

#[test]
fn exit_closes_and_games_open() {
    let mut session = session();
    let mut host = HostSpy::default();
    let mut rescue = RescueMode::new();

    submit(&mut session, "snake", &mut host, &mut rescue);
    assert_eq!(session.open_game(), Some(GameKind::Snake));
    assert_eq!(session.history().last().map(String::as_str), Some("Launching SNAKE..."));

    submit(&mut session, "exit", &mut host, &mut rescue);
    assert!(!session.is_open());
    assert_eq!(host.calls, vec![HostCall::OpenGame(GameKind::Snake), HostCall::CloseTerminal]);
}

#[test]
fn command_errors_render_as_error_lines() {
    let mut session = session();
    let mut host = HostSpy {
        launch_failure: Some("popup blocked".to_string()),
        ..HostSpy::default()
    };
    let mut rescue = RescueMode::new();
    submit(&mut session, "cd /projects", &mut host, &mut rescue);
    submit(&mut session, "./demo", &mut host, &mut rescue);
    assert_eq!(
        session.history().last().map(String::as_str),
        Some("Error: launch project failed: popup blocked")
    );
    assert_eq!(session.input(), "");
}

#[test]
fn rescue_prompt_banner_and_recovery() {
    let clock = manual_clock();
    let mut session = session_with(MemoryStore::new(), Arc::clone(&clock));
    let mut host = HostSpy::default();
    let mut rescue = RescueMode::new();
    rescue.activate(clock.now());

    submit(&mut session, "ls", &mut host, &mut rescue);
    let history = session.history();
    assert_eq!(history[history.len() - 2], "root@rescue:~# ls");
    assert_eq!(history[history.len() - 1], RESCUE_BANNER);

    submit(&mut session, "systemctl start NetworkManager", &mut host, &mut rescue);
    assert!(!rescue.is_active());
    assert_eq!(session.prompt(&rescue), "guest@cyberdeck:~$ ");
}

#[test]
fn tick_fires_shutdowns_and_rescue_warnings() {
    let clock = manual_clock();
    let mut session = session_with(MemoryStore::new(), Arc::clone(&clock));
    let mut host = HostSpy::default();
    let mut rescue = RescueMode::new();

    submit(&mut session, "shutdown -r +1 patching", &mut host, &mut rescue);
    session.tick(&mut host, &mut rescue);
    assert!(host.calls.is_empty());

    clock.advance(Duration::minutes(1));
    session.tick(&mut host, &mut rescue);
    assert_eq!(host.calls, vec![HostCall::Power(PowerAction::Reboot)]);
    assert!(session.history().last().is_some_and(|line| line.ends_with("patching")));

    rescue.activate(clock.now());
    clock.advance(Duration::seconds(60));
    session.tick(&mut host, &mut rescue);
    assert!(session.history().last().is_some_and(|line| line.starts_with("WARNING: rescue mode")));
}

#[test]
fn key_events_drive_the_session() {
    let mut session = session();
    let mut host = HostSpy::default();
    let mut rescue = RescueMode::new();

    for ch in "pwd".chars() {
        assert!(session.handle_key(&KeyEvent::plain(Key::Char(ch)), &mut host, &mut rescue));
    }
    session.handle_key(&KeyEvent::plain(Key::Backspace), &mut host, &mut rescue);
    session.handle_key(&KeyEvent::plain(Key::Char('d')), &mut host, &mut rescue);
    session.handle_key(&KeyEvent::plain(Key::Enter), &mut host, &mut rescue);
    assert_eq!(session.history().last().map(String::as_str), Some("/"));

    assert!(session.handle_key(&KeyEvent::plain(Key::Escape), &mut host, &mut rescue));
    assert!(!session.is_open());
    assert!(!session.handle_key(&KeyEvent::plain(Key::Char('x')), &mut host, &mut rescue));
}

#[test]
fn uninitialized_session_blocks_dispatch() {
    let mut session = TerminalSession::new(MemoryStore::new(), HostPlatform::Other, manual_clock());
    let mut host = HostSpy::default();
    session.on_input_replace("help".to_string());
    session.on_submit(&mut host, &mut RescueMode::new());
    assert_eq!(session.input(), "help");
    assert!(session.command_history().is_empty());
}

#[tokio::test]
async fn initialize_builds_the_vfs_from_content() {
    let mut session = TerminalSession::new(MemoryStore::new(), HostPlatform::Other, manual_clock());
    session
        .initialize(&StaticContentSource::from_ids(["my-post"], ["demo"]))
        .await;
    let state = session.state().expect("initialized");
    assert_eq!(state.file_system.blog_count(), 1);
    assert_eq!(state.file_system.project_count(), 1);
}

#[tokio::test]
async fn initialize_falls_back_to_an_empty_tree() {
    let mut session = TerminalSession::new(MemoryStore::new(), HostPlatform::Other, manual_clock());
    session.initialize(&UnavailableContentSource::new("cdn down")).await;
    let state = session.state().expect("initialized anyway");
    assert_eq!(state.file_system.blog_count(), 0);
    assert!(state.file_system.lookup(&["about"]).is_ok());
}

#[test]
fn backspace_removes_a_whole_grapheme() {
    let mut session = session();
    let mut host = HostSpy::default();
    let mut rescue = RescueMode::new();
    session.on_input_replace("echo cafe\u{301}".to_string());
    session.handle_key(&KeyEvent::plain(Key::Backspace), &mut host, &mut rescue);
    assert_eq!(session.input(), "echo caf");
}
