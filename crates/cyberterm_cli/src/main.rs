#[cfg(unix)]
use std::io;
#[cfg(unix)]
use std::sync::Arc;
#[cfg(unix)]
use std::time::Instant;

#[cfg(unix)]
use content_source::{DirectoryContentSource, StaticContentSource};
#[cfg(unix)]
use cyberterm::{
    handle_keyboard_shortcuts, init_file_logging, Clock, EnvConfig, RescueControl, RescueMode,
    SystemClock, TerminalSession,
};
#[cfg(unix)]
use cyberterm_cli::host::CliHost;
#[cfg(unix)]
use cyberterm_cli::input::InputBuffer;
#[cfg(unix)]
use cyberterm_cli::keys::decode;
#[cfg(unix)]
use cyberterm_cli::panic_hook::install_panic_hook;
#[cfg(unix)]
use cyberterm_cli::render::{closed_screen, frame, View};
#[cfg(unix)]
use cyberterm_cli::terminal::RawTerminal;
#[cfg(unix)]
use session_store::{FileStore, KeyValueStore};

#[cfg(unix)]
const DEMO_BLOG_IDS: [&str; 3] = ["neon-nights", "ghost-protocol", "chrome-hearts"];
#[cfg(unix)]
const DEMO_PROJECT_IDS: [&str; 3] = ["cyberdeck", "ice-breaker", "netwatch"];
#[cfg(unix)]
const POLL_MS: i32 = 100;

#[cfg(unix)]
async fn load_content<S: KeyValueStore>(session: &mut TerminalSession<S>, config: &EnvConfig) {
    match &config.content_dir {
        Some(dir) => {
            session
                .initialize(&DirectoryContentSource::new(dir.clone()))
                .await
        }
        None => {
            session
                .initialize(&StaticContentSource::from_ids(DEMO_BLOG_IDS, DEMO_PROJECT_IDS))
                .await
        }
    }
}

#[cfg(unix)]
#[tokio::main(flavor = "current_thread")]
async fn main() -> io::Result<()> {
    let config = EnvConfig::from_env();
    if let Some(path) = &config.log_file {
        if let Err(err) = init_file_logging(path) {
            eprintln!("cyberterm: {err}");
        }
    }

    let cwd = std::env::current_dir()?;
    let store = FileStore::open(config.state_root(&cwd)).map_err(io::Error::other)?;
    let platform = config.platform();
    let clock = Arc::new(SystemClock);

    let mut session = TerminalSession::new(store, platform, Arc::clone(&clock) as Arc<dyn Clock>);
    load_content(&mut session, &config).await;
    session.open();

    let mut rescue = RescueMode::new();
    if config.start_in_rescue {
        rescue.activate(clock.now());
    }
    let mut host = CliHost::new();
    tracing::info!(?platform, rescue = rescue.is_active(), "terminal started");

    install_panic_hook();
    let terminal = RawTerminal::enter()?;
    let mut input = InputBuffer::default();
    let mut dirty = true;

    loop {
        let timeout_ms = input.next_timeout_ms(Instant::now(), POLL_MS);
        let text = match terminal.read_input(timeout_ms)? {
            Some(bytes) => Some(input.process(&bytes, Instant::now())),
            None => input.flush_due(Instant::now()),
        };
        if let Some(text) = text.filter(|text| !text.is_empty()) {
            for event in decode(&text, platform) {
                if session.is_open() {
                    session.handle_key(&event, &mut host, &mut rescue);
                } else if event.matches("q") {
                    return Ok(());
                } else {
                    handle_keyboard_shortcuts(&event, platform, false, &mut host);
                }
            }
            dirty = true;
        }

        if host.take_open_request() {
            session.open();
        }
        if session.open_game().is_some() {
            session.close_game();
        }
        if host.take_reload_request() {
            load_content(&mut session, &config).await;
        }

        let before = session.history().len();
        session.tick(&mut host, &mut rescue);
        dirty |= session.history().len() != before;
        dirty |= terminal.take_resized();

        if dirty {
            let (cols, rows) = terminal.size();
            let screen = if session.is_open() {
                let prompt = session.prompt(&rescue);
                frame(
                    &View {
                        history: session.history(),
                        prompt: &prompt,
                        input: session.input(),
                        notice: host.notice(),
                        rescue: rescue.is_active(),
                    },
                    cols,
                    rows,
                )
            } else {
                closed_screen(host.notice(), platform.shortcut_modifier_label(), cols)
            };
            terminal.write(&screen)?;
            dirty = false;
        }

        if let Some(action) = host.power_action() {
            tracing::info!(%action, "exiting");
            return Ok(());
        }
    }
}

#[cfg(not(unix))]
fn main() {
    eprintln!("cyberterm needs a unix terminal");
    std::process::exit(1);
}
