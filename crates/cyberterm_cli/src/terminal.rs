//! Raw-mode stdin/stdout over termios, with SIGWINCH tracking.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use libc::{self, c_int};
use signal_hook::iterator::{Handle, Signals};

fn get_termios(fd: c_int) -> io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(termios)
}

fn set_termios(fd: c_int, termios: &libc::termios) -> io::Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn poll_readable(fd: c_int, timeout_ms: i32) -> bool {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let result = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
    result > 0 && (fds.revents & libc::POLLIN) != 0
}

fn read_winsize(fd: c_int) -> Option<(u16, u16)> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) };
    if result == 0 && size.ws_col > 0 && size.ws_row > 0 {
        Some((size.ws_col, size.ws_row))
    } else {
        None
    }
}

fn write_all_fd(fd: c_int, bytes: &[u8]) -> io::Result<()> {
    let mut written = 0;
    while written < bytes.len() {
        let rest = &bytes[written..];
        let result = unsafe { libc::write(fd, rest.as_ptr() as *const libc::c_void, rest.len()) };
        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if result == 0 {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "write returned 0"));
        }
        written += result as usize;
    }
    Ok(())
}

struct ResizeWatcher {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Raw-mode session on the process's stdin/stdout. Dropping it restores the original
/// terminal attributes.
pub struct RawTerminal {
    stdin_fd: c_int,
    stdout_fd: c_int,
    original_termios: libc::termios,
    resized: Arc<AtomicBool>,
    _resize_watcher: ResizeWatcher,
}

impl RawTerminal {
    pub fn enter() -> io::Result<Self> {
        let stdin_fd = libc::STDIN_FILENO;
        let original_termios = get_termios(stdin_fd)?;
        let mut raw = original_termios;
        unsafe {
            libc::cfmakeraw(&mut raw);
        }
        set_termios(stdin_fd, &raw)?;

        let resized = Arc::new(AtomicBool::new(true));
        let mut signals = Signals::new([libc::SIGWINCH])?;
        let handle = signals.handle();
        let flag = Arc::clone(&resized);
        let thread = thread::spawn(move || {
            for _ in signals.forever() {
                flag.store(true, Ordering::SeqCst);
            }
        });

        Ok(Self {
            stdin_fd,
            stdout_fd: libc::STDOUT_FILENO,
            original_termios,
            resized,
            _resize_watcher: ResizeWatcher {
                handle,
                thread: Some(thread),
            },
        })
    }

    /// Waits up to `timeout_ms` for input and returns the raw bytes that arrived.
    pub fn read_input(&self, timeout_ms: i32) -> io::Result<Option<Vec<u8>>> {
        if !poll_readable(self.stdin_fd, timeout_ms) {
            return Ok(None);
        }
        let mut buffer = [0u8; 4096];
        let read_len =
            unsafe { libc::read(self.stdin_fd, buffer.as_mut_ptr() as *mut libc::c_void, buffer.len()) };
        if read_len < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(None);
            }
            return Err(err);
        }
        if read_len == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        }
        Ok(Some(buffer[..read_len as usize].to_vec()))
    }

    pub fn write(&self, data: &str) -> io::Result<()> {
        write_all_fd(self.stdout_fd, data.as_bytes())
    }

    /// Current `(columns, rows)`, defaulting to 80x24.
    pub fn size(&self) -> (u16, u16) {
        read_winsize(self.stdout_fd).unwrap_or((80, 24))
    }

    /// Returns and clears the pending-resize flag.
    pub fn take_resized(&self) -> bool {
        self.resized.swap(false, Ordering::SeqCst)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = self.write("\r\n");
        if let Err(err) = set_termios(self.stdin_fd, &self.original_termios) {
            tracing::warn!(error = %err, "failed to restore terminal attributes");
        }
    }
}
