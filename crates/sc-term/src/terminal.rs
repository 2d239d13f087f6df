// SPDX-License-Identifier: MIT
//
// Terminal control — size queries, TTY detection, raw mode, and interrupts.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, kill, and raw fd writes. These
// are the standard POSIX interfaces for terminal control; there is no safe
// alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// Raw mode is a scoped acquisition: `RawMode::enable()` returns a guard and
// the original termios comes back when the guard is dropped, on every exit
// path. A panic hook covers the one path a guard cannot: it writes a small
// restore sequence straight to fd 1 (bypassing the stdout lock, which the
// panicking thread may hold), restores termios from a global backup, then
// hands over to the original hook so the message prints to a sane terminal.

use std::io;
#[cfg(unix)]
use std::sync::Mutex;
use std::sync::Once;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

impl Size {
    /// Whether the terminal is at least `cols × rows`.
    #[inline]
    #[must_use]
    pub const fn fits(self, cols: u16, rows: u16) -> bool {
        self.cols >= cols && self.rows >= rows
    }
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)` on stdout.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdout is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDOUT_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

/// Send SIGINT to the current process.
///
/// Used when the user presses Ctrl-C inside raw mode, where the terminal
/// no longer turns that key into a signal for us. With the default
/// disposition the process ends here; if the program installed its own
/// handler, this returns and the caller decides what to do next.
///
/// # Errors
///
/// Returns the OS error if `kill(2)` fails.
#[cfg(unix)]
pub fn raise_interrupt() -> io::Result<()> {
    let result = unsafe { libc::kill(libc::getpid(), libc::SIGINT) };
    if result == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Exit with the conventional "killed by SIGINT" status.
#[cfg(not(unix))]
pub fn raise_interrupt() -> io::Result<()> {
    std::process::exit(130)
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of original termios for panic recovery.
///
/// The [`RawMode`] guard owns its own copy, but the panic hook can't
/// access it. This global backup, behind a [`Mutex`] rather than `static mut`,
/// lets the hook restore cooked mode without the guard.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

/// Terminal restore sequence for emergency use: reset SGR attributes,
/// then show the cursor.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[0m\x1b[?25h";

/// Panic hook guard: ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write the restore sequence directly to stdout's file descriptor.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        use std::io::Write;
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Raw Mode ───────────────────────────────────────────────────────────────

/// Scoped raw-mode acquisition.
///
/// While the guard lives, stdin is in raw mode: no echo, no line buffering,
/// no signal generation (Ctrl-C arrives as byte `0x03`). Dropping the guard
/// restores the original mode. [`restore`](Self::restore) does the same but
/// reports failures.
///
/// When stdin is not a terminal, `enable` succeeds and the guard does nothing.
///
/// # Example
///
/// ```no_run
/// use sc_term::terminal::RawMode;
///
/// let raw = RawMode::enable()?;
/// // ... read keys one at a time ...
/// raw.restore()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct RawMode {
    /// Original termios saved before entering raw mode. `None` once restored
    /// (or when stdin was never a terminal).
    #[cfg(unix)]
    original: Option<libc::termios>,
}

impl RawMode {
    /// Switch stdin to raw mode and return the guard that undoes it.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the terminal attributes cannot be read or set.
    #[cfg(unix)]
    pub fn enable() -> io::Result<Self> {
        if unsafe { libc::isatty(libc::STDIN_FILENO) } == 0 {
            return Ok(Self { original: None });
        }

        install_panic_hook();

        let fd = libc::STDIN_FILENO;
        let original = unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }
            termios
        };

        // Save to the global backup for the panic hook.
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = Some(original);
        }

        let mut termios = original;
        // cfmakeraw equivalent: disable all line processing.
        termios.c_iflag &= !(libc::IGNBRK
            | libc::BRKINT
            | libc::PARMRK
            | libc::ISTRIP
            | libc::INLCR
            | libc::IGNCR
            | libc::ICRNL
            | libc::IXON);
        termios.c_oflag &= !libc::OPOST;
        termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
        termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
        termios.c_cflag |= libc::CS8;

        // VMIN=1, VTIME=0: read() blocks until at least 1 byte available.
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;

        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) } != 0 {
            return Err(io::Error::last_os_error());
        }

        tracing::debug!("entered raw mode");
        Ok(Self {
            original: Some(original),
        })
    }

    /// Raw mode is a no-op off unix.
    ///
    /// # Errors
    ///
    /// Infallible on this platform.
    #[cfg(not(unix))]
    pub fn enable() -> io::Result<Self> {
        Ok(Self {})
    }

    /// Restore the original terminal mode now, reporting failures.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the original attributes cannot be set back.
    pub fn restore(mut self) -> io::Result<()> {
        self.restore_inner()
    }

    #[cfg(unix)]
    fn restore_inner(&mut self) -> io::Result<()> {
        if let Some(original) = self.original.take() {
            if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const original) }
                != 0
            {
                return Err(io::Error::last_os_error());
            }

            // Clear the global backup once restored.
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }
            tracing::debug!("restored terminal mode");
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn restore_inner(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = self.restore_inner();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
