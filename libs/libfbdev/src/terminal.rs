//! Raw-mode terminal control for keyboard input.

use std::io;
use std::mem;
use std::os::fd::RawFd;

use crate::error::DevError;

/// Clear the line discipline flags so input arrives byte by byte, unechoed,
/// without blocking. Output post-processing is left alone.
pub fn make_raw(termios: &mut libc::termios) {
    termios.c_iflag &= !(libc::ICRNL | libc::IXON);
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    termios.c_cc[libc::VMIN] = 0;
    termios.c_cc[libc::VTIME] = 0;
}

/// A terminal switched into raw mode. The saved attributes are put back
/// when this is dropped.
pub struct RawTerminal {
    fd: RawFd,
    saved: libc::termios,
}

impl RawTerminal {
    pub fn enable(fd: RawFd) -> Result<Self, DevError> {
        // SAFETY: isatty only inspects the descriptor.
        if unsafe { libc::isatty(fd) } != 1 {
            return Err(DevError::NotATerminal);
        }

        // SAFETY: termios is plain data; tcgetattr fills it in completely.
        let mut saved: libc::termios = unsafe { mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut saved) } != 0 {
            return Err(DevError::Terminal(io::Error::last_os_error()));
        }

        let mut raw = saved;
        make_raw(&mut raw);
        // SAFETY: `raw` is a valid termios derived from the current settings.
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw) } != 0 {
            return Err(DevError::Terminal(io::Error::last_os_error()));
        }

        log::debug!("terminal fd {} switched to raw mode", fd);
        Ok(Self { fd, saved })
    }

    pub fn fd(&self) -> RawFd {
        self.fd
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        // SAFETY: restores the attributes read in `enable`.
        if unsafe { libc::tcsetattr(self.fd, libc::TCSANOW, &self.saved) } != 0 {
            log::warn!(
                "failed to restore terminal fd {}: {}",
                self.fd,
                io::Error::last_os_error()
            );
        } else {
            log::debug!("terminal fd {} restored", self.fd);
        }
    }
}

// =============================================================================
// Unit Tests
//
// Switching a real terminal needs a tty, which test runners rarely have.
// These cover the flag manipulation and the non-tty error path.
// =============================================================================
