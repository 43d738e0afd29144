use crate::error::{Error, Result};
use std::io::{self, Read};
use std::os::unix::io::AsRawFd;
use termios::Termios;

// Derive raw mode settings from the original terminal settings
pub fn raw_mode_config(orig: &Termios) -> Termios {
    use termios::*;

    let mut termios = *orig;
    // Disable echo back, canonical mode, signals (SIGINT, SIGTSTP) and Ctrl+V.
    termios.c_lflag &= !(ECHO | ICANON | ISIG | IEXTEN);
    // Disable control flow mode (Ctrl+Q/Ctrl+S) and CR-to-NL translation
    termios.c_iflag &= !(IXON | ICRNL | BRKINT | INPCK | ISTRIP);
    // Disable output processing such as \n to \r\n translation
    termios.c_oflag &= !OPOST;
    // Ensure character size is 8bits
    termios.c_cflag |= CS8;
    // Do not wait for next byte with blocking since reading 0 byte is permitted
    termios.c_cc[VMIN] = 0;
    // Set read timeout to 1/10 second it enables 100ms timeout on read()
    termios.c_cc[VTIME] = 1;
    termios
}

// Scoped raw mode session. Original settings are restored by `disable()` or, when it is not
// reached (error path, panic), on drop.
pub struct RawMode<F: AsRawFd> {
    device: F,
    orig: Termios,
    active: bool,
}

pub type StdinRawMode = RawMode<io::Stdin>;

impl StdinRawMode {
    pub fn new() -> Result<StdinRawMode> {
        RawMode::enable(io::stdin())
    }
}

impl<F: AsRawFd> RawMode<F> {
    pub fn enable(device: F) -> Result<RawMode<F>> {
        let fd = device.as_raw_fd();
        let orig = Termios::from_fd(fd).map_err(Error::TerminalQuery)?;

        // The guard exists before the terminal is modified so that any later failure restores it
        let mut session = RawMode {
            device,
            orig,
            active: true,
        };

        let raw = raw_mode_config(&session.orig);
        if let Err(err) = termios::tcsetattr(fd, termios::TCSAFLUSH, &raw) {
            session.active = false;
            return Err(Error::TerminalApply(err));
        }

        log::debug!("Entered raw mode on fd {}", fd);
        Ok(session)
    }

    pub fn disable(mut self) -> Result<()> {
        self.restore()
    }

    pub fn original(&self) -> &Termios {
        &self.orig
    }

    fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let fd = self.device.as_raw_fd();
        termios::tcsetattr(fd, termios::TCSAFLUSH, &self.orig).map_err(Error::TerminalApply)?;
        log::debug!("Restored original terminal mode on fd {}", fd);
        Ok(())
    }
}

impl<F: AsRawFd> Drop for RawMode<F> {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            log::warn!("{}", err);
        }
    }
}

impl<F: AsRawFd + Read> Read for RawMode<F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.device.read(buf)
    }
}

#[cfg(all(test, target_os = "linux"))]
pub(crate) mod tests {
    use super::*;
    use std::ffi::CStr;
    use std::fs::{File, OpenOptions};
    use std::os::unix::fs::OpenOptionsExt;
    use std::os::unix::io::FromRawFd;

    // Returns (master, slave) of a fresh pseudo terminal
    pub(crate) fn open_pty() -> Option<(File, File)> {
        unsafe {
            let master = libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY);
            if master < 0 {
                return None;
            }
            let master_file = File::from_raw_fd(master);
            if libc::grantpt(master) != 0 || libc::unlockpt(master) != 0 {
                return None;
            }
            let mut name = [0 as libc::c_char; 128];
            if libc::ptsname_r(master, name.as_mut_ptr(), name.len()) != 0 {
                return None;
            }
            let path = CStr::from_ptr(name.as_ptr()).to_str().ok()?.to_string();
            let slave = OpenOptions::new()
                .read(true)
                .write(true)
                .custom_flags(libc::O_NOCTTY)
                .open(path)
                .ok()?;
            Some((master_file, slave))
        }
    }

    pub(crate) fn assert_same_attrs(l: &Termios, r: &Termios) {
        assert_eq!(l.c_iflag, r.c_iflag);
        assert_eq!(l.c_oflag, r.c_oflag);
        assert_eq!(l.c_cflag, r.c_cflag);
        assert_eq!(l.c_lflag, r.c_lflag);
        assert_eq!(l.c_cc, r.c_cc);
    }

    #[test]
    fn raw_config_clears_flags() {
        use termios::*;

        let (_master, slave) = open_pty().expect("pty is available");
        let orig = Termios::from_fd(slave.as_raw_fd()).unwrap();
        let raw = raw_mode_config(&orig);

        assert_eq!(raw.c_lflag & (ECHO | ICANON | ISIG | IEXTEN), 0);
        assert_eq!(raw.c_iflag & (IXON | ICRNL | BRKINT | INPCK | ISTRIP), 0);
        assert_eq!(raw.c_oflag & OPOST, 0);
        assert_eq!(raw.c_cflag & CS8, CS8);
        assert_eq!(raw.c_cc[VMIN], 0);
        assert_eq!(raw.c_cc[VTIME], 1);
    }

    #[test]
    fn enable_applies_raw_mode() {
        use termios::*;

        let (_master, slave) = open_pty().expect("pty is available");
        let fd = slave.as_raw_fd();
        let raw = RawMode::enable(slave).unwrap();

        let applied = Termios::from_fd(fd).unwrap();
        assert_eq!(applied.c_lflag & (ECHO | ICANON), 0);
        assert_eq!(applied.c_cc[VMIN], 0);
        assert_eq!(applied.c_cc[VTIME], 1);

        raw.disable().unwrap();
    }

    #[test]
    fn disable_restores_original() {
        let (_master, slave) = open_pty().expect("pty is available");
        // disable() consumes the session and closes its device, so observe it through a clone
        let dup = slave.try_clone().unwrap();
        let before = Termios::from_fd(dup.as_raw_fd()).unwrap();

        let raw = RawMode::enable(slave).unwrap();
        assert_same_attrs(raw.original(), &before);
        raw.disable().unwrap();

        let after = Termios::from_fd(dup.as_raw_fd()).unwrap();
        assert_same_attrs(&before, &after);
    }

    #[test]
    fn drop_restores_original() {
        let (_master, slave) = open_pty().expect("pty is available");
        let fd = slave.as_raw_fd();
        let dup = slave.try_clone().unwrap();
        let before = Termios::from_fd(fd).unwrap();

        {
            let _raw = RawMode::enable(slave).unwrap();
        }

        let after = Termios::from_fd(dup.as_raw_fd()).unwrap();
        assert_same_attrs(&before, &after);
    }

    #[test]
    fn enable_fails_on_non_terminal() {
        let file = tempfile::tempfile().unwrap();
        match RawMode::enable(file) {
            Err(Error::TerminalQuery(_)) => {}
            Err(err) => panic!("unexpected error: {}", err),
            Ok(_) => panic!("raw mode must not be enabled on a regular file"),
        }
    }
}
