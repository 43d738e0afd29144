use crate::error::{Error, Result};
use std::fmt;
use std::io::{self, Read};

// Ctrl-Q. Flow control is disabled in raw mode so it reaches us as a plain byte
const QUIT_BYTE: u8 = 0x11;
const ESC: u8 = 0x1b;

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum KeySeq {
    Unidentified, // Pseudo key for an idle tick with no input
    Key(u8),
    LeftKey,
    RightKey,
    UpKey,
    DownKey,
    PageUpKey,
    PageDownKey,
    HomeKey,
    EndKey,
    DeleteKey,
    EscapeKey,
    QuitKey,
}

impl fmt::Display for KeySeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use KeySeq::*;
        match self {
            Unidentified => write!(f, "UNKNOWN"),
            Key(b' ') => write!(f, "SPACE"),
            Key(b) if b.is_ascii_control() || !b.is_ascii() => write!(f, "\\x{:x}", b),
            Key(b) => write!(f, "{}", *b as char),
            LeftKey => write!(f, "LEFT"),
            RightKey => write!(f, "RIGHT"),
            UpKey => write!(f, "UP"),
            DownKey => write!(f, "DOWN"),
            PageUpKey => write!(f, "PAGEUP"),
            PageDownKey => write!(f, "PAGEDOWN"),
            HomeKey => write!(f, "HOME"),
            EndKey => write!(f, "END"),
            DeleteKey => write!(f, "DELETE"),
            EscapeKey => write!(f, "ESC"),
            QuitKey => write!(f, "C-q"),
        }
    }
}

// States of escape sequence decoding. Every sequence is at most 4 bytes so decoding never
// keeps a partial sequence across keys.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum DecodeState {
    Start,
    SawEscape,  // \x1b
    SawBracket, // \x1b[
    SawDigit(u8), // \x1b[<digit>
    SawSs3,     // \x1bO
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Step {
    Pending(DecodeState),
    Done(KeySeq),
}

impl DecodeState {
    // `None` means no byte arrived within the read timeout
    pub fn step(self, byte: Option<u8>) -> Step {
        use DecodeState::*;
        use KeySeq::*;
        use Step::*;

        match (self, byte) {
            (Start, None) => Done(Unidentified),
            (Start, Some(ESC)) => Pending(SawEscape),
            (Start, Some(QUIT_BYTE)) => Done(QuitKey),
            (Start, Some(b)) => Done(Key(b)),

            (SawEscape, Some(b'[')) => Pending(SawBracket),
            (SawEscape, Some(b'O')) => Pending(SawSs3),

            // e.g. <PAGEUP> => \x1b[5~
            (SawBracket, Some(d @ b'0'..=b'9')) => Pending(SawDigit(d)),
            // e.g. <LEFT> => \x1b[D
            (SawBracket, Some(b'A')) => Done(UpKey),
            (SawBracket, Some(b'B')) => Done(DownKey),
            (SawBracket, Some(b'C')) => Done(RightKey),
            (SawBracket, Some(b'D')) => Done(LeftKey),
            (SawBracket, Some(b'H')) => Done(HomeKey),
            (SawBracket, Some(b'F')) => Done(EndKey),

            (SawDigit(d), Some(b'~')) => match d {
                b'1' | b'7' => Done(HomeKey),
                b'3' => Done(DeleteKey),
                b'4' | b'8' => Done(EndKey),
                b'5' => Done(PageUpKey),
                b'6' => Done(PageDownKey),
                _ => Done(EscapeKey),
            },

            // Application mode cursor keys e.g. <HOME> => \x1bOH
            (SawSs3, Some(b'H')) => Done(HomeKey),
            (SawSs3, Some(b'F')) => Done(EndKey),

            // Timed out or unknown tail
            (_, _) => Done(EscapeKey),
        }
    }
}

pub struct InputSequences<R: Read> {
    input: R,
}

impl<R: Read> InputSequences<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut one_byte: [u8; 1] = [0];
        match self.input.read(&mut one_byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(one_byte[0])),
            // Read timeout on raw mode terminal is not an error
            Err(err)
                if err.kind() == io::ErrorKind::WouldBlock
                    || err.kind() == io::ErrorKind::Interrupted =>
            {
                Ok(None)
            }
            Err(err) => Err(Error::Read(err)),
        }
    }

    fn read_seq(&mut self) -> Result<KeySeq> {
        let mut state = DecodeState::Start;
        loop {
            let byte = self.read_byte()?;
            match state.step(byte) {
                Step::Done(key) => return Ok(key),
                Step::Pending(next) => state = next,
            }
        }
    }

    // Block until some key is decoded. Idle timeouts are retried.
    pub fn read_key(&mut self) -> Result<KeySeq> {
        loop {
            match self.read_seq()? {
                KeySeq::Unidentified => continue,
                key => return Ok(key),
            }
        }
    }
}

impl<R: Read> Iterator for InputSequences<R> {
    type Item = Result<KeySeq>;

    // Read next byte from stdin with timeout 100ms. If nothing was read, it returns KeySeq::Unidentified.
    // This method never returns None so for loop never ends
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.read_seq())
    }
}
