use crate::error::{Error, Result};
use std::io::{self, Read, Write};
use std::str;

// Cursor position report is at most "\x1b[9999;9999R"
const MAX_REPORT_LEN: usize = 31;

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ViewportSize {
    pub rows: usize,
    pub cols: usize,
}

impl ViewportSize {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }
}

fn parse_cursor_report(report: &[u8]) -> Option<(usize, usize)> {
    // e.g. \x1b[24;80R https://vt100.net/docs/vt100-ug/chapter3.html#CPR
    let body = report.strip_prefix(b"\x1b[")?.strip_suffix(b"R")?;
    let mut args = body
        .split(|b| *b == b';')
        .map(|b| str::from_utf8(b).ok().and_then(|s| s.parse::<usize>().ok()));
    match (args.next(), args.next(), args.next()) {
        (Some(Some(r)), Some(Some(c)), None) => Some((r, c)),
        _ => None,
    }
}

fn window_size_fallback<R, W>(input: &mut R, output: &mut W) -> Result<ViewportSize>
where
    R: Read,
    W: Write,
{
    // By moving cursor at the bottom-right corner by 'B' and 'C' commands, get the size of
    // current screen. \x1b[9999;9999H is not available since it does not guarantee cursor
    // stops on the corner. Finally command 'n' queries cursor position.
    output.write_all(b"\x1b[999C\x1b[999B\x1b[6n")?;
    output.flush()?;

    let mut report = Vec::with_capacity(MAX_REPORT_LEN);
    let mut one_byte: [u8; 1] = [0];
    while report.len() < MAX_REPORT_LEN {
        match input.read(&mut one_byte) {
            Ok(0) => break, // Terminal did not answer within the timeout
            Ok(_) => {
                report.push(one_byte[0]);
                if one_byte[0] == b'R' {
                    break;
                }
            }
            Err(err)
                if err.kind() == io::ErrorKind::WouldBlock
                    || err.kind() == io::ErrorKind::Interrupted =>
            {
                break
            }
            Err(err) => return Err(Error::Read(err)),
        }
    }

    match parse_cursor_report(&report) {
        Some((rows, cols)) if rows > 0 && cols > 0 => Ok(ViewportSize::new(rows, cols)),
        Some((rows, cols)) => Err(Error::ViewportQuery(format!(
            "terminal reported empty screen {}x{}",
            cols, rows
        ))),
        None => Err(Error::ViewportQuery(format!(
            "unexpected cursor position report {:?}",
            String::from_utf8_lossy(&report)
        ))),
    }
}

// `direct` is (width, height) reported by the terminal device itself, if any. When it is not
// available, the size is measured with cursor movement and a cursor position report.
pub fn window_size<R, W>(
    direct: Option<(usize, usize)>,
    input: &mut R,
    output: &mut W,
) -> Result<ViewportSize>
where
    R: Read,
    W: Write,
{
    match direct {
        Some((w, h)) if w > 0 && h > 0 => {
            log::debug!("Window size from device: {}x{}", w, h);
            Ok(ViewportSize::new(h, w))
        }
        _ => {
            let size = window_size_fallback(input, output)?;
            log::debug!(
                "Window size from cursor position report: {}x{}",
                size.cols,
                size.rows
            );
            Ok(size)
        }
    }
}
