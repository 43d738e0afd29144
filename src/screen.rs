use crate::error::Result;
use crate::text_buffer::TextBuffer;
use crate::viewport::ViewportSize;
use std::fs::File;
use std::io::{self, Write};
use std::os::unix::io::AsFd;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// io::Stdout is line buffered and would split a frame at every "\r\n". A duplicate of its
// descriptor is written directly so that one refresh is one write(2).
pub fn terminal_output() -> Result<File> {
    let fd = io::stdout().as_fd().try_clone_to_owned()?;
    Ok(File::from(fd))
}

pub struct Screen<W: Write> {
    output: W,
    // Screen size
    num_cols: usize,
    num_rows: usize,
}

impl<W: Write> Screen<W> {
    pub fn new(size: ViewportSize, output: W) -> Self {
        Self {
            output,
            num_cols: size.cols,
            num_rows: size.rows,
        }
    }

    fn draw_welcome_message<B: Write>(&self, mut buf: B) -> Result<()> {
        let msg_buf = format!("Kilo editor -- version {}", VERSION);
        let welcome = &msg_buf.as_bytes()[..msg_buf.len().min(self.num_cols)];
        let padding = (self.num_cols - welcome.len()) / 2;
        if padding > 0 {
            buf.write_all(b"~")?;
            buf.write_all(" ".repeat(padding - 1).as_bytes())?;
        }
        buf.write_all(welcome)?;
        Ok(())
    }

    fn draw_rows<B: Write>(&self, mut buf: B, text: &TextBuffer) -> Result<()> {
        let rows = text.rows();

        for y in 0..self.num_rows {
            if let Some(row) = rows.get(y) {
                buf.write_all(row.truncated(self.num_cols))?;
            } else if rows.is_empty() && y == self.num_rows / 3 {
                self.draw_welcome_message(&mut buf)?;
            } else {
                buf.write_all(b"~")?;
            }

            // Erases the part of the line to the right of the cursor. http://vt100.net/docs/vt100-ug/chapter3.html#EL
            buf.write_all(b"\x1b[K")?;

            if y + 1 < self.num_rows {
                buf.write_all(b"\r\n")?;
            }
        }

        Ok(())
    }

    // Build one frame. The same inputs always produce the same bytes.
    pub fn render_frame(&self, text: &TextBuffer, cursor: (usize, usize)) -> Result<Vec<u8>> {
        let (cx, cy) = cursor;
        let mut buf = Vec::with_capacity((self.num_rows + 1) * (self.num_cols + 5));

        // \x1b[: Escape sequence header
        // Hide cursor while updating screen. 'l' is command to set mode http://vt100.net/docs/vt100-ug/chapter3.html#SM
        buf.write_all(b"\x1b[?25l")?;
        // H: Command to move cursor. Here \x1b[H is the same as \x1b[1;1H
        buf.write_all(b"\x1b[H")?;

        self.draw_rows(&mut buf, text)?;

        // Move cursor. Terminal coordinates are 1-based
        write!(buf, "\x1b[{};{}H", cy + 1, cx + 1)?;

        // Reveal cursor again. 'h' is command to reset mode https://vt100.net/docs/vt100-ug/chapter3.html#RM
        buf.write_all(b"\x1b[?25h")?;

        Ok(buf)
    }

    pub fn refresh(&mut self, text: &TextBuffer, cursor: (usize, usize)) -> Result<()> {
        let buf = self.render_frame(text, cursor)?;

        // Whole frame goes in one write to avoid flicker. Short write is not retried
        let written = self.output.write(&buf)?;
        if written < buf.len() {
            log::debug!("Short write of frame: {}/{} bytes", written, buf.len());
        }
        self.output.flush()?;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        // 2: Argument of 'J' command to reset entire screen
        // J: Command to erase screen http://vt100.net/docs/vt100-ug/chapter3.html#ED
        // Then set cursor position to left-top corner
        self.output.write_all(b"\x1b[2J\x1b[H")?;
        self.output.flush()?;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.num_rows
    }

    pub fn cols(&self) -> usize {
        self.num_cols
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}
