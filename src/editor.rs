use crate::error::{Error, Result};
use crate::input::KeySeq;
use crate::screen::Screen;
use crate::signal::TerminationWatcher;
use crate::text_buffer::{Lines, TextBuffer};
use crate::viewport::ViewportSize;
use std::io::Write;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum CursorDir {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum EditorState {
    Running,
    Terminating,
}

pub struct Editor<I: Iterator<Item = Result<KeySeq>>, W: Write> {
    input: I, // Key sequences stream represented as Iterator
    screen: Screen<W>,
    buf: TextBuffer,
    // (x, y) coordinate on screen
    cx: usize,
    cy: usize,
    state: EditorState,
    watcher: Option<TerminationWatcher>,
}

impl<I, W> Editor<I, W>
where
    I: Iterator<Item = Result<KeySeq>>,
    W: Write,
{
    pub fn new(input: I, output: W, size: ViewportSize, buf: TextBuffer) -> Editor<I, W> {
        Editor {
            input,
            screen: Screen::new(size, output),
            buf,
            cx: 0,
            cy: 0,
            state: EditorState::Running,
            watcher: None,
        }
    }

    pub fn watch_termination(&mut self, watcher: TerminationWatcher) {
        self.watcher = Some(watcher);
    }

    // Cursor is clamped to the screen, not to the text
    fn move_cursor_one(&mut self, dir: CursorDir) {
        match dir {
            CursorDir::Left => self.cx = self.cx.saturating_sub(1),
            CursorDir::Up => self.cy = self.cy.saturating_sub(1),
            CursorDir::Right => {
                if self.cx + 1 < self.screen.cols() {
                    self.cx += 1;
                }
            }
            CursorDir::Down => {
                if self.cy + 1 < self.screen.rows() {
                    self.cy += 1;
                }
            }
        }
    }

    fn move_cursor_page(&mut self, dir: CursorDir) {
        for _ in 0..self.screen.rows() {
            self.move_cursor_one(dir);
        }
    }

    fn quit(&mut self) -> Result<()> {
        self.screen.clear()?;
        self.state = EditorState::Terminating;
        Ok(())
    }

    fn process_keypress(&mut self, key: KeySeq) -> Result<()> {
        use KeySeq::*;

        match key {
            QuitKey => self.quit()?,
            UpKey => self.move_cursor_one(CursorDir::Up),
            DownKey => self.move_cursor_one(CursorDir::Down),
            LeftKey => self.move_cursor_one(CursorDir::Left),
            RightKey => self.move_cursor_one(CursorDir::Right),
            PageUpKey => self.move_cursor_page(CursorDir::Up),
            PageDownKey => self.move_cursor_page(CursorDir::Down),
            HomeKey => self.cx = 0,
            EndKey => self.cx = self.screen.cols().saturating_sub(1),
            Unidentified | DeleteKey | EscapeKey | Key(_) => {
                log::trace!("Key '{}' not mapped", key);
            }
        }

        Ok(())
    }

    fn terminated_by_signal(&self) -> bool {
        self.watcher.as_ref().map_or(false, TerminationWatcher::notified)
    }

    pub fn first_paint(&mut self) -> Result<()> {
        self.screen.refresh(&self.buf, (self.cx, self.cy))
    }

    pub fn edit(&mut self) -> Result<()> {
        self.first_paint()?;

        while let Some(seq) = self.input.next() {
            let key = seq?;

            if key == KeySeq::Unidentified {
                // Idle tick. Nothing was input within the read timeout
                if self.terminated_by_signal() {
                    log::debug!("Termination signal received");
                    self.quit()?;
                    return Err(Error::Terminated);
                }
                continue;
            }

            self.process_keypress(key)?;
            if self.state == EditorState::Terminating {
                log::debug!("Quit by user");
                break;
            }

            self.screen.refresh(&self.buf, (self.cx, self.cy))?;
        }

        Ok(())
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cx, self.cy)
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn lines(&self) -> Lines<'_> {
        self.buf.lines()
    }

    pub fn screen(&self) -> &'_ Screen<W> {
        &self.screen
    }
}
