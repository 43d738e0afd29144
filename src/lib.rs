// Refs:
//   Build Your Own Text Editor: https://viewsourcecode.org/snaptoken/kilo/index.html
//   VT100 User Guide: https://vt100.net/docs/vt100-ug/chapter3.html

mod editor;
mod error;
mod input;
mod raw_mode;
mod row;
mod screen;
mod signal;
mod text_buffer;
mod viewport;


pub use editor::{CursorDir, Editor, EditorState};
pub use error::{Error, Result};
pub use input::{DecodeState, InputSequences, KeySeq, Step};
pub use raw_mode::{raw_mode_config, RawMode, StdinRawMode};
pub use row::Row;
pub use screen::{terminal_output, Screen, VERSION};
pub use signal::TerminationWatcher;
pub use text_buffer::{Lines, TextBuffer};
pub use viewport::{window_size, ViewportSize};
