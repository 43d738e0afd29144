// One line of loaded text. Bytes are kept as-is; no encoding validation is performed and
// the line terminator is not included.
#[derive(Default, PartialEq, Debug, Clone)]
pub struct Row {
    buf: Vec<u8>,
}

impl Row {
    pub fn new<B: Into<Vec<u8>>>(line: B) -> Row {
        Row { buf: line.into() }
    }

    pub fn empty() -> Row {
        Row::default()
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    // Visible part of the row on screen with `width` columns. Longer lines are truncated, not wrapped
    pub fn truncated(&self, width: usize) -> &[u8] {
        &self.buf[..self.buf.len().min(width)]
    }
}
