use crate::error::{Error, Result};
use crate::row::Row;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;
use std::slice;

pub struct Lines<'a>(slice::Iter<'a, Row>);

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|r| r.buffer())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.as_slice().len();
        (len, Some(len))
    }
}

// Read lines splitting by \n. Trailing \n and \r are removed so both Unix and Windows line
// endings are accepted. Rows grow by Vec's amortized doubling while reading, then the spare
// capacity is released since a loaded text never grows.
fn read_rows<R: BufRead>(mut reader: R) -> io::Result<Vec<Row>> {
    let mut rows = vec![];
    let mut line = vec![];
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        while let Some(b'\n') | Some(b'\r') = line.last() {
            line.pop();
        }
        rows.push(Row::new(line.as_slice()));
    }
    rows.shrink_to_fit();
    Ok(rows)
}

#[derive(Default)]
pub struct TextBuffer {
    row: Vec<Row>,
}

impl TextBuffer {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_lines<'a, I: Iterator<Item = &'a str>>(lines: I) -> Self {
        Self {
            row: lines.map(Row::new).collect(),
        }
    }

    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        Ok(Self {
            row: read_rows(reader)?,
        })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let open_error = |source| Error::FileOpen {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(open_error)?;
        let row = read_rows(io::BufReader::new(file)).map_err(open_error)?;
        log::debug!("Loaded {} lines from {:?}", row.len(), path);

        Ok(Self { row })
    }

    pub fn rows(&self) -> &[Row] {
        &self.row
    }

    pub fn lines(&self) -> Lines<'_> {
        Lines(self.row.iter())
    }

    pub fn len(&self) -> usize {
        self.row.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load(content: &[u8]) -> TextBuffer {
        TextBuffer::from_reader(content).unwrap()
    }

    #[test]
    fn empty_buffer_has_no_rows() {
        let buf = TextBuffer::empty();
        assert!(buf.is_empty());
        assert_eq!(buf.lines().count(), 0);
    }

    #[test]
    fn empty_input_has_no_rows() {
        assert_eq!(load(b"").len(), 0);
    }

    #[test]
    fn mixed_line_endings() {
        let buf = load(b"unix\nwindows\r\n\r\nlast");
        let lines: Vec<_> = buf.lines().collect();
        assert_eq!(
            lines,
            vec![&b"unix"[..], &b"windows"[..], &b""[..], &b"last"[..]]
        );
        for line in buf.lines() {
            assert!(!line.ends_with(b"\n") && !line.ends_with(b"\r"));
        }
    }

    #[test]
    fn empty_lines_are_kept() {
        let buf = load(b"\n\n\n");
        assert_eq!(buf.len(), 3);
        assert!(buf.rows().iter().all(Row::is_empty));
    }

    #[test]
    fn stray_carriage_returns_are_stripped() {
        let buf = load(b"abc\r\r\n");
        assert_eq!(buf.lines().collect::<Vec<_>>(), vec![&b"abc"[..]]);
    }

    #[test]
    fn invalid_utf8_is_kept() {
        let buf = load(b"\xff\xfe\n");
        assert_eq!(buf.rows()[0].buffer(), b"\xff\xfe");
    }

    #[test]
    fn with_lines() {
        let buf = TextBuffer::with_lines(["hello", "", "world"].iter().copied());
        assert_eq!(
            buf.lines().map(|l| l.len()).collect::<Vec<_>>(),
            vec![5, 0, 5]
        );
    }

    #[test]
    fn open_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"first\r\nsecond\n").unwrap();
        f.flush().unwrap();

        let buf = TextBuffer::open(f.path()).unwrap();
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.rows()[1].buffer(), b"second");
    }

    #[test]
    fn open_empty_file() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let buf = TextBuffer::open(f.path()).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        match TextBuffer::open(&path) {
            Err(Error::FileOpen { path: p, source }) => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            Err(err) => panic!("unexpected error: {}", err),
            Ok(_) => panic!("missing file must not be opened"),
        }
    }
}
