//! Line Sources
//!
//! A line source produces the raw records of a feed, one per line, and can
//! be reopened to start again from the first record. Acquiring the feed
//! (download, unpacking) happens before a source is built.

mod file;

pub use file::FileSource;

use crate::error::{Result, SecdefError};
use crate::secdef::strip_terminator;
use std::io::BufRead;

/// Lazy sequence of raw records
pub type Lines<'a> = Box<dyn Iterator<Item = Result<String>> + 'a>;

/// Restartable, finite producer of raw records
pub trait LineSource {
    /// Human-readable name used in logs and errors
    fn name(&self) -> String;

    /// Start a fresh pass from the first record
    fn open(&self) -> Result<Lines<'_>>;
}

/// Records held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name: String,
    lines: Vec<String>,
}

impl MemorySource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MemorySource {
            name: "memory".to_string(),
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a whole feed on line boundaries
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl LineSource for MemorySource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn open(&self) -> Result<Lines<'_>> {
        Ok(Box::new(self.lines.iter().map(|line| Ok(line.clone()))))
    }
}

/// Byte-oriented line reader over any `BufRead`
///
/// Lines are split on `\n`, have `\r\n` stripped and are converted lossily,
/// so a stray non-UTF-8 byte damages one field instead of ending the pass.
/// A read error is yielded once and ends the iteration.
pub struct ReadLines<R> {
    reader: R,
    buf: Vec<u8>,
    line: u64,
    done: bool,
}

impl<R: BufRead> ReadLines<R> {
    pub fn new(reader: R) -> Self {
        ReadLines {
            reader,
            buf: Vec::with_capacity(1024),
            line: 0,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for ReadLines<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line += 1;
                let text = String::from_utf8_lossy(&self.buf);
                Some(Ok(strip_terminator(&text).to_string()))
            }
            Err(e) => {
                self.done = true;
                Some(Err(SecdefError::Io {
                    line: self.line,
                    reason: e.to_string(),
                }))
            }
        }
    }
}
