//! Trace Reader.
//!
//! This module parses memory traces, one event per line. It performs:
//! 1. **Tokenizing:** `<op> <address>` with `op` one of `r`, `R`, `w`, `W`.
//! 2. **Address parsing:** Hexadecimal, with or without a `0x` prefix.
//! 3. **Filtering:** Blank lines and `#` comments are skipped.
//!
//! Errors carry the 1-based line number of the offending line.

use std::io::BufRead;

use crate::common::data::AccessType;
use crate::common::error::TraceError;

/// One memory access of a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceEvent {
    /// Read or write.
    pub access: AccessType,
    /// Target byte address.
    pub addr: u64,
}

impl TraceEvent {
    /// Parses a single non-empty trace line.
    ///
    /// # Errors
    ///
    /// Returns a [`TraceError::Malformed`] tagged with `line` when the opcode
    /// is unknown, the address is missing or not hexadecimal, or trailing
    /// tokens follow the address.
    pub fn parse(text: &str, line: usize) -> Result<Self, TraceError> {
        let malformed = |reason: String| TraceError::Malformed { line, reason };

        let mut tokens = text.split_whitespace();
        let op = tokens.next().ok_or_else(|| malformed("empty line".into()))?;
        let access = op.parse::<AccessType>().map_err(malformed)?;

        let raw = tokens
            .next()
            .ok_or_else(|| malformed("missing address".into()))?;
        let digits = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .unwrap_or(raw);
        let addr = u64::from_str_radix(digits, 16)
            .map_err(|e| malformed(format!("bad address `{raw}`: {e}")))?;

        if let Some(extra) = tokens.next() {
            return Err(malformed(format!("unexpected token `{extra}`")));
        }
        Ok(Self { access, addr })
    }
}

/// Iterator over the events of a text trace.
#[derive(Debug)]
pub struct TraceReader<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    /// Number of lines consumed so far.
    pub const fn lines_read(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceEvent, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            self.line += 1;
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(source) => {
                    return Some(Err(TraceError::Io {
                        line: self.line,
                        source,
                    }));
                }
            }
            let text = self.buf.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            return Some(TraceEvent::parse(text, self.line));
        }
    }
}
