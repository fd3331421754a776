//! Newline framing over a byte stream.
//!
//! Bytes arrive in arbitrary chunks; the assembler buffers them and hands
//! out one logical line per `\n`, stripping a single trailing `\r`.

use crate::error::FrameError;

/// Default cap on a single line, delimiter excluded
pub const DEFAULT_MAX_LINE_LENGTH: usize = 4096;

const DELIMITER: u8 = b'\n';
const CARRIAGE_RETURN: u8 = b'\r';

/// Reassembles logical lines from received bytes.
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    buffer: Vec<u8>,
    max_line_length: usize,
}

impl FrameAssembler {
    /// Create an empty assembler with the given line cap.
    pub fn new(max_line_length: usize) -> Self {
        Self {
            buffer: Vec::new(),
            max_line_length,
        }
    }

    /// Append `bytes` and return the lines that are now complete.
    ///
    /// The returned iterator is lazy: lines it does not yield stay buffered
    /// and come out of the next call. Once the cap is exceeded it yields a
    /// single [`FrameError::LineTooLong`], drops everything buffered and ends.
    pub fn feed(&mut self, bytes: &[u8]) -> Frames<'_> {
        self.buffer.extend_from_slice(bytes);
        Frames {
            assembler: self,
            finished: false,
        }
    }

    /// Number of bytes held back waiting for a delimiter.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Drop any partial line.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Length of `bytes` without a trailing carriage return.
    fn content_len(bytes: &[u8]) -> usize {
        match bytes.last() {
            Some(&CARRIAGE_RETURN) => bytes.len() - 1,
            _ => bytes.len(),
        }
    }

    // The cap applies to the line content; a CRLF terminator is not counted.
    fn next_line(&mut self) -> Option<Result<String, FrameError>> {
        let max = self.max_line_length;
        match self.buffer.iter().position(|&b| b == DELIMITER) {
            Some(end) if Self::content_len(&self.buffer[..end]) > max => {
                let actual = Self::content_len(&self.buffer[..end]);
                self.buffer.clear();
                Some(Err(FrameError::LineTooLong { max, actual }))
            }
            Some(end) => {
                let mut line: Vec<u8> = self.buffer.drain(..=end).collect();
                line.pop();
                if line.last() == Some(&CARRIAGE_RETURN) {
                    line.pop();
                }
                Some(Ok(String::from_utf8_lossy(&line).into_owned()))
            }
            None if Self::content_len(&self.buffer) > max => {
                let actual = Self::content_len(&self.buffer);
                self.buffer.clear();
                Some(Err(FrameError::LineTooLong { max, actual }))
            }
            None => None,
        }
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_LENGTH)
    }
}

/// Lines produced by one [`FrameAssembler::feed`] call.
#[derive(Debug)]
pub struct Frames<'a> {
    assembler: &'a mut FrameAssembler,
    finished: bool,
}

impl Iterator for Frames<'_> {
    type Item = Result<String, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = self.assembler.next_line();
        if !matches!(item, Some(Ok(_))) {
            self.finished = true;
        }
        item
    }
}
