use std::io::{ErrorKind, Read};
use std::time::{Duration, Instant};

use crate::{CollectError, TextEncoding};

/// Anything the sampler can pull newline-terminated records from.
pub trait LineSource {
    /// Returns the next line including its terminator, a partial line if the
    /// read timeout expired mid-line, or `None` if nothing arrived in time.
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, CollectError>;
}

impl<T: LineSource + ?Sized> LineSource for &mut T {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, CollectError> {
        (**self).read_line()
    }
}

/// Splits a byte stream into lines, bounding each attempt by `timeout`.
///
/// Bytes received after a newline are kept for the next call. A reader that
/// reports `TimedOut` or end-of-stream ends the attempt early.
///
/// The newline is matched on code-unit boundaries, so a UTF-16 stream is
/// split after `0A 00` at an even offset rather than after any `0A` byte.
pub struct LineReader<R> {
    inner: R,
    timeout: Duration,
    unit: usize,
    pending: Vec<u8>,
}

impl<R: Read> LineReader<R> {
    /// A reader for byte-oriented text (UTF-8, ASCII, GBK).
    pub fn new(inner: R, timeout: Duration) -> Self {
        Self::for_encoding(inner, timeout, TextEncoding::Utf8)
    }

    pub fn for_encoding(inner: R, timeout: Duration, encoding: TextEncoding) -> Self {
        Self {
            inner,
            timeout,
            unit: encoding.code_unit(),
            pending: Vec::new(),
        }
    }

    fn take_line(&mut self) -> Option<Vec<u8>> {
        let newline: &[u8] = if self.unit == 2 { b"\n\0" } else { b"\n" };
        let pos = self.pending.chunks_exact(self.unit).position(|unit| unit == newline)?;
        Some(self.pending.drain(..(pos + 1) * self.unit).collect())
    }

    fn take_partial(&mut self) -> Option<Vec<u8>> {
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }
}

impl<R: Read> LineSource for LineReader<R> {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, CollectError> {
        if let Some(line) = self.take_line() {
            return Ok(Some(line));
        }

        let deadline = Instant::now() + self.timeout;
        let mut buf = [0u8; 256];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(self.take_partial()),
                Ok(n) => {
                    self.pending.extend_from_slice(&buf[..n]);
                    if let Some(line) = self.take_line() {
                        return Ok(Some(line));
                    }
                }
                Err(e) if e.kind() == ErrorKind::TimedOut => return Ok(self.take_partial()),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(CollectError::Read(e)),
            }
            if Instant::now() >= deadline {
                return Ok(self.take_partial());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(data: &[u8]) -> LineReader<Cursor<Vec<u8>>> {
        LineReader::new(Cursor::new(data.to_vec()), Duration::from_secs(1))
    }

    #[test]
    fn test_splits_on_newline() {
        let mut lines = reader(b"1 2 3 4\r\n5 6 7 8\n");
        assert_eq!(lines.read_line().unwrap().as_deref(), Some(&b"1 2 3 4\r\n"[..]));
        assert_eq!(lines.read_line().unwrap().as_deref(), Some(&b"5 6 7 8\n"[..]));
        assert_eq!(lines.read_line().unwrap(), None);
    }

    #[test]
    fn test_trailing_partial_line_is_returned() {
        let mut lines = reader(b"1 2 3 4\n5 6");
        lines.read_line().unwrap();
        assert_eq!(lines.read_line().unwrap().as_deref(), Some(&b"5 6"[..]));
        assert_eq!(lines.read_line().unwrap(), None);
    }

    fn utf16(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    #[test]
    fn test_utf16_splits_on_wide_newline() {
        // U+0A31 encodes as `31 0A` and must not end the line
        let data = utf16("1 \u{a31} 3 4\r\n5 6 7 8\n");
        let mut lines =
            LineReader::for_encoding(Cursor::new(data), Duration::from_secs(1), TextEncoding::Utf16);
        assert_eq!(lines.read_line().unwrap(), Some(utf16("1 \u{a31} 3 4\r\n")));
        assert_eq!(lines.read_line().unwrap(), Some(utf16("5 6 7 8\n")));
        assert_eq!(lines.read_line().unwrap(), None);
    }

    #[test]
    fn test_odd_offset_newline_byte_is_not_a_terminator() {
        // `0A 00` straddling two code units
        let data = vec![b'1', b'\n', 0, b'2', b'\n', 0];
        let mut lines =
            LineReader::for_encoding(Cursor::new(data.clone()), Duration::from_secs(1), TextEncoding::Utf16);
        assert_eq!(lines.read_line().unwrap(), Some(data));
    }

    struct TimesOut;

    impl Read for TimesOut {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::TimedOut, "timed out"))
        }
    }

    #[test]
    fn test_timeout_is_an_empty_read() {
        let mut lines = LineReader::new(TimesOut, Duration::from_secs(1));
        assert_eq!(lines.read_line().unwrap(), None);
    }

    struct Unplugged;

    impl Read for Unplugged {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::BrokenPipe, "device removed"))
        }
    }

    #[test]
    fn test_device_error_is_reported() {
        let mut lines = LineReader::new(Unplugged, Duration::from_secs(1));
        assert!(matches!(lines.read_line(), Err(CollectError::Read(_))));
    }
}
