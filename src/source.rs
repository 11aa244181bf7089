use std::io;
use std::str;

/// A source of characters that a CSV [`Reader`](crate::Reader) pulls from,
/// one character at a time.
///
/// `Ok(None)` signals the end of the source. The reader never asks a source
/// for more characters after it has seen the end, and never needs to push a
/// character back.
pub trait CharSource {
    /// Read the next character, or `None` if the source is exhausted.
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

impl<'a, S: CharSource + ?Sized> CharSource for &'a mut S {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        (**self).next_char()
    }
}

impl<S: CharSource + ?Sized> CharSource for Box<S> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        (**self).next_char()
    }
}

impl<'a> CharSource for str::Chars<'a> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.next())
    }
}

/// A character source that decodes UTF-8 from a buffered byte reader.
///
/// Malformed or truncated UTF-8 is reported as an I/O error of kind
/// `InvalidData`. Decoding is strict; nothing is replaced or skipped.
#[derive(Debug)]
pub struct IoSource<R> {
    rdr: R,
}

impl<R: io::BufRead> IoSource<R> {
    /// Decode characters from the given buffered reader.
    pub fn new(rdr: R) -> IoSource<R> {
        IoSource { rdr }
    }

    /// Return a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.rdr
    }

    /// Return a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.rdr
    }

    /// Unwrap this source, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.rdr
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = loop {
            match self.rdr.fill_buf() {
                Ok(buf) => break buf.first().cloned(),
                Err(ref err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        };
        if byte.is_some() {
            self.rdr.consume(1);
        }
        Ok(byte)
    }
}

impl<R: io::BufRead> CharSource for IoSource<R> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        let first = match self.next_byte()? {
            None => return Ok(None),
            Some(b) => b,
        };
        let width = utf8_width(first);
        if width == 0 {
            return Err(invalid_utf8(&[first]));
        }
        let mut buf = [first, 0, 0, 0];
        for i in 1..width {
            buf[i] = match self.next_byte()? {
                None => return Err(invalid_utf8(&buf[..i])),
                Some(b) => b,
            };
        }
        match str::from_utf8(&buf[..width]) {
            Ok(s) => Ok(s.chars().next()),
            Err(_) => Err(invalid_utf8(&buf[..width])),
        }
    }
}

/// The length of the UTF-8 sequence that starts with `b`, or `0` if `b`
/// cannot start one.
fn utf8_width(b: u8) -> usize {
    match b {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn invalid_utf8(bytes: &[u8]) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("invalid UTF-8 sequence {:02X?} in CSV data", bytes),
    )
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::{CharSource, IoSource};

    fn drain<S: CharSource>(mut src: S) -> io::Result<String> {
        let mut out = String::new();
        while let Some(c) = src.next_char()? {
            out.push(c);
        }
        Ok(out)
    }

    #[test]
    fn chars() {
        assert_eq!(drain("a,☃".chars()).unwrap(), "a,☃");
    }

    #[test]
    fn io_ascii() {
        let src = IoSource::new(&b"a,b\n"[..]);
        assert_eq!(drain(src).unwrap(), "a,b\n");
    }

    #[test]
    fn io_multi_byte() {
        let data = "é,☃,𝄞";
        let src = IoSource::new(io::BufReader::with_capacity(1, data.as_bytes()));
        assert_eq!(drain(src).unwrap(), data);
    }

    #[test]
    fn io_invalid_start() {
        let err = drain(IoSource::new(&b"a\xFFb"[..])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn io_truncated() {
        let err = drain(IoSource::new(&b"a\xE2\x98"[..])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn io_bad_continuation() {
        let err = drain(IoSource::new(&b"\xE2(a"[..])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn io_surrogate() {
        let err = drain(IoSource::new(&b"\xED\xA0\x80"[..])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
