use std::io;

/// A sink of text that a CSV [`Writer`](crate::Writer) appends to.
///
/// The writer hands over one complete record per call. It never flushes or
/// closes a sink; that is up to whoever owns it.
pub trait CharSink {
    /// Append `text` to the sink.
    fn append(&mut self, text: &str) -> io::Result<()>;
}

impl<'a, W: CharSink + ?Sized> CharSink for &'a mut W {
    fn append(&mut self, text: &str) -> io::Result<()> {
        (**self).append(text)
    }
}

impl<W: CharSink + ?Sized> CharSink for Box<W> {
    fn append(&mut self, text: &str) -> io::Result<()> {
        (**self).append(text)
    }
}

impl CharSink for String {
    fn append(&mut self, text: &str) -> io::Result<()> {
        self.push_str(text);
        Ok(())
    }
}

/// A character sink that encodes text as UTF-8 into a byte writer.
///
/// Wrap the writer in an `io::BufWriter` when writing to a file or socket;
/// this sink issues one `write_all` per record.
#[derive(Debug)]
pub struct IoSink<W> {
    wtr: W,
}

impl<W: io::Write> IoSink<W> {
    /// Encode text into the given writer.
    pub fn new(wtr: W) -> IoSink<W> {
        IoSink { wtr }
    }

    /// Return a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.wtr
    }

    /// Return a mutable reference to the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.wtr
    }

    /// Unwrap this sink, returning the underlying writer.
    ///
    /// Nothing is flushed.
    pub fn into_inner(self) -> W {
        self.wtr
    }
}

impl<W: io::Write> CharSink for IoSink<W> {
    fn append(&mut self, text: &str) -> io::Result<()> {
        self.wtr.write_all(text.as_bytes())
    }
}
