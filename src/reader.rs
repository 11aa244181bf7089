use std::fs::File;
use std::io;
use std::path::Path;
use std::str;

use charcsv_core::{
    Dialect, ReadResult, Reader as CoreReader,
    ReaderBuilder as CoreReaderBuilder,
};
use log::{debug, trace};

use crate::error::Result;
use crate::row::Row;
use crate::source::{CharSource, IoSource};

/// Builds a CSV reader with various configuration knobs.
///
/// This builder can be used to tweak the field delimiter and quote character
/// for parsing CSV. Once a CSV `Reader` is built, its configuration cannot be
/// changed.
///
/// Every constructor on this builder checks the configuration first and
/// returns [`Error::Dialect`](crate::Error::Dialect) if the delimiter and
/// quote cannot work together.
#[derive(Debug, Default)]
pub struct ReaderBuilder {
    builder: CoreReaderBuilder,
}

impl ReaderBuilder {
    /// Create a new builder for configuring CSV parsing.
    ///
    /// To convert a builder into a reader, call one of the methods starting
    /// with `from_`.
    ///
    /// # Example
    ///
    /// ```
    /// use charcsv::{ReaderBuilder, Row};
    ///
    /// # fn main() -> charcsv::Result<()> {
    /// let mut rdr = ReaderBuilder::new()
    ///     .delimiter(';')
    ///     .from_text("city;pop\n\"Boston; MA\";4628910\n")?;
    /// let rows: Vec<Row> = rdr.rows().collect::<charcsv::Result<_>>()?;
    /// assert_eq!(rows[1], vec!["Boston; MA", "4628910"]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new() -> ReaderBuilder {
        ReaderBuilder::default()
    }

    /// Build a CSV reader from this configuration that pulls characters
    /// from the given source.
    pub fn from_source<S: CharSource>(&self, src: S) -> Result<Reader<S>> {
        let core = self.builder.build()?;
        debug!(
            "CSV reader with delimiter {:?} and quote {:?}",
            core.dialect().delimiter(),
            core.dialect().quote()
        );
        Ok(Reader::new(core, src))
    }

    /// Build a CSV reader from this configuration that reads the given
    /// string.
    pub fn from_text<'a>(&self, text: &'a str) -> Result<Reader<str::Chars<'a>>> {
        self.from_source(text.chars())
    }

    /// Build a CSV reader from this configuration that decodes UTF-8 from
    /// the given `io::Read`.
    ///
    /// The reader is buffered for you automatically.
    pub fn from_reader<R: io::Read>(
        &self,
        rdr: R,
    ) -> Result<Reader<IoSource<io::BufReader<R>>>> {
        self.from_source(IoSource::new(io::BufReader::new(rdr)))
    }

    /// Build a CSV reader from this configuration that reads data from the
    /// file at `path`.
    ///
    /// If there was a problem opening the file, then this returns the
    /// corresponding I/O error.
    pub fn from_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Reader<IoSource<io::BufReader<File>>>> {
        self.from_reader(File::open(path)?)
    }

    /// The field delimiter to use when parsing CSV.
    ///
    /// The default is `,`.
    pub fn delimiter(&mut self, delimiter: char) -> &mut ReaderBuilder {
        self.builder.delimiter(delimiter);
        self
    }

    /// The quote character to use when parsing CSV.
    ///
    /// The default is `"`.
    pub fn quote(&mut self, quote: char) -> &mut ReaderBuilder {
        self.builder.quote(quote);
        self
    }

    /// Use the delimiter and quote of an existing dialect.
    pub fn dialect(&mut self, dialect: Dialect) -> &mut ReaderBuilder {
        self.builder.dialect(dialect);
        self
    }
}

/// A position in CSV data.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Position {
    char: u64,
    line: u64,
    row: u64,
}

impl Position {
    /// The number of characters consumed so far, starting at `0`.
    pub fn char(&self) -> u64 {
        self.char
    }

    /// The current line number, starting at `1`.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// The number of rows read so far, which is also the index of the next
    /// row.
    pub fn row(&self) -> u64 {
        self.row
    }
}

/// A CSV reader.
///
/// This reader pulls characters from a [`CharSource`] one at a time and
/// groups them into [`Row`]s. It reads exactly as far as it needs to finish
/// the current row, so an unbounded source can be read row by row.
///
/// Malformed CSV never produces an error; see
/// [`charcsv_core::Reader`] for the exact grammar. The only errors come from
/// the source itself and are returned untouched.
///
/// # Example
///
/// ```
/// use charcsv::Reader;
///
/// # fn main() -> charcsv::Result<()> {
/// let data = "a,\"he said \"\"hi\"\"\",c\nab\"c,d\n";
/// let mut rdr = Reader::from_text(data);
/// let mut rows = vec![];
/// for row in rdr.rows() {
///     rows.push(row?.to_vec());
/// }
/// assert_eq!(rows, vec![
///     vec!["a", "he said \"hi\"", "c"],
///     vec!["ab\"c", "d"],
/// ]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Reader<S> {
    core: CoreReader,
    src: S,
    pos: Position,
    /// The last read failed part way through a row.
    resume: bool,
}

impl<'a> Reader<str::Chars<'a>> {
    /// Create a new CSV reader with a default configuration over the given
    /// string.
    pub fn from_text(text: &'a str) -> Reader<str::Chars<'a>> {
        Reader::from_source(text.chars())
    }
}

impl<R: io::Read> Reader<IoSource<io::BufReader<R>>> {
    /// Create a new CSV reader with a default configuration that decodes
    /// UTF-8 from the given `io::Read`.
    ///
    /// The reader is buffered for you automatically.
    pub fn from_reader(rdr: R) -> Reader<IoSource<io::BufReader<R>>> {
        Reader::from_source(IoSource::new(io::BufReader::new(rdr)))
    }
}

impl Reader<IoSource<io::BufReader<File>>> {
    /// Create a new CSV reader with a default configuration for the file at
    /// `path`.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Reader<IoSource<io::BufReader<File>>>> {
        Ok(Reader::from_reader(File::open(path)?))
    }
}

impl<S: CharSource> Reader<S> {
    /// Create a new CSV reader with a default configuration over the given
    /// character source.
    pub fn from_source(src: S) -> Reader<S> {
        Reader::new(CoreReader::default(), src)
    }

    fn new(core: CoreReader, src: S) -> Reader<S> {
        Reader {
            core,
            src,
            pos: Position { char: 0, line: 1, row: 0 },
            resume: false,
        }
    }

    /// Read the next row into `row`.
    ///
    /// Returns `true` if a row was read and `false` once the source is
    /// exhausted, in which case `row` is left empty. A row read by this
    /// method always has at least one field.
    ///
    /// `row` is cleared first, so a single `Row` can be reused to avoid an
    /// allocation per row. The exception is a call following an error from
    /// the source: `row` then still holds the fields read before the error,
    /// and passing the same `row` again picks up where the failed call
    /// stopped.
    pub fn read_row(&mut self, row: &mut Row) -> Result<bool> {
        if !self.resume {
            row.clear();
        }
        self.resume = false;
        while !self.core.is_done() {
            let input = match self.src.next_char() {
                Ok(input) => input,
                Err(err) => {
                    self.resume = true;
                    return Err(err.into());
                }
            };
            if input.is_some() {
                self.pos.char += 1;
            }
            match self.core.read(input) {
                ReadResult::Skip => {}
                ReadResult::Char(c) => row.push_char(c),
                ReadResult::Field { record_end } => {
                    row.end_field();
                    if record_end {
                        self.pos.row += 1;
                        self.pos.line = self.core.line();
                        return Ok(true);
                    }
                }
                ReadResult::End => {
                    trace!("end of CSV data after {} rows", self.pos.row);
                }
            }
        }
        row.clear();
        Ok(false)
    }

    /// Returns a borrowed iterator over all rows as `Row`s.
    ///
    /// Each item yielded by this iterator is a `Result<Row, Error>`.
    /// Iteration stops after the source is exhausted. An I/O error is
    /// yielded as an item; if iteration continues, the row that was
    /// interrupted is completed with whatever the source produces next.
    pub fn rows(&mut self) -> RowsIter<S> {
        RowsIter { rdr: self, row: Row::new() }
    }

    /// Returns an owned iterator over all rows as `Row`s.
    pub fn into_rows(self) -> RowsIntoIter<S> {
        RowsIntoIter { rdr: self, row: Row::new() }
    }

    /// Returns the current position of this reader.
    pub fn position(&self) -> &Position {
        &self.pos
    }

    /// Returns true if and only if this reader has exhausted its source.
    pub fn is_done(&self) -> bool {
        self.core.is_done()
    }

    /// The dialect used by this reader.
    pub fn dialect(&self) -> Dialect {
        self.core.dialect()
    }

    /// Returns a reference to the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.src
    }

    /// Returns a mutable reference to the underlying source.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.src
    }

    /// Unwraps this CSV reader, returning the underlying source.
    ///
    /// Characters the reader has not asked for yet are still in the source.
    pub fn into_inner(self) -> S {
        self.src
    }
}

/// A borrowed iterator over rows.
///
/// The lifetime parameter `'r` refers to the lifetime of the underlying CSV
/// `Reader`.
#[derive(Debug)]
pub struct RowsIter<'r, S: 'r> {
    rdr: &'r mut Reader<S>,
    row: Row,
}

impl<'r, S: CharSource> Iterator for RowsIter<'r, S> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Result<Row>> {
        match self.rdr.read_row(&mut self.row) {
            Err(err) => Some(Err(err)),
            Ok(true) => Some(Ok(self.row.clone())),
            Ok(false) => None,
        }
    }
}

/// An owned iterator over rows.
#[derive(Debug)]
pub struct RowsIntoIter<S> {
    rdr: Reader<S>,
    row: Row,
}

impl<S: CharSource> RowsIntoIter<S> {
    /// Return a reference to the underlying CSV reader.
    pub fn reader(&self) -> &Reader<S> {
        &self.rdr
    }

    /// Drop this iterator and return the underlying CSV reader.
    pub fn into_reader(self) -> Reader<S> {
        self.rdr
    }
}

impl<S: CharSource> Iterator for RowsIntoIter<S> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Result<Row>> {
        match self.rdr.read_row(&mut self.row) {
            Err(err) => Some(Err(err)),
            Ok(true) => Some(Ok(self.row.clone())),
            Ok(false) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use crate::error::Error;
    use crate::row::Row;
    use crate::source::CharSource;

    use super::{Reader, ReaderBuilder};

    fn rows<S: CharSource>(rdr: Reader<S>) -> Vec<Vec<String>> {
        rdr.into_rows().map(|row| row.unwrap().to_vec()).collect()
    }

    /// A source that yields the given characters and then fails once.
    struct Flaky {
        chars: Vec<char>,
        failed: bool,
    }

    impl CharSource for Flaky {
        fn next_char(&mut self) -> io::Result<Option<char>> {
            if !self.chars.is_empty() {
                return Ok(Some(self.chars.remove(0)));
            }
            if !self.failed {
                self.failed = true;
                return Err(io::Error::new(io::ErrorKind::TimedOut, "flaky"));
            }
            Ok(None)
        }
    }

    #[test]
    fn read_row_one_at_a_time() {
        let mut rdr = Reader::from_text("a,b\nc\n");
        let mut row = Row::new();

        assert!(rdr.read_row(&mut row).unwrap());
        assert_eq!(row, vec!["a", "b"]);
        assert!(rdr.read_row(&mut row).unwrap());
        assert_eq!(row, vec!["c"]);
        assert!(!rdr.read_row(&mut row).unwrap());
        assert!(row.is_empty());
        assert!(rdr.is_done());
        assert!(!rdr.read_row(&mut row).unwrap());
    }

    #[test]
    fn trailing_partial_line() {
        assert_eq!(rows(Reader::from_text("a\nb,c")), vec![
            vec!["a"],
            vec!["b", "c"],
        ]);
    }

    #[test]
    fn no_spurious_last_row() {
        assert_eq!(rows(Reader::from_text("a\nb\n")), vec![
            vec!["a"],
            vec!["b"],
        ]);
        assert_eq!(rows(Reader::from_text("a\r\nb\r\n")), vec![
            vec!["a"],
            vec!["b"],
        ]);
        assert!(rows(Reader::from_text("")).is_empty());
    }

    #[test]
    fn empty_fields() {
        assert_eq!(rows(Reader::from_text("a,,c\n")), vec![vec!["a", "", "c"]]);
    }

    #[test]
    fn from_reader_decodes_utf8() {
        let data = "é,\"☃\n𝄞\"\n".as_bytes();
        assert_eq!(rows(Reader::from_reader(data)), vec![vec!["é", "☃\n𝄞"]]);
    }

    #[test]
    fn from_reader_bad_utf8() {
        let mut rdr = Reader::from_reader(&b"a,\xFF\n"[..]);
        let err = rdr.read_row(&mut Row::new()).unwrap_err();
        match err {
            Error::Io(ref err) => {
                assert_eq!(err.kind(), io::ErrorKind::InvalidData)
            }
            ref err => panic!("unexpected error: {:?}", err),
        }
    }

    #[test]
    fn source_error_passes_through() {
        let src = Flaky { chars: "a,b\nc".chars().collect(), failed: false };
        let mut rdr = Reader::from_source(src);
        let mut it = rdr.rows();

        assert_eq!(it.next().unwrap().unwrap(), vec!["a", "b"]);
        match it.next().unwrap() {
            Err(Error::Io(err)) => {
                assert_eq!(err.kind(), io::ErrorKind::TimedOut)
            }
            other => panic!("unexpected result: {:?}", other),
        }
        // The interrupted row picks up where it stopped.
        assert_eq!(it.next().unwrap().unwrap(), vec!["c"]);
        assert!(it.next().is_none());
    }

    #[test]
    fn builder_dialect() {
        let rdr = ReaderBuilder::new()
            .delimiter('\t')
            .quote('\'')
            .from_text("a\t'b\tc'\t\"d\"")
            .unwrap();
        assert_eq!(rows(rdr), vec![vec!["a", "b\tc", "\"d\""]]);
    }

    #[test]
    fn builder_rejects_bad_dialect() {
        let err = ReaderBuilder::new().delimiter('"').from_text("").unwrap_err();
        match err {
            Error::Dialect(_) => {}
            err => panic!("unexpected error: {:?}", err),
        }
        let err = ReaderBuilder::new().quote('\n').from_text("").unwrap_err();
        assert!(!err.is_io_error());
    }

    #[test]
    fn from_path_missing_file() {
        let err = Reader::from_path("/this/path/does/not/exist.csv")
            .unwrap_err();
        assert!(err.is_io_error());
    }

    #[test]
    fn positions() {
        let mut rdr = Reader::from_text("a,b\r\n\"c\nd\",e\nf");
        let mut row = Row::new();
        assert_eq!(rdr.position().row(), 0);
        assert_eq!(rdr.position().line(), 1);

        assert!(rdr.read_row(&mut row).unwrap());
        assert_eq!(rdr.position().row(), 1);
        assert_eq!(rdr.position().line(), 2);
        assert_eq!(rdr.position().char(), 4);

        assert!(rdr.read_row(&mut row).unwrap());
        assert_eq!(rdr.position().row(), 2);
        assert_eq!(rdr.position().line(), 4);

        assert!(rdr.read_row(&mut row).unwrap());
        assert_eq!(rdr.position().row(), 3);
        assert_eq!(rdr.position().char(), 14);
        assert_eq!(rdr.position().line(), 4);
    }

    #[test]
    fn into_inner_returns_rest() {
        let mut rdr = Reader::from_text("a\nb,c\n");
        let mut row = Row::new();
        assert!(rdr.read_row(&mut row).unwrap());
        assert_eq!(rdr.into_inner().as_str(), "b,c\n");
    }
}
