use std::io;

use charcsv_core::{
    Dialect, QuoteStyle, Writer as CoreWriter, WriterBuilder as CoreWriterBuilder,
};
use log::debug;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::serializer::{serialize, serialize_header};
use crate::sink::{CharSink, IoSink};

/// Builds a CSV writer with various configuration knobs.
///
/// This builder can be used to tweak the field delimiter, quote character,
/// quoting style and header handling. Once a CSV `Writer` is built, its
/// configuration cannot be changed.
#[derive(Debug)]
pub struct WriterBuilder {
    builder: CoreWriterBuilder,
    has_headers: bool,
}

impl Default for WriterBuilder {
    fn default() -> WriterBuilder {
        WriterBuilder { builder: CoreWriterBuilder::default(), has_headers: true }
    }
}

impl WriterBuilder {
    /// Create a new builder for configuring CSV writing.
    ///
    /// To convert a builder into a writer, call one of the methods starting
    /// with `from_`.
    ///
    /// # Example
    ///
    /// ```
    /// use charcsv::WriterBuilder;
    ///
    /// # fn main() -> charcsv::Result<()> {
    /// let mut wtr = WriterBuilder::new().delimiter('\t').from_sink(String::new())?;
    /// wtr.write_row(&["a", "b\tc"])?;
    /// assert_eq!(wtr.into_inner(), "a\t\"b\tc\"\n");
    /// # Ok(())
    /// # }
    /// ```
    pub fn new() -> WriterBuilder {
        WriterBuilder::default()
    }

    /// Build a CSV writer from this configuration that appends to the given
    /// sink.
    pub fn from_sink<W: CharSink>(&self, sink: W) -> Result<Writer<W>> {
        let core = self.builder.build()?;
        debug!(
            "CSV writer with delimiter {:?}, quote {:?} and {:?} quoting",
            core.dialect().delimiter(),
            core.dialect().quote(),
            core.quote_style()
        );
        Ok(Writer::new(core, self.has_headers, sink))
    }

    /// Build a CSV writer from this configuration that writes UTF-8 to the
    /// given `io::Write`.
    ///
    /// The writer is not buffered. Wrap `wtr` in an `io::BufWriter` if each
    /// record should not be its own `write` call.
    pub fn from_writer<W: io::Write>(&self, wtr: W) -> Result<Writer<IoSink<W>>> {
        self.from_sink(IoSink::new(wtr))
    }

    /// The field delimiter to use when writing CSV.
    ///
    /// The default is `,`.
    pub fn delimiter(&mut self, delimiter: char) -> &mut WriterBuilder {
        self.builder.delimiter(delimiter);
        self
    }

    /// The quote character to use when writing CSV.
    ///
    /// The default is `"`.
    pub fn quote(&mut self, quote: char) -> &mut WriterBuilder {
        self.builder.quote(quote);
        self
    }

    /// Use the delimiter and quote of an existing dialect.
    pub fn dialect(&mut self, dialect: Dialect) -> &mut WriterBuilder {
        self.builder.dialect(dialect);
        self
    }

    /// The quoting style to use when writing CSV.
    ///
    /// By default, this is set to `QuoteStyle::Necessary`, which will only
    /// use quotes when they are necessary to preserve the integrity of data.
    pub fn quote_style(&mut self, style: QuoteStyle) -> &mut WriterBuilder {
        self.builder.quote_style(style);
        self
    }

    /// Whether to write a header row before the first serialized struct.
    ///
    /// When enabled (the default), the first call to `Writer::serialize`
    /// with a struct writes the struct's field names as a row before the
    /// record itself. Nothing else about writing is affected: `write_row`
    /// never writes headers.
    pub fn has_headers(&mut self, yes: bool) -> &mut WriterBuilder {
        self.has_headers = yes;
        self
    }
}

/// The header state of a writer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum HeaderState {
    /// Write a header on the next call to `serialize`, if the value is a
    /// struct.
    Write,
    /// A header row with the given number of names was written.
    DidWrite(usize),
    /// The first serialized value had no field names, or headers are
    /// disabled.
    None,
}

/// A CSV writer.
///
/// Each row is escaped field by field into an internal line buffer and then
/// appended to the [`CharSink`] in one call. The writer never flushes or
/// closes the sink; use [`into_inner`](Writer::into_inner) or
/// [`get_mut`](Writer::get_mut) to get at it.
///
/// # Example
///
/// ```
/// use charcsv::Writer;
///
/// # fn main() -> charcsv::Result<()> {
/// let mut wtr = Writer::from_sink(String::new());
/// wtr.write_rows(vec![
///     vec!["Name", "Description"],
///     vec!["Product A", "Item with, comma"],
///     vec!["Product B", "Item with \"quotes\""],
/// ])?;
/// assert_eq!(wtr.into_inner(), "\
/// Name,Description
/// Product A,\"Item with, comma\"
/// Product B,\"Item with \"\"quotes\"\"\"
/// ");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Writer<W> {
    core: CoreWriter,
    sink: W,
    /// The row being assembled.
    line: String,
    header: HeaderState,
}

impl<W: io::Write> Writer<IoSink<W>> {
    /// Create a new CSV writer with a default configuration that writes
    /// UTF-8 to the given `io::Write`.
    pub fn from_writer(wtr: W) -> Writer<IoSink<W>> {
        Writer::from_sink(IoSink::new(wtr))
    }
}

impl<W: CharSink> Writer<W> {
    /// Create a new CSV writer with a default configuration that appends to
    /// the given sink.
    pub fn from_sink(sink: W) -> Writer<W> {
        Writer::new(CoreWriter::default(), true, sink)
    }

    fn new(core: CoreWriter, has_headers: bool, sink: W) -> Writer<W> {
        let header =
            if has_headers { HeaderState::Write } else { HeaderState::None };
        Writer { core, sink, line: String::new(), header }
    }

    /// Write a single row.
    ///
    /// Each field is quoted if it contains the delimiter, the quote or a
    /// line break, and every quote inside a quoted field is doubled. The row
    /// always ends with a single `\n`.
    ///
    /// An empty row is written as an empty line, which reads back as a row
    /// with a single empty field.
    ///
    /// If a row was started with [`write_field`](Writer::write_field), the
    /// given fields are appended to it.
    pub fn write_row<I, T>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for field in row {
            self.write_field(field)?;
        }
        self.write_terminator()
    }

    /// Write every row of `rows`, in order.
    pub fn write_rows<R, I, T>(&mut self, rows: R) -> Result<()>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }

    /// Write a single field to the current row.
    ///
    /// Nothing reaches the sink until the row is ended with
    /// [`write_terminator`](Writer::write_terminator).
    pub fn write_field<T: AsRef<str>>(&mut self, field: T) -> Result<()> {
        self.core.write_field(field.as_ref(), &mut self.line);
        Ok(())
    }

    /// End the current row and append it to the sink.
    ///
    /// If the sink fails, the row is discarded and the error is returned.
    pub fn write_terminator(&mut self) -> Result<()> {
        self.core.write_terminator(&mut self.line);
        let res = self.sink.append(&self.line);
        self.line.clear();
        res.map_err(From::from)
    }

    /// Serialize a single record using Serde.
    ///
    /// Scalars become their canonical text before any escaping happens:
    /// integers and floats are formatted with `itoa` and `ryu`, booleans as
    /// `true`/`false`, and `None` or `()` as an empty field. Structs,
    /// tuples, sequences and newtypes are flattened into the fields of one
    /// row. Maps and enum tuple or struct variants are not supported.
    ///
    /// If headers are enabled and this is the first call to `serialize`
    /// with a struct, a row of the struct's field names is written first.
    /// A nested struct contributes the names of its own fields. A struct
    /// field holding a sequence or tuple has no names for its columns, so
    /// such a struct cannot be the first record when headers are enabled.
    /// Once a header row is written, every later record must have as many
    /// fields as the header has names.
    ///
    /// Each record is a complete row. It is an error to call `serialize`
    /// while a row started with [`write_field`](Writer::write_field) is
    /// unfinished; that row is left as it is.
    ///
    /// If the value cannot be serialized, nothing is written for it.
    ///
    /// # Example
    ///
    /// ```
    /// use charcsv::Writer;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct City<'a> {
    ///     name: &'a str,
    ///     population: Option<u64>,
    ///     latitude: f64,
    /// }
    ///
    /// # fn main() -> charcsv::Result<()> {
    /// let mut wtr = Writer::from_sink(String::new());
    /// wtr.serialize(City { name: "Boston, MA", population: None, latitude: 42.5 })?;
    /// wtr.serialize(City { name: "Oslo", population: Some(709037), latitude: 59.9 })?;
    /// assert_eq!(wtr.into_inner(), "\
    /// name,population,latitude
    /// \"Boston, MA\",,42.5
    /// Oslo,709037,59.9
    /// ");
    /// # Ok(())
    /// # }
    /// ```
    pub fn serialize<S: Serialize>(&mut self, record: S) -> Result<()> {
        if !self.core.is_record_start() {
            return Err(Error::Serialize(
                "cannot serialize a record while a row is in progress"
                    .to_string(),
            ));
        }
        if self.header == HeaderState::Write {
            match serialize_header(self, &record) {
                Ok(0) => self.header = HeaderState::None,
                Ok(names) => {
                    debug!("wrote CSV header row with {} names", names);
                    self.write_terminator()?;
                    self.header = HeaderState::DidWrite(names);
                }
                Err(err) => {
                    self.discard_row();
                    return Err(err);
                }
            }
        }
        let fields = match serialize(self, &record) {
            Ok(fields) => fields,
            Err(err) => {
                self.discard_row();
                return Err(err);
            }
        };
        if let HeaderState::DidWrite(names) = self.header {
            if fields != names {
                self.discard_row();
                return Err(Error::Serialize(format!(
                    "record has {} fields but the header row has {}",
                    fields, names
                )));
            }
        }
        self.write_terminator()
    }

    /// Drop every field written since the last terminator.
    fn discard_row(&mut self) {
        self.line.clear();
        self.core.reset();
    }

    /// The dialect used by this writer.
    pub fn dialect(&self) -> Dialect {
        self.core.dialect()
    }

    /// Returns a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Returns a mutable reference to the underlying sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Unwraps this CSV writer, returning the underlying sink.
    ///
    /// Fields written since the last terminator are dropped.
    pub fn into_inner(self) -> W {
        self.sink
    }
}
