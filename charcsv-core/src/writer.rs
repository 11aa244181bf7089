use alloc::string::String;

use crate::dialect::{Dialect, DialectError};

/// The quoting style to use when writing CSV data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QuoteStyle {
    /// This puts quotes around every field. Always.
    Always,
    /// This puts quotes around fields only when necessary.
    ///
    /// They are necessary when fields contain a quote, delimiter or record
    /// terminator (`\r` or `\n`).
    ///
    /// This is the default.
    Necessary,
}

impl Default for QuoteStyle {
    fn default() -> QuoteStyle {
        QuoteStyle::Necessary
    }
}

/// A builder for configuring a CSV writer.
///
/// This builder permits specifying the CSV delimiter, quote and quoting
/// style.
#[derive(Clone, Debug)]
pub struct WriterBuilder {
    delimiter: char,
    quote: char,
    style: QuoteStyle,
}

impl Default for WriterBuilder {
    fn default() -> WriterBuilder {
        let dialect = Dialect::default();
        WriterBuilder {
            delimiter: dialect.delimiter(),
            quote: dialect.quote(),
            style: QuoteStyle::default(),
        }
    }
}

impl WriterBuilder {
    /// Create a new builder for configuring a CSV writer.
    pub fn new() -> WriterBuilder {
        WriterBuilder::default()
    }

    /// Build a CSV writer from this configuration.
    ///
    /// This fails if the delimiter and quote do not form a valid
    /// [`Dialect`].
    pub fn build(&self) -> Result<Writer, DialectError> {
        let dialect = Dialect::new(self.delimiter, self.quote)?;
        let mut wtr = Writer::with_dialect(dialect);
        wtr.style = self.style;
        Ok(wtr)
    }

    /// The field delimiter to use when writing CSV.
    ///
    /// The default is `,`.
    pub fn delimiter(&mut self, delimiter: char) -> &mut WriterBuilder {
        self.delimiter = delimiter;
        self
    }

    /// The quote character to use when writing CSV.
    ///
    /// The default is `"`.
    pub fn quote(&mut self, quote: char) -> &mut WriterBuilder {
        self.quote = quote;
        self
    }

    /// Use the delimiter and quote of an existing dialect.
    pub fn dialect(&mut self, dialect: Dialect) -> &mut WriterBuilder {
        self.delimiter = dialect.delimiter();
        self.quote = dialect.quote();
        self
    }

    /// The quoting style to use when writing CSV.
    ///
    /// By default, this is set to `QuoteStyle::Necessary`, which will only
    /// use quotes when they are necessary to preserve the integrity of data.
    pub fn quote_style(&mut self, style: QuoteStyle) -> &mut WriterBuilder {
        self.style = style;
        self
    }
}

/// A writer for CSV data.
///
/// Fields are escaped independently of each other. A field that needs quoting
/// is wrapped in quotes and every quote inside it is doubled. Records always
/// end with a single `\n`.
///
/// This writer does not guarantee that all records written are of the same
/// length. The onus is on the caller to ensure that, if it matters.
#[derive(Clone, Debug)]
pub struct Writer {
    dialect: Dialect,
    style: QuoteStyle,
    first_field_in_record: bool,
}

impl Default for Writer {
    fn default() -> Writer {
        Writer::with_dialect(Dialect::default())
    }
}

impl Writer {
    /// Creates a new CSV writer with the default configuration.
    pub fn new() -> Writer {
        Writer::default()
    }

    /// Creates a new CSV writer for the given dialect.
    pub fn with_dialect(dialect: Dialect) -> Writer {
        Writer {
            dialect,
            style: QuoteStyle::default(),
            first_field_in_record: true,
        }
    }

    /// The dialect used by this writer.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The quoting style used by this writer.
    pub fn quote_style(&self) -> QuoteStyle {
        self.style
    }

    /// Returns true if the given field must be quoted under this writer's
    /// quoting style.
    pub fn should_quote(&self, field: &str) -> bool {
        match self.style {
            QuoteStyle::Always => true,
            QuoteStyle::Necessary => field.chars().any(|c| {
                c == self.dialect.delimiter()
                    || c == self.dialect.quote()
                    || c == '\n'
                    || c == '\r'
            }),
        }
    }

    /// Append a single field to `output`, preceded by a delimiter unless it
    /// is the first field of the current record.
    pub fn write_field(&mut self, field: &str, output: &mut String) {
        if self.first_field_in_record {
            self.first_field_in_record = false;
        } else {
            output.push(self.dialect.delimiter());
        }
        if !self.should_quote(field) {
            output.push_str(field);
            return;
        }
        let quote = self.dialect.quote();
        output.reserve(field.len() + 2);
        output.push(quote);
        for c in field.chars() {
            if c == quote {
                output.push(quote);
            }
            output.push(c);
        }
        output.push(quote);
    }

    /// Append a record terminator to `output` and start a new record.
    pub fn write_terminator(&mut self, output: &mut String) {
        output.push('\n');
        self.first_field_in_record = true;
    }

    /// Abandon the current record so that the next field starts a new one.
    ///
    /// Nothing is written. Callers are responsible for discarding whatever
    /// was already written for the abandoned record.
    pub fn reset(&mut self) {
        self.first_field_in_record = true;
    }

    /// Returns true if no field has been written for the current record.
    pub fn is_record_start(&self) -> bool {
        self.first_field_in_record
    }
}
