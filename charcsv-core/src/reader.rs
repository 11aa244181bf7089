use crate::dialect::{is_terminator, Dialect, DialectError};

/// Builds a CSV reader with a custom dialect.
///
/// Once a `Reader` is built, its configuration cannot be changed.
#[derive(Clone, Debug)]
pub struct ReaderBuilder {
    delimiter: char,
    quote: char,
}

impl Default for ReaderBuilder {
    fn default() -> ReaderBuilder {
        let dialect = Dialect::default();
        ReaderBuilder {
            delimiter: dialect.delimiter(),
            quote: dialect.quote(),
        }
    }
}

impl ReaderBuilder {
    /// Create a new builder.
    pub fn new() -> ReaderBuilder {
        ReaderBuilder::default()
    }

    /// Build a CSV parser from this configuration.
    ///
    /// This fails if the delimiter and quote do not form a valid
    /// [`Dialect`].
    pub fn build(&self) -> Result<Reader, DialectError> {
        Dialect::new(self.delimiter, self.quote).map(Reader::with_dialect)
    }

    /// The field delimiter to use when parsing CSV.
    ///
    /// The default is `,`.
    pub fn delimiter(&mut self, delimiter: char) -> &mut ReaderBuilder {
        self.delimiter = delimiter;
        self
    }

    /// The quote character to use when parsing CSV.
    ///
    /// The default is `"`.
    pub fn quote(&mut self, quote: char) -> &mut ReaderBuilder {
        self.quote = quote;
        self
    }

    /// Use the delimiter and quote of an existing dialect.
    pub fn dialect(&mut self, dialect: Dialect) -> &mut ReaderBuilder {
        self.delimiter = dialect.delimiter();
        self.quote = dialect.quote();
        self
    }
}

/// What the caller should do with the character it just fed to
/// [`Reader::read`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReadResult {
    /// The character was consumed and contributes nothing to the output.
    ///
    /// Opening quotes, closing quotes and the `\n` of a `\r\n` pair are
    /// skipped.
    Skip,
    /// The given character belongs to the current field.
    ///
    /// This is not always the character that was fed: a doubled quote is
    /// reported as a single quote once the second one is seen.
    Char(char),
    /// The end of a field was found.
    ///
    /// When `record_end` is true, the end of this field is also the end of
    /// a record.
    Field {
        /// Whether this was the last field in a record or not.
        record_end: bool,
    },
    /// All CSV data has been read and no record is pending.
    ///
    /// Once this is returned, every subsequent call returns it too.
    End,
}

/// The quoting state of the field currently being parsed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    /// Outside of quotes. Delimiters and terminators are special.
    Unquoted,
    /// Inside a quoted field. Only the quote is special.
    Quoted,
    /// A quote was seen inside a quoted field. The next character decides
    /// whether it was a closing quote or the first half of a doubled quote.
    QuoteSeenInQuoted,
}

/// A pull based CSV reader that consumes exactly one character per call.
///
/// The grammar accepted by this reader is total: every sequence of characters
/// has a parse and no error is ever reported. In particular:
///
/// * A quote only opens a quoted field when it is the first character of the
///   field. Anywhere else it is an ordinary character, so `ab"c` is the field
///   `ab"c`.
/// * Inside a quoted field, two quotes in a row are one literal quote.
/// * A character after a closing quote that is neither a delimiter, a quote
///   nor a terminator is kept as an ordinary character. `"ab"c` is the field
///   `abc`.
/// * `\r`, `\n` and `\r\n` each end a record. A blank line is a record with
///   a single empty field.
/// * Input that ends without a terminator still produces its last record, and
///   an unterminated quoted field ends at the end of input.
///
/// Besides the quoting state of the current field, the reader only remembers
/// whether the current field and record are empty, whether the previous
/// record ended with `\r`, and whether the end of input has been reached.
#[derive(Clone, Debug)]
pub struct Reader {
    dialect: Dialect,
    state: State,
    /// No character has been reported for the current field yet.
    field_empty: bool,
    /// No field has been completed for the current record yet.
    record_empty: bool,
    /// The previous record was ended by a `\r`, so a `\n` right after it
    /// belongs to the same terminator.
    after_cr: bool,
    /// The end of input was seen.
    done: bool,
    /// The current line number.
    line: u64,
}

impl Default for Reader {
    fn default() -> Reader {
        Reader::with_dialect(Dialect::default())
    }
}

impl Reader {
    /// Create a new CSV reader with a default configuration.
    pub fn new() -> Reader {
        Reader::default()
    }

    /// Create a new CSV reader for the given dialect.
    pub fn with_dialect(dialect: Dialect) -> Reader {
        Reader {
            dialect,
            state: State::Unquoted,
            field_empty: true,
            record_empty: true,
            after_cr: false,
            done: false,
            line: 1,
        }
    }

    /// The dialect used by this reader.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The quoting state of the field currently being parsed.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns true once the end of input has been fed to this reader.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Reset the parser such that it behaves as if it had never been used.
    pub fn reset(&mut self) {
        *self = Reader::with_dialect(self.dialect);
    }

    /// Return the current line number as measured by the number of record
    /// terminators and quoted `\n` characters seen so far.
    ///
    /// Line numbers start at `1`.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Feed the next character, or `None` at the end of input, to the
    /// parser.
    pub fn read(&mut self, input: Option<char>) -> ReadResult {
        if self.done {
            return ReadResult::End;
        }
        let c = match input {
            None => return self.read_end(),
            Some(c) => c,
        };
        if self.after_cr {
            self.after_cr = false;
            if c == '\n' {
                return ReadResult::Skip;
            }
        }
        match self.state {
            State::Unquoted => {
                if c == self.dialect.quote() && self.field_empty {
                    self.state = State::Quoted;
                    ReadResult::Skip
                } else if c == self.dialect.delimiter() {
                    self.end_field()
                } else if is_terminator(c) {
                    self.end_record(c)
                } else {
                    self.push(c)
                }
            }
            State::Quoted => {
                if c == self.dialect.quote() {
                    self.state = State::QuoteSeenInQuoted;
                    ReadResult::Skip
                } else {
                    if c == '\n' {
                        self.line += 1;
                    }
                    self.push(c)
                }
            }
            State::QuoteSeenInQuoted => {
                if c == self.dialect.quote() {
                    self.state = State::Quoted;
                    self.push(c)
                } else if c == self.dialect.delimiter() {
                    self.state = State::Unquoted;
                    self.end_field()
                } else if is_terminator(c) {
                    self.end_record(c)
                } else {
                    self.state = State::Unquoted;
                    self.push(c)
                }
            }
        }
    }

    fn read_end(&mut self) -> ReadResult {
        self.done = true;
        let pending = match self.state {
            State::Quoted | State::QuoteSeenInQuoted => true,
            State::Unquoted => !self.field_empty || !self.record_empty,
        };
        if !pending {
            return ReadResult::End;
        }
        self.state = State::Unquoted;
        self.field_empty = true;
        self.record_empty = true;
        ReadResult::Field { record_end: true }
    }

    fn push(&mut self, c: char) -> ReadResult {
        self.field_empty = false;
        ReadResult::Char(c)
    }

    fn end_field(&mut self) -> ReadResult {
        self.field_empty = true;
        self.record_empty = false;
        ReadResult::Field { record_end: false }
    }

    fn end_record(&mut self, terminator: char) -> ReadResult {
        self.state = State::Unquoted;
        self.field_empty = true;
        self.record_empty = true;
        self.after_cr = terminator == '\r';
        self.line += 1;
        ReadResult::Field { record_end: true }
    }
}
