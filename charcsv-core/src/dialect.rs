use core::fmt;

/// The delimiter and quote characters shared by a reader and a writer.
///
/// A dialect is always valid: the delimiter and quote differ from each other
/// and neither is a record terminator (`\r` or `\n`). Use [`Dialect::new`] to
/// build one from arbitrary characters.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Dialect {
    delimiter: char,
    quote: char,
}

impl Default for Dialect {
    fn default() -> Dialect {
        Dialect { delimiter: ',', quote: '"' }
    }
}

impl Dialect {
    /// Create a dialect from the given delimiter and quote characters.
    ///
    /// This fails when the two characters are equal or when either one is
    /// `\r` or `\n`.
    pub fn new(delimiter: char, quote: char) -> Result<Dialect, DialectError> {
        if delimiter == quote {
            return Err(DialectError::DelimiterIsQuote(delimiter));
        }
        if is_terminator(delimiter) {
            return Err(DialectError::DelimiterIsTerminator(delimiter));
        }
        if is_terminator(quote) {
            return Err(DialectError::QuoteIsTerminator(quote));
        }
        Ok(Dialect { delimiter, quote })
    }

    /// The field delimiter. The default is `,`.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// The quote character. The default is `"`.
    pub fn quote(&self) -> char {
        self.quote
    }
}

/// Returns true if `c` ends a record.
#[inline]
pub(crate) fn is_terminator(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// An invalid combination of dialect characters.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DialectError {
    /// The delimiter and the quote are the same character.
    DelimiterIsQuote(char),
    /// The delimiter is `\r` or `\n`.
    DelimiterIsTerminator(char),
    /// The quote is `\r` or `\n`.
    QuoteIsTerminator(char),
}

impl fmt::Display for DialectError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DialectError::DelimiterIsQuote(c) => write!(
                f,
                "invalid CSV dialect: delimiter and quote are both {:?}",
                c
            ),
            DialectError::DelimiterIsTerminator(c) => write!(
                f,
                "invalid CSV dialect: delimiter {:?} is a record terminator",
                c
            ),
            DialectError::QuoteIsTerminator(c) => write!(
                f,
                "invalid CSV dialect: quote {:?} is a record terminator",
                c
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DialectError {}

#[cfg(test)]
mod tests {
    use super::{Dialect, DialectError};

    #[test]
    fn default_is_comma_and_double_quote() {
        let d = Dialect::default();
        assert_eq!(d.delimiter(), ',');
        assert_eq!(d.quote(), '"');
    }

    #[test]
    fn custom() {
        let d = Dialect::new('\t', '\'').unwrap();
        assert_eq!(d.delimiter(), '\t');
        assert_eq!(d.quote(), '\'');
    }

    #[test]
    fn rejects_same_char() {
        assert_eq!(
            Dialect::new('|', '|'),
            Err(DialectError::DelimiterIsQuote('|'))
        );
    }

    #[test]
    fn rejects_terminators() {
        assert_eq!(
            Dialect::new('\n', '"'),
            Err(DialectError::DelimiterIsTerminator('\n'))
        );
        assert_eq!(
            Dialect::new(',', '\r'),
            Err(DialectError::QuoteIsTerminator('\r'))
        );
    }
}
