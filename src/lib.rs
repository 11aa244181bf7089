/*!
The `charcsv` crate reads and writes CSV one character at a time.

A [`Reader`] pulls characters from a [`CharSource`] and hands back one
[`Row`] per call. A [`Writer`] escapes rows and appends them to a
[`CharSink`]. Both share a [`Dialect`]: a delimiter (`,` by default) and a
quote character (`"` by default).

# Reading

```
use charcsv::Reader;

# fn main() -> charcsv::Result<()> {
let data = "\
city,country,note
Boston,United States,\"first line
second line\"
Concord,United States,
";
let mut rdr = Reader::from_text(data);
for result in rdr.rows() {
    let row = result?;
    assert_eq!(row.len(), 3);
}
# Ok(())
# }
```

The reader never rejects its input. A quote opens a quoted field only when it
is the first character of that field, a doubled quote inside a quoted field
is one literal quote, and stray characters after a closing quote are kept.
`\n`, `\r` and `\r\n` all end a row. See [`charcsv_core::Reader`] for the
complete grammar.

# Writing

```
use charcsv::Writer;

# fn main() -> charcsv::Result<()> {
let mut wtr = Writer::from_sink(String::new());
wtr.write_row(&["a", "he said \"hi\"", "x,y"])?;
wtr.write_row(&["", "line1\nline2", ""])?;
assert_eq!(wtr.into_inner(), "\
a,\"he said \"\"hi\"\"\",\"x,y\"
,\"line1\nline2\",
");
# Ok(())
# }
```

Rows written by a `Writer` read back unchanged with a `Reader` of the same
dialect, and re-encoding what was read produces the same text again.

# Sources and sinks

[`CharSource`] is implemented for `std::str::Chars` and for [`IoSource`],
which decodes UTF-8 from any `io::BufRead`. [`CharSink`] is implemented for
`String` and for [`IoSink`], which encodes to any `io::Write`. The only errors
the codec itself reports are a bad [`Dialect`] at construction time and
unsupported shapes passed to [`Writer::serialize`]; everything else is an I/O
error from the source or sink, passed through as [`Error::Io`].
*/

#![deny(missing_docs)]

pub use charcsv_core::{Dialect, DialectError, QuoteStyle};

pub use crate::error::{Error, Result};
pub use crate::reader::{Position, Reader, ReaderBuilder, RowsIntoIter, RowsIter};
pub use crate::row::{Row, RowIter};
pub use crate::sink::{CharSink, IoSink};
pub use crate::source::{CharSource, IoSource};
pub use crate::writer::{Writer, WriterBuilder};

mod error;
mod reader;
mod row;
mod serializer;
mod sink;
mod source;
mod writer;
