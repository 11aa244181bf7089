/*!
`charcsv-core` provides the two state machines behind `charcsv`: a reader
that is fed one character at a time and reports what to do with it, and a
writer that escapes one field at a time.

Neither does any I/O. Callers pull characters from wherever they like and
hand them to [`Reader::read`], passing `None` once the input is exhausted.

```
use charcsv_core::{ReadResult, Reader};

let mut rdr = Reader::new();
let mut field = String::new();
let mut fields = vec![];
for c in "a,\"b,c\"\n".chars().map(Some).chain(Some(None)) {
    match rdr.read(c) {
        ReadResult::Skip => {}
        ReadResult::Char(c) => field.push(c),
        ReadResult::Field { .. } => fields.push(std::mem::take(&mut field)),
        ReadResult::End => break,
    }
}
assert_eq!(fields, vec!["a", "b,c"]);
```
*/

#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use crate::dialect::{Dialect, DialectError};
pub use crate::reader::{ReadResult, Reader, ReaderBuilder, State};
pub use crate::writer::{QuoteStyle, Writer, WriterBuilder};

mod dialect;
mod reader;
mod writer;
