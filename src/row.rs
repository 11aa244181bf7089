use std::fmt;
use std::iter::FromIterator;
use std::ops::{self, Range};

/// A single CSV row: an ordered sequence of fields.
///
/// All fields are stored contiguously in one `String`, so a `Row` can be
/// reused across calls to [`Reader::read_row`](crate::Reader::read_row)
/// without reallocating once it has grown to fit the widest row.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct Row {
    /// All fields in this row, stored contiguously.
    fields: String,
    /// The number of and location of each field in this row.
    bounds: Bounds,
}

impl Row {
    /// Create a new empty `Row`.
    pub fn new() -> Row {
        Row::default()
    }

    /// Create a new empty `Row` with room for `capacity` bytes of field
    /// data and `fields` field positions.
    pub fn with_capacity(capacity: usize, fields: usize) -> Row {
        Row {
            fields: String::with_capacity(capacity),
            bounds: Bounds { ends: Vec::with_capacity(fields) },
        }
    }

    /// Return the field at index `i`.
    ///
    /// If no field at index `i` exists, then this returns `None`.
    pub fn get(&self, i: usize) -> Option<&str> {
        self.bounds.get(i).map(|range| &self.fields[range])
    }

    /// Returns true if and only if this row has no fields.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of fields in this row.
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Clear this row so that it has zero fields.
    ///
    /// The allocated capacity is kept.
    pub fn clear(&mut self) {
        self.fields.clear();
        self.bounds.ends.clear();
    }

    /// Add a new field to the end of this row.
    pub fn push_field(&mut self, field: &str) {
        self.fields.push_str(field);
        self.bounds.ends.push(self.fields.len());
    }

    /// Returns an iterator over all fields in this row.
    pub fn iter(&self) -> RowIter {
        RowIter { row: self, start: 0, i: 0 }
    }

    /// Copy every field into its own `String`.
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(String::from).collect()
    }

    /// Append a character to the field in progress.
    pub(crate) fn push_char(&mut self, c: char) {
        self.fields.push(c);
    }

    /// Complete the field in progress.
    pub(crate) fn end_field(&mut self) {
        self.bounds.ends.push(self.fields.len());
    }
}

/// The bounds of fields in a single row.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Bounds {
    /// The ending index of each field. Always on a `char` boundary.
    ends: Vec<usize>,
}

impl Bounds {
    fn len(&self) -> usize {
        self.ends.len()
    }

    /// Returns the bounds of field `i`.
    fn get(&self, i: usize) -> Option<Range<usize>> {
        let end = *self.ends.get(i)?;
        let start = match i.checked_sub(1) {
            None => 0,
            Some(prev) => self.ends[prev],
        };
        Some(start..end)
    }
}

impl ops::Index<usize> for Row {
    type Output = str;

    fn index(&self, i: usize) -> &str {
        match self.get(i) {
            Some(field) => field,
            None => panic!(
                "field index {} out of bounds for row with {} fields",
                i,
                self.len()
            ),
        }
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: AsRef<str>> PartialEq<[T]> for Row {
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len()
            && self.iter().zip(other).all(|(a, b)| a == b.as_ref())
    }
}

impl<'a, T: AsRef<str>> PartialEq<&'a [T]> for Row {
    fn eq(&self, other: &&'a [T]) -> bool {
        *self == **other
    }
}

impl<T: AsRef<str>> PartialEq<Vec<T>> for Row {
    fn eq(&self, other: &Vec<T>) -> bool {
        *self == **other
    }
}

impl<T: AsRef<str>> From<Vec<T>> for Row {
    fn from(fields: Vec<T>) -> Row {
        fields.iter().collect()
    }
}

impl<'a, T: AsRef<str>> From<&'a [T]> for Row {
    fn from(fields: &'a [T]) -> Row {
        fields.iter().collect()
    }
}

impl<T: AsRef<str>> FromIterator<T> for Row {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Row {
        let mut row = Row::new();
        row.extend(iter);
        row
    }
}

impl<T: AsRef<str>> Extend<T> for Row {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for field in iter {
            self.push_field(field.as_ref());
        }
    }
}

impl<'a> IntoIterator for &'a Row {
    type IntoIter = RowIter<'a>;
    type Item = &'a str;

    fn into_iter(self) -> RowIter<'a> {
        self.iter()
    }
}

/// An iterator over the fields in a row.
#[derive(Clone, Debug)]
pub struct RowIter<'a> {
    row: &'a Row,
    start: usize,
    i: usize,
}

impl<'a> Iterator for RowIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let end = *self.row.bounds.ends.get(self.i)?;
        let field = &self.row.fields[self.start..end];
        self.start = end;
        self.i += 1;
        Some(field)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.row.len() - self.i;
        (n, Some(n))
    }
}

impl<'a> ExactSizeIterator for RowIter<'a> {}
