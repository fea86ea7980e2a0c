//! Row representation for query execution.
//!
//! A `Row` is an ordered, fixed-length sequence of values, one per output
//! column of the node that produced it.

use std::fmt;

use crate::types::Value;

/// A single row of values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Row {
    /// The values in this row.
    values: Vec<Value>,
}

impl Row {
    /// Creates a new row with the given values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Creates an empty row.
    pub fn empty() -> Self {
        Self { values: Vec::new() }
    }

    /// Returns the number of columns in this row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value at the given index.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns an iterator over the values.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    /// Returns the values as a slice.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consumes the row and returns the values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Concatenates this row with another row, left values first.
    pub fn concat(&self, other: &Row) -> Row {
        let mut values = Vec::with_capacity(self.values.len() + other.values.len());
        values.extend(self.values.iter().cloned());
        values.extend(other.values.iter().cloned());
        Row { values }
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl FromIterator<Value> for Row {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Row {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}

/// Builds a row from a list of values convertible into [`Value`].
#[macro_export]
macro_rules! row {
    () => {
        $crate::row::Row::empty()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::row::Row::new(vec![$($crate::types::Value::from($value)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_get() {
        let row = Row::new(vec![Value::int(1), Value::int(2)]);
        assert_eq!(row.len(), 2);
        assert_eq!(row.get(0), Some(&Value::int(1)));
        assert_eq!(row.get(2), None);
    }

    #[test]
    fn test_row_concat() {
        let left = Row::new(vec![Value::int(1)]);
        let right = Row::new(vec![Value::text("a"), Value::Null]);
        let joined = left.concat(&right);
        assert_eq!(joined.len(), left.len() + right.len());
        assert_eq!(
            joined.values(),
            &[Value::int(1), Value::text("a"), Value::Null]
        );
        // operands are untouched
        assert_eq!(left.len(), 1);
    }

    #[test]
    fn test_row_macro() {
        let row = row![1i64, "x", true];
        assert_eq!(
            row,
            Row::new(vec![Value::bigint(1), Value::text("x"), Value::boolean(true)])
        );
        assert!(row![].is_empty());
    }

    #[test]
    fn test_row_display() {
        let row = Row::new(vec![Value::int(1), Value::text("hello")]);
        assert_eq!(row.to_string(), "(1, hello)");
    }
}
