//! SUBSTRING function - extracts part of a string by codepoint position

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::{fmt_call, FunctionRegistry};
use crate::error::{ExecError, ExecResult};
use crate::expression::{ExprRef, Expression};
use crate::row::Row;
use crate::types::{DataType, Value};

/// `substring(str, start[, length])`.
///
/// Positions are 1-based and count Unicode codepoints, not bytes. A negative
/// `start` counts back from the end of the string, so `-1` selects the last
/// codepoint. Out-of-range positions and non-positive lengths yield the
/// empty string; a length running past the end is clamped.
#[derive(Debug, Clone)]
pub struct Substring {
    str: ExprRef,
    start: ExprRef,
    len: Option<ExprRef>,
}

impl Substring {
    /// Creates a new `substring` expression from two or three arguments.
    pub fn new(args: Vec<ExprRef>) -> ExecResult<Self> {
        let given = args.len();
        let mut args = args.into_iter();
        match (args.next(), args.next(), args.next(), args.next()) {
            (Some(str), Some(start), len, None) => Ok(Self { str, start, len }),
            _ => Err(ExecError::arity("substring", "2 or 3", given)),
        }
    }

    fn eval_int(expr: &ExprRef, row: &Row) -> ExecResult<Option<i64>> {
        match DataType::Int64.convert(&expr.eval(row)?)? {
            Value::Int64(n) => Ok(Some(n)),
            _ => Ok(None),
        }
    }
}

/// Returns the codepoints of `text` in `[start, start + len)` under SQL
/// substring rules.
fn substring(text: &str, start: i64, len: Option<i64>) -> String {
    let count = text.chars().count() as i64;
    let len = len.unwrap_or(count);

    let start_idx = if start < 0 { count + start } else { start - 1 };
    if start_idx < 0 || start_idx >= count || len <= 0 {
        return String::new();
    }

    let len = len.min(count - start_idx);
    text.chars()
        .skip(start_idx as usize)
        .take(len as usize)
        .collect()
}

impl Expression for Substring {
    fn name(&self) -> &str {
        "substring"
    }

    fn data_type(&self) -> DataType {
        DataType::Text
    }

    fn is_nullable(&self) -> bool {
        true
    }

    fn children(&self) -> Vec<ExprRef> {
        let mut children = vec![self.str.clone(), self.start.clone()];
        children.extend(self.len.clone());
        children
    }

    fn with_new_children(&self, children: Vec<ExprRef>) -> ExecResult<ExprRef> {
        let expected = if self.len.is_some() { 3 } else { 2 };
        if children.len() != expected {
            return Err(ExecError::arity(
                self.name(),
                expected.to_string(),
                children.len(),
            ));
        }
        Ok(Arc::new(Self::new(children)?))
    }

    fn eval(&self, row: &Row) -> ExecResult<Value> {
        let text = match self.str.eval(row)? {
            Value::Null => return Ok(Value::Null),
            Value::Text(s) => s,
            Value::Blob(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            other => return Err(ExecError::InvalidType(other.type_name().to_string())),
        };

        let Some(start) = Self::eval_int(&self.start, row)? else {
            return Ok(Value::Null);
        };

        let len = match &self.len {
            Some(expr) => match Self::eval_int(expr, row)? {
                Some(n) => Some(n),
                None => return Ok(Value::Null),
            },
            None => None,
        };

        Ok(Value::Text(substring(&text, start, len)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for Substring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_call(f, self.name(), &self.children())
    }
}

fn build(args: Vec<ExprRef>) -> ExecResult<ExprRef> {
    Ok(Arc::new(Substring::new(args)?))
}

/// Register the function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register("substring", build);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{GetField, Literal};
    use crate::row;

    fn lit(value: impl Into<Value>) -> ExprRef {
        Literal::new(value).into_ref()
    }

    fn substr(args: Vec<ExprRef>) -> Value {
        Substring::new(args).unwrap().eval(&Row::empty()).unwrap()
    }

    #[test]
    fn test_positive_start() {
        assert_eq!(substr(vec![lit("abcde"), lit(2i64), lit(3i64)]), Value::text("bcd"));
        assert_eq!(substr(vec![lit("abcde"), lit(3i64)]), Value::text("cde"));
    }

    #[test]
    fn test_negative_start() {
        assert_eq!(substr(vec![lit("abcde"), lit(-1i64)]), Value::text("e"));
        assert_eq!(substr(vec![lit("abcde"), lit(-2i64), lit(1i64)]), Value::text("d"));
        assert_eq!(substr(vec![lit("abcde"), lit(-9i64)]), Value::text(""));
    }

    #[test]
    fn test_out_of_range_is_empty() {
        assert_eq!(substr(vec![lit("abcde"), lit(0i64), lit(3i64)]), Value::text(""));
        assert_eq!(substr(vec![lit("abcde"), lit(6i64)]), Value::text(""));
        assert_eq!(substr(vec![lit("abcde"), lit(1i64), lit(0i64)]), Value::text(""));
        assert_eq!(substr(vec![lit("abcde"), lit(1i64), lit(-2i64)]), Value::text(""));
    }

    #[test]
    fn test_length_is_clamped() {
        assert_eq!(substr(vec![lit("abcde"), lit(1i64), lit(100i64)]), Value::text("abcde"));
        assert_eq!(substr(vec![lit("abcde"), lit(4i64), lit(100i64)]), Value::text("de"));
    }

    #[test]
    fn test_counts_codepoints() {
        assert_eq!(substr(vec![lit("añbç"), lit(2i64), lit(1i64)]), Value::text("ñ"));
        assert_eq!(substr(vec![lit("日本語"), lit(-1i64)]), Value::text("語"));
    }

    #[test]
    fn test_blob_input() {
        assert_eq!(
            substr(vec![lit(b"hello".to_vec()), lit(2i64), lit(2i64)]),
            Value::text("el")
        );
    }

    #[test]
    fn test_textual_start_is_converted() {
        assert_eq!(substr(vec![lit("abcde"), lit("2"), lit(2i32)]), Value::text("bc"));
    }

    #[test]
    fn test_null_propagation() {
        assert_eq!(substr(vec![Literal::null().into_ref(), lit(1i64)]), Value::Null);
        assert_eq!(substr(vec![lit("abc"), Literal::null().into_ref()]), Value::Null);
        assert_eq!(
            substr(vec![lit("abc"), lit(1i64), Literal::null().into_ref()]),
            Value::Null
        );
    }

    #[test]
    fn test_invalid_input_type() {
        let expr = Substring::new(vec![lit(12i64), lit(1i64)]).unwrap();
        let err = expr.eval(&Row::empty()).unwrap_err();
        assert!(matches!(err, ExecError::InvalidType(ref t) if t == "int64"));
    }

    #[test]
    fn test_unconvertible_start() {
        let expr = Substring::new(vec![lit("abc"), lit("first")]).unwrap();
        assert!(matches!(
            expr.eval(&Row::empty()),
            Err(ExecError::Conversion(_))
        ));
    }

    #[test]
    fn test_arity() {
        for n in [0usize, 1, 4, 5] {
            let args = (0..n).map(|_| lit("a")).collect();
            match Substring::new(args) {
                Err(ExecError::Arity { actual, .. }) => assert_eq!(actual, n),
                other => panic!("expected arity error for {} args, got {:?}", n, other),
            }
        }
    }

    #[test]
    fn test_rebuild_preserves_arity() {
        let two = Substring::new(vec![lit("a"), lit(1i64)]).unwrap();
        assert!(two.with_new_children(vec![lit("b"), lit(1i64)]).is_ok());
        assert!(two
            .with_new_children(vec![lit("b"), lit(1i64), lit(1i64)])
            .is_err());

        let three = Substring::new(vec![lit("a"), lit(1i64), lit(1i64)]).unwrap();
        assert_eq!(three.children().len(), 3);
        assert!(three.with_new_children(vec![lit("b"), lit(1i64)]).is_err());
    }

    #[test]
    fn test_eval_against_row() {
        let expr = Substring::new(vec![
            GetField::new(0, "name", DataType::Text, true).into_ref(),
            lit(1i64),
            lit(3i64),
        ])
        .unwrap();
        assert_eq!(expr.eval(&row!["Madrid"]).unwrap(), Value::text("Mad"));
        assert_eq!(expr.to_string(), "substring(name, 1, 3)");
    }
}
