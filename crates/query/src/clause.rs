use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::CompileError;
use crate::field_type::FieldType;

/// Comparison operators accepted by `where` clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    NotEquals,
    /// Matches any value of a list
    Any,
    /// Pre-formatted range string or an inclusive integer range
    WithinRange,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::Any => "any",
            Operator::WithinRange => "within_range",
            Operator::GreaterThan => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessOrEqual => "<=",
        }
    }

    fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::GreaterThan
                | Operator::GreaterOrEqual
                | Operator::LessThan
                | Operator::LessOrEqual
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "==" | "=" | "eq" => Ok(Operator::Equals),
            "!=" | "ne" => Ok(Operator::NotEquals),
            "any" => Ok(Operator::Any),
            "within_range" | "range" => Ok(Operator::WithinRange),
            ">" | "gt" => Ok(Operator::GreaterThan),
            ">=" | "ge" => Ok(Operator::GreaterOrEqual),
            "<" | "lt" => Ok(Operator::LessThan),
            "<=" | "le" => Ok(Operator::LessOrEqual),
            other => Err(CompileError::UnsupportedOperator {
                operator: other.to_string(),
                value: String::new(),
            }),
        }
    }
}

/// Right-hand side of a clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseValue {
    Text(String),
    Int(i64),
    List(Vec<ClauseValue>),
    /// Inclusive `lower..upper`
    Range(i64, i64),
}

impl fmt::Display for ClauseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClauseValue::Text(s) => write!(f, "{:?}", s),
            ClauseValue::Int(v) => write!(f, "{}", v),
            ClauseValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            ClauseValue::Range(lo, hi) => write!(f, "{}..{}", lo, hi),
        }
    }
}

impl From<&str> for ClauseValue {
    fn from(value: &str) -> Self {
        ClauseValue::Text(value.to_string())
    }
}

impl From<String> for ClauseValue {
    fn from(value: String) -> Self {
        ClauseValue::Text(value)
    }
}

impl From<i64> for ClauseValue {
    fn from(value: i64) -> Self {
        ClauseValue::Int(value)
    }
}

impl From<i32> for ClauseValue {
    fn from(value: i32) -> Self {
        ClauseValue::Int(value.into())
    }
}

impl From<u32> for ClauseValue {
    fn from(value: u32) -> Self {
        ClauseValue::Int(value.into())
    }
}

impl From<RangeInclusive<i64>> for ClauseValue {
    fn from(range: RangeInclusive<i64>) -> Self {
        let (lo, hi) = range.into_inner();
        ClauseValue::Range(lo, hi)
    }
}

impl<T: Into<ClauseValue>> From<Vec<T>> for ClauseValue {
    fn from(values: Vec<T>) -> Self {
        ClauseValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Render one clause in the remote boolean query grammar.
///
/// | operator | clause text |
/// |---|---|
/// | `==` | `f:'s'` (`f:42` on uint fields) |
/// | `!=` | `(not f:'s')` |
/// | `any` | `(or f:'a' f:'b')` |
/// | `within_range` | `f:lo..hi` |
/// | `>` / `>=` | `f:v+1..` / `f:v..` |
/// | `<` / `<=` | `f:..v-1` / `f:..v` |
///
/// Comparisons only take integers.
pub fn render_clause(
    field: &str,
    field_type: FieldType,
    op: Operator,
    value: &ClauseValue,
) -> Result<String, CompileError> {
    if op.is_comparison() {
        let v = match value {
            ClauseValue::Int(v) => *v,
            _ => return Err(unsupported(op, value)),
        };
        return match op {
            Operator::GreaterThan => {
                let lower = v.checked_add(1).ok_or_else(|| out_of_range(field, value))?;
                Ok(format!("{}:{}..", field, lower))
            }
            Operator::GreaterOrEqual => Ok(format!("{}:{}..", field, v)),
            Operator::LessThan => {
                let upper = v.checked_sub(1).ok_or_else(|| out_of_range(field, value))?;
                Ok(format!("{}:..{}", field, upper))
            }
            _ => Ok(format!("{}:..{}", field, v)),
        };
    }

    match op {
        Operator::Equals => Ok(format!(
            "{}:{}",
            field,
            render_scalar(field, field_type, value)?
        )),
        Operator::NotEquals => Ok(format!(
            "(not {}:{})",
            field,
            render_scalar(field, field_type, value)?
        )),
        Operator::Any => match value {
            ClauseValue::List(items) if items.is_empty() => Err(CompileError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
                reason: "empty value list".to_string(),
            }),
            ClauseValue::List(items) => {
                let terms = items
                    .iter()
                    .map(|v| render_scalar(field, field_type, v).map(|s| format!("{}:{}", field, s)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("(or {})", terms.join(" ")))
            }
            _ => Err(unsupported(op, value)),
        },
        Operator::WithinRange => match value {
            ClauseValue::Text(s) => Ok(format!("{}:{}", field, s)),
            ClauseValue::Range(lo, hi) => Ok(format!("{}:{}..{}", field, lo, hi)),
            _ => Err(unsupported(op, value)),
        },
        _ => Err(unsupported(op, value)),
    }
}

fn render_scalar(field: &str, field_type: FieldType, value: &ClauseValue) -> Result<String, CompileError> {
    let invalid = |reason: &str| CompileError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if field_type.is_numeric() {
        return match value {
            ClauseValue::Int(v) if *v >= 0 => Ok(v.to_string()),
            ClauseValue::Text(s) => s
                .trim()
                .parse::<u64>()
                .map(|n| n.to_string())
                .map_err(|_| invalid("expected an unsigned integer")),
            _ => Err(invalid("expected an unsigned integer")),
        };
    }

    match value {
        ClauseValue::Text(s) => Ok(quote(s)),
        ClauseValue::Int(v) => Ok(quote(&v.to_string())),
        _ => Err(invalid("expected a single value")),
    }
}

/// Single-quote a value, escaping `\` and `'`
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', r"\\").replace('\'', r"\'"))
}

fn unsupported(op: Operator, value: &ClauseValue) -> CompileError {
    CompileError::UnsupportedOperator {
        operator: op.symbol().to_string(),
        value: value.to_string(),
    }
}

fn out_of_range(field: &str, value: &ClauseValue) -> CompileError {
    CompileError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: "integer out of range".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn render(field_type: FieldType, op: Operator, value: impl Into<ClauseValue>) -> Result<String, CompileError> {
        render_clause("f", field_type, op, &value.into())
    }

    // ==================== Grammar Table ====================

    #[rstest]
    #[case(FieldType::Literal, Operator::Equals, ClauseValue::from("s"), "f:'s'")]
    #[case(FieldType::Text, Operator::Equals, ClauseValue::from("s"), "f:'s'")]
    #[case(FieldType::Literal, Operator::Equals, ClauseValue::from(123), "f:'123'")]
    #[case(FieldType::UInt, Operator::Equals, ClauseValue::from(123), "f:123")]
    #[case(FieldType::UInt, Operator::Equals, ClauseValue::from("123"), "f:123")]
    #[case(FieldType::Literal, Operator::NotEquals, ClauseValue::from("s"), "(not f:'s')")]
    #[case(FieldType::UInt, Operator::NotEquals, ClauseValue::from(123), "(not f:123)")]
    #[case(FieldType::Literal, Operator::Any, ClauseValue::from(vec!["a", "b"]), "(or f:'a' f:'b')")]
    #[case(FieldType::UInt, Operator::Any, ClauseValue::from(vec![123, 456]), "(or f:123 f:456)")]
    #[case(FieldType::UInt, Operator::WithinRange, ClauseValue::from("0..123"), "f:0..123")]
    #[case(FieldType::UInt, Operator::WithinRange, ClauseValue::from(0..=123i64), "f:0..123")]
    #[case(FieldType::UInt, Operator::GreaterThan, ClauseValue::from(123), "f:124..")]
    #[case(FieldType::UInt, Operator::GreaterOrEqual, ClauseValue::from(123), "f:123..")]
    #[case(FieldType::UInt, Operator::LessThan, ClauseValue::from(123), "f:..122")]
    #[case(FieldType::UInt, Operator::LessOrEqual, ClauseValue::from(123), "f:..123")]
    #[case(FieldType::Literal, Operator::GreaterThan, ClauseValue::from(9), "f:10..")]
    fn test_grammar(
        #[case] field_type: FieldType,
        #[case] op: Operator,
        #[case] value: ClauseValue,
        #[case] expected: &str,
    ) {
        assert_eq!(render_clause("f", field_type, op, &value).unwrap(), expected);
    }

    // ==================== Rejections ====================

    #[rstest]
    #[case(Operator::GreaterThan)]
    #[case(Operator::GreaterOrEqual)]
    #[case(Operator::LessThan)]
    #[case(Operator::LessOrEqual)]
    fn test_comparison_rejects_non_integer(#[case] op: Operator) {
        for value in [ClauseValue::from("123a"), ClauseValue::from("123"), ClauseValue::Range(1, 2)] {
            let err = render_clause("helpfulness", FieldType::UInt, op, &value).unwrap_err();
            assert!(matches!(err, CompileError::UnsupportedOperator { .. }), "{op} {value}");
        }
    }

    #[rstest]
    #[case(ClauseValue::from("123a"))]
    #[case(ClauseValue::from(-1))]
    #[case(ClauseValue::from(vec![1, 2]))]
    fn test_uint_equality_rejects_bad_value(#[case] value: ClauseValue) {
        let err = render_clause("helpfulness", FieldType::UInt, Operator::Equals, &value).unwrap_err();
        assert!(matches!(err, CompileError::InvalidValue { .. }));
    }

    #[test]
    fn test_any_requires_list() {
        let err = render(FieldType::Literal, Operator::Any, "abc").unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedOperator { .. }));

        let err = render(FieldType::Literal, Operator::Any, Vec::<i64>::new()).unwrap_err();
        assert!(matches!(err, CompileError::InvalidValue { .. }));
    }

    #[test]
    fn test_comparison_overflow() {
        let err = render(FieldType::UInt, Operator::GreaterThan, i64::MAX).unwrap_err();
        assert!(matches!(err, CompileError::InvalidValue { .. }));
    }

    #[test]
    fn test_quotes_are_escaped() {
        assert_eq!(
            render(FieldType::Text, Operator::Equals, "it's").unwrap(),
            r"f:'it\'s'"
        );
    }

    // ==================== Operator Parsing ====================

    #[rstest]
    #[case("==", Operator::Equals)]
    #[case("eq", Operator::Equals)]
    #[case("!=", Operator::NotEquals)]
    #[case("any", Operator::Any)]
    #[case("within_range", Operator::WithinRange)]
    #[case(">", Operator::GreaterThan)]
    #[case(">=", Operator::GreaterOrEqual)]
    #[case("<", Operator::LessThan)]
    #[case("<=", Operator::LessOrEqual)]
    fn test_parse_operator(#[case] input: &str, #[case] expected: Operator) {
        assert_eq!(input.parse::<Operator>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_operator() {
        let err = "=~".parse::<Operator>().unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedOperator { operator, .. } if operator == "=~"));
    }
}
