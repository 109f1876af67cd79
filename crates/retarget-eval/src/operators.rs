//! Operator semantics over runtime values
//!
//! - `==`/`!=` treat null as an ordinary value: null equals only null
//! - ordering and arithmetic on null yield null
//! - numeric operands are promoted Integer -> Long -> Decimal before use
//! - strings compare ordinally

use crate::{EvalError, EvalResult, Value, strings};
use retarget_ast::BinaryOp;
use retarget_types::StringComparison;
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Numeric operand pair after promotion to a common representation
enum Numbers {
    Integer(i32, i32),
    Long(i64, i64),
    Decimal(Decimal, Decimal),
}

fn promote(left: &Value, right: &Value) -> Option<Numbers> {
    use crate::Value::{Decimal as D, Integer as I, Long as L};
    Some(match (left, right) {
        (I(a), I(b)) => Numbers::Integer(*a, *b),
        (I(a), L(b)) => Numbers::Long(i64::from(*a), *b),
        (L(a), I(b)) => Numbers::Long(*a, i64::from(*b)),
        (L(a), L(b)) => Numbers::Long(*a, *b),
        (D(a), D(b)) => Numbers::Decimal(*a, *b),
        (D(a), I(b)) => Numbers::Decimal(*a, Decimal::from(*b)),
        (D(a), L(b)) => Numbers::Decimal(*a, Decimal::from(*b)),
        (I(a), D(b)) => Numbers::Decimal(Decimal::from(*a), *b),
        (L(a), D(b)) => Numbers::Decimal(Decimal::from(*a), *b),
        _ => return None,
    })
}

/// Equality with null treated as a value
pub fn values_equal(left: &Value, right: &Value) -> bool {
    if let Some(numbers) = promote(left, right) {
        return match numbers {
            Numbers::Integer(a, b) => a == b,
            Numbers::Long(a, b) => a == b,
            Numbers::Decimal(a, b) => a == b,
        };
    }
    match (left, right) {
        (Value::String(a), Value::String(b)) => strings::equals(a, b, StringComparison::Ordinal),
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Record(a), Value::Record(b)) => {
            a.type_name == b.type_name
                && a.fields.len() == b.fields.len()
                && a.fields
                    .iter()
                    .all(|(name, x)| b.fields.get(name).is_some_and(|y| values_equal(x, y)))
        }
        (Value::Closure(_), _) | (_, Value::Closure(_)) => false,
        _ => left == right,
    }
}

/// Ordering of two values; `None` when either is null
pub fn compare_values(left: &Value, right: &Value) -> EvalResult<Option<Ordering>> {
    if left.is_null() || right.is_null() {
        return Ok(None);
    }
    if let Some(numbers) = promote(left, right) {
        return Ok(Some(match numbers {
            Numbers::Integer(a, b) => a.cmp(&b),
            Numbers::Long(a, b) => a.cmp(&b),
            Numbers::Decimal(a, b) => a.cmp(&b),
        }));
    }
    match (left, right) {
        (Value::String(a), Value::String(b)) => Ok(Some(strings::compare(a, b, StringComparison::Ordinal))),
        _ => Err(EvalError::type_mismatch(
            "ordered operands",
            format!("{} and {}", left.type_name(), right.type_name()),
        )),
    }
}

/// Result of an ordering operator
pub fn ordering(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
    let Some(order) = compare_values(left, right)? else {
        return Ok(Value::Null);
    };
    let holds = match op {
        BinaryOp::Less => order == Ordering::Less,
        BinaryOp::LessOrEqual => order != Ordering::Greater,
        BinaryOp::Greater => order == Ordering::Greater,
        BinaryOp::GreaterOrEqual => order != Ordering::Less,
        _ => {
            return Err(EvalError::type_mismatch("ordering operator", op.symbol()));
        }
    };
    Ok(Value::Boolean(holds))
}

/// Result of an arithmetic operator, with checked overflow
pub fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    if let (BinaryOp::Add, Value::String(a), Value::String(b)) = (op, left, right) {
        return Ok(Value::String(format!("{}{}", a, b)));
    }
    let numbers = promote(left, right).ok_or_else(|| {
        EvalError::type_mismatch(
            "numeric operands",
            format!("{} and {}", left.type_name(), right.type_name()),
        )
    })?;
    let overflow = || EvalError::overflow(op.symbol());

    match numbers {
        Numbers::Integer(a, b) => {
            check_divisor(op, b == 0)?;
            let result = match op {
                BinaryOp::Add => a.checked_add(b),
                BinaryOp::Subtract => a.checked_sub(b),
                BinaryOp::Multiply => a.checked_mul(b),
                BinaryOp::Divide => a.checked_div(b),
                BinaryOp::Modulo => a.checked_rem(b),
                _ => return Err(EvalError::type_mismatch("arithmetic operator", op.symbol())),
            };
            result.map(Value::Integer).ok_or_else(overflow)
        }
        Numbers::Long(a, b) => {
            check_divisor(op, b == 0)?;
            let result = match op {
                BinaryOp::Add => a.checked_add(b),
                BinaryOp::Subtract => a.checked_sub(b),
                BinaryOp::Multiply => a.checked_mul(b),
                BinaryOp::Divide => a.checked_div(b),
                BinaryOp::Modulo => a.checked_rem(b),
                _ => return Err(EvalError::type_mismatch("arithmetic operator", op.symbol())),
            };
            result.map(Value::Long).ok_or_else(overflow)
        }
        Numbers::Decimal(a, b) => {
            check_divisor(op, b.is_zero())?;
            let result = match op {
                BinaryOp::Add => a.checked_add(b),
                BinaryOp::Subtract => a.checked_sub(b),
                BinaryOp::Multiply => a.checked_mul(b),
                BinaryOp::Divide => a.checked_div(b),
                BinaryOp::Modulo => a.checked_rem(b),
                _ => return Err(EvalError::type_mismatch("arithmetic operator", op.symbol())),
            };
            result.map(Value::Decimal).ok_or_else(overflow)
        }
    }
}

fn check_divisor(op: BinaryOp, is_zero: bool) -> EvalResult<()> {
    if is_zero && matches!(op, BinaryOp::Divide | BinaryOp::Modulo) {
        Err(EvalError::DivisionByZero)
    } else {
        Ok(())
    }
}

/// Arithmetic negation
pub fn negate(operand: &Value) -> EvalResult<Value> {
    match operand {
        Value::Null => Ok(Value::Null),
        Value::Integer(i) => i.checked_neg().map(Value::Integer).ok_or_else(|| EvalError::overflow("-")),
        Value::Long(l) => l.checked_neg().map(Value::Long).ok_or_else(|| EvalError::overflow("-")),
        Value::Decimal(d) => Ok(Value::Decimal(-*d)),
        other => Err(EvalError::type_mismatch("numeric operand", other.type_name())),
    }
}

/// Three-valued conjunction of two evaluated operands
pub fn and(left: &Value, right: &Value) -> EvalResult<Value> {
    Ok(match (as_logical(left)?, as_logical(right)?) {
        (Some(false), _) | (_, Some(false)) => Value::Boolean(false),
        (Some(true), Some(true)) => Value::Boolean(true),
        _ => Value::Null,
    })
}

/// Three-valued disjunction of two evaluated operands
pub fn or(left: &Value, right: &Value) -> EvalResult<Value> {
    Ok(match (as_logical(left)?, as_logical(right)?) {
        (Some(true), _) | (_, Some(true)) => Value::Boolean(true),
        (Some(false), Some(false)) => Value::Boolean(false),
        _ => Value::Null,
    })
}

/// Boolean or null
pub fn as_logical(value: &Value) -> EvalResult<Option<bool>> {
    match value {
        Value::Boolean(b) => Ok(Some(*b)),
        Value::Null => Ok(None),
        other => Err(EvalError::type_mismatch("Boolean", other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Integer(2), Value::Long(2), true)]
    #[case(Value::Decimal(Decimal::new(20, 1)), Value::Integer(2), true)]
    #[case(Value::string("a"), Value::string("A"), false)]
    #[case(Value::Null, Value::Null, true)]
    #[case(Value::Null, Value::string("A"), false)]
    #[case(Value::List(vec![Value::Integer(1)]), Value::List(vec![Value::Long(1)]), true)]
    fn test_values_equal(#[case] left: Value, #[case] right: Value, #[case] expected: bool) {
        assert_eq!(values_equal(&left, &right), expected);
    }

    #[test]
    fn test_record_equality_ignores_field_order() {
        let a = Value::from(Record::new("M").with("X", 1).with("Y", "y"));
        let b = Value::from(Record::new("M").with("Y", "y").with("X", 1));
        assert!(values_equal(&a, &b));
    }

    #[test]
    fn test_ordering_with_null_is_null() {
        assert_eq!(
            ordering(BinaryOp::Less, &Value::Null, &Value::Integer(1)).unwrap(),
            Value::Null
        );
        assert_eq!(
            ordering(BinaryOp::LessOrEqual, &Value::Integer(1), &Value::Long(1)).unwrap(),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(
            arithmetic(BinaryOp::Add, &Value::Integer(2), &Value::Long(3)).unwrap(),
            Value::Long(5)
        );
        assert_eq!(
            arithmetic(BinaryOp::Add, &Value::string("a"), &Value::string("b")).unwrap(),
            Value::string("ab")
        );
        assert_eq!(
            arithmetic(BinaryOp::Divide, &Value::Integer(1), &Value::Integer(0)),
            Err(EvalError::DivisionByZero)
        );
        assert!(matches!(
            arithmetic(BinaryOp::Multiply, &Value::Integer(i32::MAX), &Value::Integer(2)),
            Err(EvalError::Overflow { .. })
        ));
        assert_eq!(
            arithmetic(BinaryOp::Subtract, &Value::Null, &Value::Integer(2)).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_three_valued_logic() {
        let t = Value::Boolean(true);
        let f = Value::Boolean(false);
        let n = Value::Null;

        assert_eq!(and(&n, &f).unwrap(), f);
        assert_eq!(and(&n, &t).unwrap(), n);
        assert_eq!(or(&n, &t).unwrap(), t);
        assert_eq!(or(&n, &f).unwrap(), n);
        assert!(and(&Value::Integer(1), &t).is_err());
    }
}
