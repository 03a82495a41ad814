//! Evaluation of filter expressions against records.
//!
//! Both operands of a binary operator are always evaluated, so a type error on
//! the right of `AND`/`OR` surfaces even when the left side decides the result.

use std::cmp::Ordering;

use super::ast::{BinaryOperator, Expression, UnaryOperator};
use super::error::{EvalError, EvalResult};
use crate::record::{Datum, Record};

impl Expression {
    /// Evaluates the expression against `record`.
    ///
    /// # Errors
    ///
    /// - `EvalError::UnknownField` when the record lacks a referenced field
    /// - a type error when operand types are mixed or unsupported
    /// - `EvalError::DivisionByZero` or `EvalError::Overflow` for arithmetic faults
    ///
    /// # Example
    ///
    /// ```
    /// use gitql_engine::query::{BinaryOperator, Expression};
    /// use gitql_engine::record::{Datum, Record};
    ///
    /// let expression = Expression::binary(
    ///     Expression::field("comments"),
    ///     BinaryOperator::Greater,
    ///     Expression::literal(3),
    /// );
    /// let record = Record::new().with("comments", 5i64);
    ///
    /// assert_eq!(expression.evaluate(&record).unwrap(), Datum::Boolean(true));
    /// ```
    pub fn evaluate(&self, record: &Record) -> EvalResult<Datum> {
        match self {
            Expression::Literal(value) => Ok(Datum::from(value)),
            Expression::Field(name) => {
                record
                    .get(name)
                    .cloned()
                    .ok_or_else(|| EvalError::UnknownField {
                        field: name.clone(),
                    })
            }
            Expression::Unary(operator, operand) => {
                let value = operand.evaluate(record)?;
                apply_unary(*operator, value)
            }
            Expression::Binary(left, operator, right) => {
                let left = left.evaluate(record)?;
                let right = right.evaluate(record)?;
                apply_binary(*operator, left, right)
            }
        }
    }

    /// Evaluates the expression as a row predicate.
    ///
    /// # Errors
    ///
    /// Returns `EvalError::NotBoolean` when the result is not a boolean, plus
    /// any error from [`Expression::evaluate`].
    pub fn matches(&self, record: &Record) -> EvalResult<bool> {
        let value = self.evaluate(record)?;
        value
            .as_bool()
            .ok_or(EvalError::NotBoolean { kind: value.kind() })
    }
}

fn apply_unary(operator: UnaryOperator, value: Datum) -> EvalResult<Datum> {
    match (operator, value) {
        (UnaryOperator::Not, Datum::Boolean(b)) => Ok(Datum::Boolean(!b)),
        (UnaryOperator::Not, other) => Err(EvalError::UnsupportedOperand {
            operator: operator.to_string(),
            kind: other.kind(),
        }),
    }
}

fn apply_binary(operator: BinaryOperator, left: Datum, right: Datum) -> EvalResult<Datum> {
    if left.kind() != right.kind() {
        return Err(EvalError::TypeMismatch {
            operator,
            left: left.kind(),
            right: right.kind(),
        });
    }

    let ordered = |test: fn(Ordering) -> bool| {
        compare(operator, &left, &right).map(|ordering| Datum::Boolean(test(ordering)))
    };

    match operator {
        BinaryOperator::Equal => Ok(Datum::Boolean(left == right)),
        BinaryOperator::Greater => ordered(Ordering::is_gt),
        BinaryOperator::Less => ordered(Ordering::is_lt),
        BinaryOperator::GreaterOrEqual => ordered(Ordering::is_ge),
        BinaryOperator::LessOrEqual => ordered(Ordering::is_le),
        BinaryOperator::Plus
        | BinaryOperator::Minus
        | BinaryOperator::Multiply
        | BinaryOperator::Divide => arithmetic(operator, &left, &right),
        BinaryOperator::And | BinaryOperator::Or => logic(operator, &left, &right),
    }
}

/// Orders two operands of the same kind. Integers compare numerically and
/// text compares lexicographically; booleans have no order.
fn compare(operator: BinaryOperator, left: &Datum, right: &Datum) -> EvalResult<Ordering> {
    match (left, right) {
        (Datum::Integer(a), Datum::Integer(b)) => Ok(a.cmp(b)),
        (Datum::Text(a), Datum::Text(b)) => Ok(a.cmp(b)),
        _ => Err(unsupported(operator, left)),
    }
}

fn arithmetic(operator: BinaryOperator, left: &Datum, right: &Datum) -> EvalResult<Datum> {
    let (Datum::Integer(a), Datum::Integer(b)) = (left, right) else {
        return Err(unsupported(operator, left));
    };

    let result = match operator {
        BinaryOperator::Plus => a.checked_add(*b),
        BinaryOperator::Minus => a.checked_sub(*b),
        BinaryOperator::Multiply => a.checked_mul(*b),
        BinaryOperator::Divide => {
            if *b == 0 {
                return Err(EvalError::DivisionByZero);
            }
            a.checked_div(*b)
        }
        _ => return Err(unsupported(operator, left)),
    };

    result
        .map(Datum::Integer)
        .ok_or(EvalError::Overflow { operator })
}

fn logic(operator: BinaryOperator, left: &Datum, right: &Datum) -> EvalResult<Datum> {
    let (Datum::Boolean(a), Datum::Boolean(b)) = (left, right) else {
        return Err(unsupported(operator, left));
    };

    match operator {
        BinaryOperator::And => Ok(Datum::Boolean(*a && *b)),
        BinaryOperator::Or => Ok(Datum::Boolean(*a || *b)),
        _ => Err(unsupported(operator, left)),
    }
}

fn unsupported(operator: BinaryOperator, operand: &Datum) -> EvalError {
    EvalError::UnsupportedOperand {
        operator: operator.to_string(),
        kind: operand.kind(),
    }
}
