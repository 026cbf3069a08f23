//! Relational filters and elementwise arithmetic over columns.
//!
//! Filters:
//! - `age > 30` is `column.filter(RelationalOperator::GreaterThan, 30)`
//! - `name IN ('a', 'b')` is `column.filter(RelationalOperator::In, vec!["a", "b"])`
//!
//! Which operators a column accepts depends on its type:
//!
//! | type         | operators                                        |
//! |--------------|--------------------------------------------------|
//! | string       | all                                              |
//! | int, float64 | equality, ordering, `In`, `NotIn`                |
//! | bool         | `Equal`, `NotEqual`                              |
//!
//! Arithmetic promotes: string involved gives string (addition only,
//! concatenation), float involved gives float, int division gives float,
//! otherwise int. Int results stay in `i64`; float results are computed in
//! decimal so `10.1 + 10` is exactly `20.1`.

use crate::column::Column;
use crate::element::{DataType, Element, INT_NAN};
use crate::error::{Result, TableError};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationalOperator {
    Equal,          // ==
    NotEqual,       // !=
    LessThan,       // <
    LessOrEqual,    // <=
    GreaterThan,    // >
    GreaterOrEqual, // >=
    Contains,
    StartsWith,
    EndsWith,
    In,
    NotIn,
}

impl RelationalOperator {
    fn is_substring(&self) -> bool {
        matches!(
            self,
            RelationalOperator::Contains | RelationalOperator::StartsWith | RelationalOperator::EndsWith
        )
    }

    fn is_membership(&self) -> bool {
        matches!(self, RelationalOperator::In | RelationalOperator::NotIn)
    }

    /// Whether a column of `dtype` accepts this operator.
    pub fn is_legal_for(&self, dtype: DataType) -> bool {
        match dtype {
            DataType::String => true,
            DataType::Int | DataType::Float => !self.is_substring(),
            DataType::Bool => matches!(self, RelationalOperator::Equal | RelationalOperator::NotEqual),
        }
    }
}

impl fmt::Display for RelationalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticOperator {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Remainder,
}

impl fmt::Display for ArithmeticOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Right-hand side of a filter: one value, or a list for `In` / `NotIn`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Scalar(Element),
    List(Vec<Element>),
}

macro_rules! impl_filter_value_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(value: $ty) -> Self {
                    FilterValue::Scalar(value.into())
                }
            }

            impl From<Vec<$ty>> for FilterValue {
                fn from(values: Vec<$ty>) -> Self {
                    FilterValue::List(values.into_iter().map(Into::into).collect())
                }
            }
        )*
    };
}

impl_filter_value_from!(Element, &str, String, i64, i32, f64, bool);

/// Operand kinds a column of `dtype` can be compared against.
fn operand_compatible(dtype: DataType, operand: &Element) -> bool {
    match dtype {
        DataType::String => operand.dtype() == DataType::String,
        DataType::Int | DataType::Float => operand.dtype().is_numeric(),
        DataType::Bool => operand.dtype() == DataType::Bool,
    }
}

/// Equality between a column element and an operand. Missing numbers never
/// compare equal; missing text compares as the literal `"NaN"`.
fn element_eq(element: &Element, operand: &Element) -> bool {
    match (element, operand) {
        (Element::Int(a), Element::Int(b)) => !element.is_nan() && a == b,
        (Element::String(a), Element::String(b)) => a == b,
        (Element::Bool(a), Element::Bool(b)) => a == b,
        _ => {
            let (a, b) = (element.as_float(), operand.as_float());
            !a.is_nan() && a == b
        }
    }
}

/// Ordering between an element and an operand. A missing value on either
/// side has no ordering.
fn element_cmp(element: &Element, operand: &Element) -> Option<Ordering> {
    if element.is_nan() || operand.is_nan() {
        return None;
    }
    match (element, operand) {
        (Element::Int(a), Element::Int(b)) => Some(a.cmp(b)),
        (Element::String(a), Element::String(b)) => Some(a.as_str().cmp(b.as_str())),
        _ => element.as_float().partial_cmp(&operand.as_float()),
    }
}

impl Column {
    /// Keep the elements matching `operator value`.
    ///
    /// The result's permutation holds the matching positions of this
    /// column, in order. Illegal operators and mismatched operands are
    /// reported before any element is examined.
    ///
    /// ```
    /// use tabframe::{Column, DataType, RelationalOperator};
    ///
    /// let ages = Column::from_values("age", DataType::Int, vec![20, 35, 41, 18]);
    /// let adults = ages.filter(RelationalOperator::GreaterOrEqual, 21).unwrap();
    /// assert_eq!(adults.ints(), vec![35, 41]);
    /// assert_eq!(adults.indexes(), &[1, 2]);
    /// ```
    pub fn filter(&self, operator: RelationalOperator, value: impl Into<FilterValue>) -> Result<Column> {
        let positions = self.filter_positions(operator, &value.into())?;
        self.subset(&positions)
    }

    /// Positions of the elements matching `operator value`.
    pub fn filter_positions(&self, operator: RelationalOperator, value: &FilterValue) -> Result<Vec<usize>> {
        if !operator.is_legal_for(self.dtype()) {
            return Err(TableError::IllegalOperator {
                operator: operator.to_string(),
                dtype: self.dtype(),
            });
        }

        let operands: &[Element] = match (operator.is_membership(), value) {
            (true, FilterValue::List(values)) => values.as_slice(),
            (true, FilterValue::Scalar(_)) => {
                return Err(TableError::OperandMismatch(format!(
                    "{} requires a list of values",
                    operator
                )));
            }
            (false, FilterValue::Scalar(v)) => std::slice::from_ref(v),
            (false, FilterValue::List(_)) => {
                return Err(TableError::OperandMismatch(format!(
                    "{} requires a single value",
                    operator
                )));
            }
        };

        if let Some(bad) = operands.iter().find(|v| !operand_compatible(self.dtype(), v)) {
            return Err(TableError::OperandMismatch(format!(
                "cannot compare {} column '{}' with {} value '{}'",
                self.dtype(),
                self.name(),
                bad.dtype(),
                bad
            )));
        }

        let keep = |element: &Element| -> bool {
            match operator {
                RelationalOperator::Equal => element_eq(element, &operands[0]),
                RelationalOperator::NotEqual => !element_eq(element, &operands[0]),
                RelationalOperator::LessThan => {
                    element_cmp(element, &operands[0]) == Some(Ordering::Less)
                }
                RelationalOperator::LessOrEqual => matches!(
                    element_cmp(element, &operands[0]),
                    Some(Ordering::Less | Ordering::Equal)
                ),
                RelationalOperator::GreaterThan => {
                    element_cmp(element, &operands[0]) == Some(Ordering::Greater)
                }
                RelationalOperator::GreaterOrEqual => matches!(
                    element_cmp(element, &operands[0]),
                    Some(Ordering::Greater | Ordering::Equal)
                ),
                RelationalOperator::Contains => element.as_text().contains(&operands[0].as_text()),
                RelationalOperator::StartsWith => element.as_text().starts_with(&operands[0].as_text()),
                RelationalOperator::EndsWith => element.as_text().ends_with(&operands[0].as_text()),
                RelationalOperator::In => operands.iter().any(|v| element_eq(element, v)),
                RelationalOperator::NotIn => !operands.iter().any(|v| element_eq(element, v)),
            }
        };

        Ok(self
            .iter()
            .enumerate()
            .filter(|(_, element)| keep(element))
            .map(|(i, _)| i)
            .collect())
    }

    /// Elementwise `self operator other`.
    ///
    /// Division or remainder by zero (or by a missing value) yields the
    /// result type's missing value at that position. The result keeps this
    /// column's name and has an empty permutation.
    ///
    /// ```
    /// use tabframe::{ArithmeticOperator, Column, DataType};
    ///
    /// let a = Column::from_values("a", DataType::Float, vec![10.1, 1.0]);
    /// let b = Column::from_values("b", DataType::Int, vec![10, 0]);
    /// let sum = a.arithmetic(ArithmeticOperator::Addition, &b).unwrap();
    /// assert_eq!(sum.records(), vec!["20.1", "1"]);
    ///
    /// let ratio = a.arithmetic(ArithmeticOperator::Division, &b).unwrap();
    /// assert_eq!(ratio.records(), vec!["1.01", "NaN"]);
    /// ```
    pub fn arithmetic(&self, operator: ArithmeticOperator, other: &Column) -> Result<Column> {
        let (left, right) = (self.dtype(), other.dtype());
        let illegal = || TableError::IllegalArithmetic {
            operator: operator.to_string(),
            left,
            right,
        };

        if left == DataType::Bool || right == DataType::Bool {
            return Err(illegal());
        }
        let has_string = left == DataType::String || right == DataType::String;
        if has_string && operator != ArithmeticOperator::Addition {
            return Err(illegal());
        }
        if self.len() != other.len() {
            return Err(TableError::LengthMismatch {
                expected: self.len(),
                found: other.len(),
            });
        }

        let dtype = if has_string {
            DataType::String
        } else if left == DataType::Float || right == DataType::Float {
            DataType::Float
        } else if operator == ArithmeticOperator::Division {
            DataType::Float
        } else {
            DataType::Int
        };

        let mut result = Column::new(self.name(), dtype);
        if dtype == DataType::String {
            result.extend(
                self.iter()
                    .zip(other.iter())
                    .map(|(a, b)| a.as_text() + &b.as_text()),
            );
        } else if left == DataType::Int && right == DataType::Int {
            result.extend(
                self.iter()
                    .zip(other.iter())
                    .map(|(a, b)| int_op(operator, a.as_int(), b.as_int())),
            );
        } else {
            result.extend(
                self.iter()
                    .zip(other.iter())
                    .map(|(a, b)| numeric_op(operator, a.as_float(), b.as_float())),
            );
        }
        result.clear_index();
        Ok(result)
    }
}

/// Apply `operator` to two ints. Sums, differences, products and
/// remainders stay in `i64`; a missing operand, a zero divisor or an
/// overflow gives the missing value. Division is exact in decimal.
fn int_op(operator: ArithmeticOperator, a: i64, b: i64) -> Element {
    if a == INT_NAN || b == INT_NAN {
        return Element::missing(if operator == ArithmeticOperator::Division {
            DataType::Float
        } else {
            DataType::Int
        });
    }
    let value = match operator {
        ArithmeticOperator::Addition => a.checked_add(b),
        ArithmeticOperator::Subtraction => a.checked_sub(b),
        ArithmeticOperator::Multiplication => a.checked_mul(b),
        ArithmeticOperator::Remainder => a.checked_rem(b),
        ArithmeticOperator::Division => {
            if b == 0 {
                return Element::Float(f64::NAN);
            }
            let quotient = Decimal::from(a)
                .checked_div(Decimal::from(b))
                .and_then(|d| d.to_f64());
            return Element::Float(quotient.unwrap_or(a as f64 / b as f64));
        }
    };
    Element::Int(value.unwrap_or(INT_NAN))
}

/// `value` as a decimal, only when the conversion is exact.
fn exact_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value).filter(|d| d.to_f64() == Some(value))
}

/// Apply `operator` in decimal, falling back to binary floating point when
/// an operand or the result does not fit the decimal range or scale.
fn numeric_op(operator: ArithmeticOperator, a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    let by_zero = b == 0.0;
    if by_zero && matches!(operator, ArithmeticOperator::Division | ArithmeticOperator::Remainder) {
        return f64::NAN;
    }

    let binary = match operator {
        ArithmeticOperator::Addition => a + b,
        ArithmeticOperator::Subtraction => a - b,
        ArithmeticOperator::Multiplication => a * b,
        ArithmeticOperator::Division => a / b,
        ArithmeticOperator::Remainder => a % b,
    };

    let decimal = match (exact_decimal(a), exact_decimal(b)) {
        (Some(x), Some(y)) => match operator {
            ArithmeticOperator::Addition => x.checked_add(y),
            ArithmeticOperator::Subtraction => x.checked_sub(y),
            ArithmeticOperator::Multiplication => x.checked_mul(y),
            ArithmeticOperator::Division => x.checked_div(y),
            ArithmeticOperator::Remainder => x.checked_rem(y),
        },
        _ => None,
    };

    // results rounded away by the 28-digit scale disagree with the binary value
    match decimal.and_then(|d| d.to_f64()) {
        Some(value) if (value - binary).abs() <= binary.abs() * DECIMAL_TOLERANCE => value,
        _ => binary,
    }
}

/// Largest relative gap between the decimal and binary results that is
/// still binary rounding noise.
const DECIMAL_TOLERANCE: f64 = 1e-9;
