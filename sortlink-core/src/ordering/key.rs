//! Sort key values extracted from records
//!
//! A [`SortKey`] is the comparable value a record exposes for a field. Keys of
//! the same kind compare by their natural ordering and integers compare with
//! floats by numeric value. Other kinds compare by kind rank (`Null` lowest),
//! so comparing any two keys is total and an in-memory sort can never panic
//! half way through.

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

/// 2^127, the first float past the `i128` range.
const I128_LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

/// Comparable value of a record field
///
/// `Int` and `Float` are both numbers: they compare by value against each
/// other, so `Int(3)` sorts after `Float(2.5)` and equals `Float(3.0)`.
#[derive(Clone, Debug)]
pub enum SortKey {
    Null,
    Bool(bool),
    Int(i128),
    Float(OrderedFloat<f64>),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl SortKey {
    pub fn is_null(&self) -> bool {
        matches!(self, SortKey::Null)
    }

    /// Short name of the key kind, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            SortKey::Null => "null",
            SortKey::Bool(_) => "bool",
            SortKey::Int(_) => "int",
            SortKey::Float(_) => "float",
            SortKey::Text(_) => "text",
            SortKey::Timestamp(_) => "timestamp",
        }
    }

    /// Order between kinds that cannot be compared by value.
    fn rank(&self) -> u8 {
        match self {
            SortKey::Null => 0,
            SortKey::Bool(_) => 1,
            SortKey::Int(_) | SortKey::Float(_) => 2,
            SortKey::Text(_) => 3,
            SortKey::Timestamp(_) => 4,
        }
    }
}

/// Exact comparison of an integer with a float. NaN sorts above every
/// number, as it does among `OrderedFloat`s.
fn cmp_int_float(int: i128, float: f64) -> Ordering {
    if float.is_nan() || float >= I128_LIMIT {
        return Ordering::Less;
    }
    if float < -I128_LIMIT {
        return Ordering::Greater;
    }

    let whole = float.trunc();
    match int.cmp(&(whole as i128)) {
        Ordering::Equal if float > whole => Ordering::Less,
        Ordering::Equal if float < whole => Ordering::Greater,
        other => other,
    }
}

/// The integer a float equals, if any.
fn integral(float: f64) -> Option<i128> {
    let in_range = (-I128_LIMIT..I128_LIMIT).contains(&float);
    (in_range && float.fract() == 0.0).then_some(float as i128)
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Null, SortKey::Null) => Ordering::Equal,
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::Int(a), SortKey::Int(b)) => a.cmp(b),
            (SortKey::Float(a), SortKey::Float(b)) => a.cmp(b),
            (SortKey::Int(a), SortKey::Float(b)) => cmp_int_float(*a, b.0),
            (SortKey::Float(a), SortKey::Int(b)) => {
                cmp_int_float(*b, a.0).reverse()
            }
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Timestamp(a), SortKey::Timestamp(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

impl Hash for SortKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            SortKey::Null => {}
            SortKey::Bool(value) => value.hash(state),
            SortKey::Int(value) => value.hash(state),
            // Floats equal to an integer hash like that integer.
            SortKey::Float(value) => match integral(value.0) {
                Some(int) => int.hash(state),
                None => {
                    u8::MAX.hash(state);
                    value.hash(state);
                }
            },
            SortKey::Text(value) => value.hash(state),
            SortKey::Timestamp(value) => value.hash(state),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Null => f.write_str("null"),
            SortKey::Bool(value) => write!(f, "{value}"),
            SortKey::Int(value) => write!(f, "{value}"),
            SortKey::Float(value) => write!(f, "{value}"),
            SortKey::Text(value) => f.write_str(value),
            SortKey::Timestamp(value) => write!(f, "{}", value.to_rfc3339()),
        }
    }
}

impl From<bool> for SortKey {
    fn from(value: bool) -> Self {
        SortKey::Bool(value)
    }
}

impl From<i64> for SortKey {
    fn from(value: i64) -> Self {
        SortKey::Int(i128::from(value))
    }
}

impl From<i32> for SortKey {
    fn from(value: i32) -> Self {
        SortKey::Int(i128::from(value))
    }
}

impl From<u32> for SortKey {
    fn from(value: u32) -> Self {
        SortKey::Int(i128::from(value))
    }
}

impl From<u64> for SortKey {
    fn from(value: u64) -> Self {
        SortKey::Int(i128::from(value))
    }
}

impl From<usize> for SortKey {
    fn from(value: usize) -> Self {
        SortKey::Int(i128::try_from(value).unwrap_or(i128::MAX))
    }
}

impl From<f64> for SortKey {
    fn from(value: f64) -> Self {
        SortKey::Float(OrderedFloat(value))
    }
}

impl From<f32> for SortKey {
    fn from(value: f32) -> Self {
        SortKey::Float(OrderedFloat(f64::from(value)))
    }
}

impl From<&str> for SortKey {
    fn from(value: &str) -> Self {
        SortKey::Text(value.to_string())
    }
}

impl From<String> for SortKey {
    fn from(value: String) -> Self {
        SortKey::Text(value)
    }
}

impl From<&String> for SortKey {
    fn from(value: &String) -> Self {
        SortKey::Text(value.clone())
    }
}

impl From<DateTime<Utc>> for SortKey {
    fn from(value: DateTime<Utc>) -> Self {
        SortKey::Timestamp(value)
    }
}

impl<T: Into<SortKey>> From<Option<T>> for SortKey {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SortKey::Null)
    }
}
