//! Tagged Bolt values.

use std::fmt;

use crate::error::BoltError;

/// The tag identifying the kind of payload a [`BoltValue`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoltType {
    Null,
    Int8,
    Int16,
    Int32,
    Int64,
    Int32Array,
}

impl fmt::Display for BoltType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Int32Array => "int32 array",
        };
        f.write_str(name)
    }
}

/// A protocol-transmissible datum: a fixed-width integer scalar or a
/// homogeneous integer array, self-identified by its tag.
///
/// Values are created `Null` and mutated in place by `set_*` operations
/// that replace tag and payload together — a failed setter leaves the
/// value exactly as it was. Each value exclusively owns its backing
/// storage, which is released once when the value is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BoltValue {
    #[default]
    Null,
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Int32Array(Vec<i32>),
}

impl BoltValue {
    /// Creates a new value in the `Null` state.
    pub fn new() -> Self {
        Self::Null
    }

    /// Returns the tag for this value's current payload.
    pub fn bolt_type(&self) -> BoltType {
        match self {
            Self::Null => BoltType::Null,
            Self::Int8(_) => BoltType::Int8,
            Self::Int16(_) => BoltType::Int16,
            Self::Int32(_) => BoltType::Int32,
            Self::Int64(_) => BoltType::Int64,
            Self::Int32Array(_) => BoltType::Int32Array,
        }
    }

    /// Cardinality: 0 for `Null`, 1 for scalars, element count for arrays.
    pub fn size(&self) -> usize {
        match self {
            Self::Null => 0,
            Self::Int8(_) | Self::Int16(_) | Self::Int32(_) | Self::Int64(_) => 1,
            Self::Int32Array(xs) => xs.len(),
        }
    }

    /// Resets the value to `Null`, releasing any array storage.
    pub fn set_null(&mut self) {
        *self = Self::Null;
    }

    /// Replaces this value with an `Int8` scalar.
    ///
    /// `x` is range-checked against the 8-bit signed width before any
    /// mutation: out-of-range input is rejected and the value keeps its
    /// prior tag and payload.
    pub fn set_int8(&mut self, x: i64) -> Result<(), BoltError> {
        let x = i8::try_from(x).map_err(|_| BoltError::OutOfRange {
            value: x,
            target: BoltType::Int8,
        })?;
        *self = Self::Int8(x);
        Ok(())
    }

    /// Replaces this value with an `Int16` scalar. Range-checked like
    /// [`set_int8`](Self::set_int8).
    pub fn set_int16(&mut self, x: i64) -> Result<(), BoltError> {
        let x = i16::try_from(x).map_err(|_| BoltError::OutOfRange {
            value: x,
            target: BoltType::Int16,
        })?;
        *self = Self::Int16(x);
        Ok(())
    }

    /// Replaces this value with an `Int32` scalar. Range-checked like
    /// [`set_int8`](Self::set_int8).
    pub fn set_int32(&mut self, x: i64) -> Result<(), BoltError> {
        let x = i32::try_from(x).map_err(|_| BoltError::OutOfRange {
            value: x,
            target: BoltType::Int32,
        })?;
        *self = Self::Int32(x);
        Ok(())
    }

    /// Replaces this value with an `Int64` scalar. Every `i64` fits.
    pub fn set_int64(&mut self, x: i64) {
        *self = Self::Int64(x);
    }

    /// Replaces this value with an `Int32Array` holding an ordered copy of
    /// `xs`. An empty slice yields a size-0 array, which is a valid value
    /// distinct from `Null`.
    pub fn set_int32_array(&mut self, xs: &[i32]) {
        *self = Self::Int32Array(xs.to_vec());
    }

    /// Returns the `Int8` payload, or a type mismatch for any other tag.
    pub fn get_int8(&self) -> Result<i8, BoltError> {
        match self {
            Self::Int8(x) => Ok(*x),
            other => Err(mismatch(BoltType::Int8, other)),
        }
    }

    /// Returns the `Int16` payload, or a type mismatch for any other tag.
    pub fn get_int16(&self) -> Result<i16, BoltError> {
        match self {
            Self::Int16(x) => Ok(*x),
            other => Err(mismatch(BoltType::Int16, other)),
        }
    }

    /// Returns the `Int32` payload, or a type mismatch for any other tag.
    pub fn get_int32(&self) -> Result<i32, BoltError> {
        match self {
            Self::Int32(x) => Ok(*x),
            other => Err(mismatch(BoltType::Int32, other)),
        }
    }

    /// Returns the `Int64` payload, or a type mismatch for any other tag.
    pub fn get_int64(&self) -> Result<i64, BoltError> {
        match self {
            Self::Int64(x) => Ok(*x),
            other => Err(mismatch(BoltType::Int64, other)),
        }
    }

    /// Returns element `index` of an `Int32Array`.
    ///
    /// Fails with a type mismatch on non-array tags and with an
    /// index-out-of-range error when `index >= size`. No wraparound, no
    /// negative-index semantics.
    pub fn get_int32_element(&self, index: usize) -> Result<i32, BoltError> {
        match self {
            Self::Int32Array(xs) => {
                xs.get(index)
                    .copied()
                    .ok_or(BoltError::IndexOutOfRange {
                        index,
                        size: xs.len(),
                    })
            }
            other => Err(mismatch(BoltType::Int32Array, other)),
        }
    }

    /// Returns any scalar payload widened to `i64`, if this value holds one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int8(x) => Some(i64::from(*x)),
            Self::Int16(x) => Some(i64::from(*x)),
            Self::Int32(x) => Some(i64::from(*x)),
            Self::Int64(x) => Some(*x),
            Self::Null | Self::Int32Array(_) => None,
        }
    }
}

fn mismatch(expected: BoltType, actual: &BoltValue) -> BoltError {
    BoltError::TypeMismatch {
        expected,
        actual: actual.bolt_type(),
    }
}

// -- Convenience conversions --

impl From<i8> for BoltValue {
    fn from(x: i8) -> Self {
        Self::Int8(x)
    }
}

impl From<i16> for BoltValue {
    fn from(x: i16) -> Self {
        Self::Int16(x)
    }
}

impl From<i32> for BoltValue {
    fn from(x: i32) -> Self {
        Self::Int32(x)
    }
}

impl From<i64> for BoltValue {
    fn from(x: i64) -> Self {
        Self::Int64(x)
    }
}

impl From<Vec<i32>> for BoltValue {
    fn from(xs: Vec<i32>) -> Self {
        Self::Int32Array(xs)
    }
}

impl From<&[i32]> for BoltValue {
    fn from(xs: &[i32]) -> Self {
        Self::Int32Array(xs.to_vec())
    }
}

impl fmt::Display for BoltValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Int8(x) => write!(f, "{x}"),
            Self::Int16(x) => write!(f, "{x}"),
            Self::Int32(x) => write!(f, "{x}"),
            Self::Int64(x) => write!(f, "{x}"),
            Self::Int32Array(xs) => {
                write!(f, "[")?;
                for (i, x) in xs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{x}")?;
                }
                write!(f, "]")
            }
        }
    }
}
