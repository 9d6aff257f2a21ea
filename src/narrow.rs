//! Checked integer conversions.
//!
//! Lengths are `usize` in Rust but the platform calls want `u32`, `i32` or
//! return `isize`; every such hand-off goes through [`narrow`] so that a value
//! which does not fit is reported instead of being wrapped.

use crate::{Error, Result};

/// Convert `value` to `T` if and only if it is exactly representable there.
///
/// Works across signedness: a negative value never becomes a large unsigned
/// one, and an unsigned value above `T::MAX` never becomes negative. On failure
/// the returned [`Error::Overflow`] carries the caller's location.
#[track_caller]
pub fn narrow<T, U>(value: U) -> Result<T>
where
    T: TryFrom<U>,
{
    match T::try_from(value) {
        Ok(value) => Ok(value),
        Err(_) => Err(Error::overflow()),
    }
}

/// Convert `value` to `T` where the conversion can never lose information.
///
/// This is the no-failure counterpart of [`narrow`]: only conversions the type
/// system proves lossless compile, including `T` to itself.
pub fn widen<T, U>(value: U) -> T
where
    T: From<U>,
{
    T::from(value)
}
