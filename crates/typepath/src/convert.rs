//! Conversion front end: `convert(value).to::<T>()`.

use crate::error::{ConvertError, Result};
use crate::registry::Registry;
use crate::types::{Reflect, TypeToken};
use crate::value::Value;

/// A pending conversion of one value through a registry.
#[derive(Debug)]
#[must_use = "a conversion does nothing until `to` or `to_type` is called"]
pub struct Conversion<'r> {
    registry: &'r Registry,
    value: Value,
}

impl<'r> Conversion<'r> {
    pub(crate) fn new(registry: &'r Registry, value: Value) -> Self {
        Self { registry, value }
    }

    /// Convert into `T`.
    ///
    /// `Ok(None)` means the value converted to absence, which is what
    /// happens to absent values without a default for `T`.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::NoConverter` if no route exists, or the
    /// converter's own error if it fails.
    pub fn to<T: Reflect>(self) -> Result<Option<T>> {
        self.to_type(TypeToken::of::<T>())?.downcast::<T>()
    }

    /// Convert into the type `target`.
    ///
    /// Values already of type `target` are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::NoConverter` if no route exists, or the
    /// converter's own error if it fails.
    pub fn to_type(self, target: TypeToken) -> Result<Value> {
        let from = self.value.runtime_type();
        if from == target {
            return Ok(self.value);
        }

        let converter = self
            .registry
            .get(from, target)
            .ok_or_else(|| ConvertError::no_converter(from.name(), target.name()))?;
        converter.convert(self.value)
    }
}

impl Registry {
    /// Start converting `value` through this registry.
    pub fn convert(&self, value: impl Into<Value>) -> Conversion<'_> {
        Conversion::new(self, value.into())
    }
}

/// Start converting `value` through the process-wide [`registry`](crate::global::registry).
pub fn convert(value: impl Into<Value>) -> Conversion<'static> {
    Conversion::new(crate::global::registry(), value.into())
}
