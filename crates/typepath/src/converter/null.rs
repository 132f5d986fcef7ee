//! The null sentinel converter.

use once_cell::sync::Lazy;
use std::sync::Arc;

use super::{Converter, SharedConverter};
use crate::error::Result;
use crate::types::{Object, TypeToken, Void};
use crate::value::Value;

static NULL_CONVERTER: Lazy<SharedConverter> = Lazy::new(|| Arc::new(NullConverter));

/// Converts absence into absence, for any target.
///
/// Returned by lookups from [`Void`] that have no explicit default. It is
/// never stored in a path table.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullConverter;

impl Converter for NullConverter {
    fn from_type(&self) -> TypeToken {
        TypeToken::of::<Void>()
    }

    fn to_type(&self) -> TypeToken {
        TypeToken::of::<Object>()
    }

    fn convert(&self, _value: Value) -> Result<Value> {
        Ok(Value::null())
    }

    fn is_null_converter(&self) -> bool {
        true
    }
}

/// The shared null sentinel.
#[must_use]
pub fn null_converter() -> SharedConverter {
    Arc::clone(&NULL_CONVERTER)
}
