//! Dynamically typed values passed through converters.

use std::fmt;

use crate::error::{ConvertError, Result};
use crate::types::{AnyBox, Reflect, TypeToken, Void};

/// A converter input or output: a runtime type plus an owned payload.
///
/// The payload may be absent; an absent value's runtime type is [`Void`].
pub struct Value {
    token: TypeToken,
    inner: Option<AnyBox>,
}

impl Value {
    /// Wrap a value.
    pub fn new<T: Reflect>(value: T) -> Self {
        Self {
            token: TypeToken::of::<T>(),
            inner: Some(Box::new(value)),
        }
    }

    /// The absent value.
    #[must_use]
    pub fn null() -> Self {
        Self {
            token: TypeToken::of::<Void>(),
            inner: None,
        }
    }

    /// Wrap an optional value, mapping `None` to [`Value::null`].
    pub fn from_option<T: Reflect>(value: Option<T>) -> Self {
        value.map_or_else(Self::null, Self::new)
    }

    /// Whether the value is absent.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    /// Runtime type of the value.
    #[must_use]
    pub fn runtime_type(&self) -> TypeToken {
        self.token
    }

    /// Whether the payload is exactly a `T`.
    #[must_use]
    pub fn is<T: Reflect>(&self) -> bool {
        self.inner.as_ref().is_some_and(|inner| inner.is::<T>())
    }

    /// Borrow the payload as a `T`, if it is exactly one.
    #[must_use]
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.inner.as_ref()?.downcast_ref::<T>()
    }

    /// Take the payload as a `T`.
    ///
    /// Absent values yield `Ok(None)`. A payload of another type is widened
    /// into `T` when its type knows how (see [`Reflect::widen`]).
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::TypeMismatch` if the payload is neither a `T`
    /// nor widenable into one.
    pub fn downcast<T: Reflect>(self) -> Result<Option<T>> {
        let target = TypeToken::of::<T>();
        let found = self.token;
        let mismatch = || ConvertError::type_mismatch(target.name(), found.name());

        let Some(inner) = self.widen(target)?.inner else {
            return Ok(None);
        };
        inner.downcast::<T>().map(|value| Some(*value)).map_err(|_| mismatch())
    }

    /// Present this value as `target`, one widening step at a time.
    ///
    /// Absent values and values already of type `target` are returned as is.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::TypeMismatch` if the runtime type cannot widen
    /// into `target`.
    pub fn widen(self, target: TypeToken) -> Result<Value> {
        if self.token == target || self.inner.is_none() {
            return Ok(self);
        }
        let found = self.token;
        let mismatch = || ConvertError::type_mismatch(target.name(), found.name());
        let steps = found.widening_path(target).ok_or_else(mismatch)?;

        let mut current = self;
        for step in steps {
            let Some(inner) = current.inner else {
                return Err(mismatch());
            };
            current = current
                .token
                .widen_boxed(inner, step)
                .map_err(|_| mismatch())?;
            if current.token != step {
                return Err(mismatch());
            }
        }
        Ok(current)
    }
}

impl<T: Reflect> From<T> for Value {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("Value(null)")
        } else {
            write!(f, "Value({})", self.token)
        }
    }
}
