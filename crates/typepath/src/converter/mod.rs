//! Converters: units of FROM -> TO conversion.
//!
//! A [`Converter`] declares the pair of types it converts between and turns
//! one [`Value`] into another. Converters are shared as [`SharedConverter`]
//! and never mutated once built; the registry composes them into
//! [`ChainedConverter`]s to cover types no single converter connects.
//!
//! # Examples
//!
//! ```rust
//! use typepath::converter::{self, Converter};
//! use typepath::Value;
//!
//! let double = converter::from_fn(|n: i32| Ok(n * 2));
//! let out = double.convert(Value::new(21)).unwrap();
//! assert_eq!(out.downcast::<i32>().unwrap(), Some(42));
//! ```

mod chained;
mod null;

pub use chained::{ChainedConverter, chain};
pub use null::{NullConverter, null_converter};

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::Result;
use crate::types::{Reflect, TypeToken, Void};
use crate::value::Value;

/// A converter shared between path table entries and chains.
pub type SharedConverter = Arc<dyn Converter>;

/// A unit of conversion between two declared types.
pub trait Converter: Send + Sync {
    /// Declared source type.
    fn from_type(&self) -> TypeToken;

    /// Declared target type.
    fn to_type(&self) -> TypeToken;

    /// Convert `value`, whose runtime type is assignable to [`from_type`](Self::from_type).
    ///
    /// # Errors
    ///
    /// Returns an error if the value has an unexpected type or the
    /// conversion itself fails.
    fn convert(&self, value: Value) -> Result<Value>;

    /// Cost of this converter when competing for a path.
    ///
    /// Direct converters cost the sum of their endpoint distances.
    fn hops(&self) -> i64 {
        self.from_type().distance() + self.to_type().distance()
    }

    /// Whether values whose runtime type is `source` can be handed to
    /// [`convert`](Self::convert).
    ///
    /// The default accepts the declared source type and anything that can
    /// widen into it. Converters that read their input generically may
    /// accept more.
    fn accepts(&self, source: TypeToken) -> bool {
        source.can_widen_into(self.from_type())
    }

    /// Number of direct converters this one is made of.
    fn links(&self) -> usize {
        1
    }

    /// Whether this is the null sentinel returned for absent inputs.
    fn is_null_converter(&self) -> bool {
        false
    }
}

impl fmt::Debug for dyn Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from_type(), self.to_type())
    }
}

type ConvertFn<A, B> = dyn Fn(A) -> Result<B> + Send + Sync;

/// Converter backed by a typed closure.
pub struct FnConverter<A, B> {
    f: Box<ConvertFn<A, B>>,
    _types: PhantomData<fn(A) -> B>,
}

impl<A: Reflect, B: Reflect> FnConverter<A, B> {
    /// Wrap a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(A) -> Result<B> + Send + Sync + 'static,
    {
        Self {
            f: Box::new(f),
            _types: PhantomData,
        }
    }
}

impl<A: Reflect, B: Reflect> Converter for FnConverter<A, B> {
    fn from_type(&self) -> TypeToken {
        TypeToken::of::<A>()
    }

    fn to_type(&self) -> TypeToken {
        TypeToken::of::<B>()
    }

    fn convert(&self, value: Value) -> Result<Value> {
        match value.downcast::<A>()? {
            Some(input) => (self.f)(input).map(Value::new),
            None => Ok(Value::null()),
        }
    }
}

/// Build a shared converter from a typed closure.
///
/// Absent inputs are passed through as absent outputs without calling `f`.
pub fn from_fn<A, B, F>(f: F) -> SharedConverter
where
    A: Reflect,
    B: Reflect,
    F: Fn(A) -> Result<B> + Send + Sync + 'static,
{
    Arc::new(FnConverter::new(f))
}

/// Converter that widens values into one of their supertypes.
pub struct Upcast {
    from: TypeToken,
    to: TypeToken,
}

impl Converter for Upcast {
    fn from_type(&self) -> TypeToken {
        self.from
    }

    fn to_type(&self) -> TypeToken {
        self.to
    }

    fn convert(&self, value: Value) -> Result<Value> {
        value.widen(self.to)
    }
}

/// Build a converter that widens `A` values into `B` via [`Reflect::widen`].
#[must_use]
pub fn upcast<A: Reflect, B: Reflect>() -> SharedConverter {
    Arc::new(Upcast {
        from: TypeToken::of::<A>(),
        to: TypeToken::of::<B>(),
    })
}

/// Converter from [`Void`] that produces a fixed default.
pub struct ConstConverter<T> {
    make: fn() -> T,
}

impl<T: Reflect> Converter for ConstConverter<T> {
    fn from_type(&self) -> TypeToken {
        TypeToken::of::<Void>()
    }

    fn to_type(&self) -> TypeToken {
        TypeToken::of::<T>()
    }

    fn convert(&self, _value: Value) -> Result<Value> {
        Ok(Value::new((self.make)()))
    }
}

/// Build a `Void -> T` converter yielding `make()` for absent inputs.
#[must_use]
pub fn constant<T: Reflect>(make: fn() -> T) -> SharedConverter {
    Arc::new(ConstConverter { make })
}
