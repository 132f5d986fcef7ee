//! Built-in type catalog: markers, numerics, strings, sequences and dates.

use std::fmt;
use std::num::Wrapping;

use chrono::{DateTime, NaiveDate, Utc};

use super::{Reflect, TypeDescriptor, TypeToken};
use crate::value::Value;

/// The universal supertype. Never instantiated.
#[derive(Debug)]
pub enum Object {}

/// Runtime type of absent values. Never instantiated.
#[derive(Debug)]
pub enum Void {}

impl Reflect for Object {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::top()
    }

    fn type_name() -> &'static str {
        "Object"
    }
}

impl Reflect for Void {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::void()
    }

    fn type_name() -> &'static str {
        "Void"
    }
}

/// Any Rust numeric primitive, as a single nominal type.
///
/// Numeric primitives widen into `Number`, which is what the built-in
/// numeric upcast converters produce.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub enum Number {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Usize(usize),
    F32(f32),
    F64(f64),
}

impl Number {
    /// Whether the wrapped value is an integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        !matches!(self, Self::F32(_) | Self::F64(_))
    }

    /// Value as `f64`, rounding large integers.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::I8(v) => f64::from(v),
            Self::I16(v) => f64::from(v),
            Self::I32(v) => f64::from(v),
            Self::I64(v) => v as f64,
            Self::I128(v) => v as f64,
            Self::Isize(v) => v as f64,
            Self::U8(v) => f64::from(v),
            Self::U16(v) => f64::from(v),
            Self::U32(v) => f64::from(v),
            Self::U64(v) => v as f64,
            Self::U128(v) => v as f64,
            Self::Usize(v) => v as f64,
            Self::F32(v) => f64::from(v),
            Self::F64(v) => v,
        }
    }

    /// Value as `i64`, if it is an integer that fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::I8(v) => Some(i64::from(v)),
            Self::I16(v) => Some(i64::from(v)),
            Self::I32(v) => Some(i64::from(v)),
            Self::I64(v) => Some(v),
            Self::I128(v) => i64::try_from(v).ok(),
            Self::Isize(v) => i64::try_from(v).ok(),
            Self::U8(v) => Some(i64::from(v)),
            Self::U16(v) => Some(i64::from(v)),
            Self::U32(v) => Some(i64::from(v)),
            Self::U64(v) => i64::try_from(v).ok(),
            Self::U128(v) => i64::try_from(v).ok(),
            Self::Usize(v) => i64::try_from(v).ok(),
            Self::F32(_) | Self::F64(_) => None,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I8(v) => v.fmt(f),
            Self::I16(v) => v.fmt(f),
            Self::I32(v) => v.fmt(f),
            Self::I64(v) => v.fmt(f),
            Self::I128(v) => v.fmt(f),
            Self::Isize(v) => v.fmt(f),
            Self::U8(v) => v.fmt(f),
            Self::U16(v) => v.fmt(f),
            Self::U32(v) => v.fmt(f),
            Self::U64(v) => v.fmt(f),
            Self::U128(v) => v.fmt(f),
            Self::Usize(v) => v.fmt(f),
            Self::F32(v) => v.fmt(f),
            Self::F64(v) => v.fmt(f),
        }
    }
}

impl Reflect for Number {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::class()
    }

    fn type_name() -> &'static str {
        "Number"
    }
}

macro_rules! numeric_primitives {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Number {
                fn from(value: $t) -> Self {
                    Self::$variant(value)
                }
            }

            impl Reflect for $t {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::simple().widens_to(TypeToken::of::<Number>())
                }

                fn type_name() -> &'static str {
                    stringify!($t)
                }

                fn widen(self, target: TypeToken) -> Result<Value, Self> {
                    if target == TypeToken::of::<Number>() {
                        Ok(Value::new(Number::$variant(self)))
                    } else {
                        Err(self)
                    }
                }
            }
        )*
    };
}

numeric_primitives! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}

// Wrapping<T> plays the boxed role: a class under Number that unboxes to T.
macro_rules! wrapping_numerics {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl Reflect for Wrapping<$t> {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::class()
                        .extends(TypeToken::of::<Number>())
                        .unboxes_to(TypeToken::of::<$t>())
                        .widens_to(TypeToken::of::<$t>())
                        .widens_to(TypeToken::of::<Number>())
                }

                fn type_name() -> &'static str {
                    concat!("Wrapping<", stringify!($t), ">")
                }

                fn widen(self, target: TypeToken) -> Result<Value, Self> {
                    if target == TypeToken::of::<$t>() {
                        Ok(Value::new(self.0))
                    } else if target == TypeToken::of::<Number>() {
                        Ok(Value::new(Number::$variant(self.0)))
                    } else {
                        Err(self)
                    }
                }
            }
        )*
    };
}

wrapping_numerics! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
}

macro_rules! simple_leaves {
    ($($t:ty => $name:expr),* $(,)?) => {
        $(
            impl Reflect for $t {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::simple()
                }

                fn type_name() -> &'static str {
                    $name
                }
            }
        )*
    };
}

simple_leaves! {
    bool => "bool",
    char => "char",
    String => "String",
    &'static str => "&str",
}

impl<T: Reflect> Reflect for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::array(TypeToken::of::<T>())
    }
}

impl Reflect for DateTime<Utc> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::class()
    }

    fn type_name() -> &'static str {
        "DateTime<Utc>"
    }
}

impl Reflect for NaiveDate {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::class()
    }

    fn type_name() -> &'static str {
        "NaiveDate"
    }
}
