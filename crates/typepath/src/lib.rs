#![deny(unsafe_code)]

//! # typepath
//!
//! Type conversion through a registry of converters that composes them into
//! the shortest route between any two types.
//!
//! ## Overview
//!
//! Register small converters (`i64 -> DateTime<Utc>`, `String -> u16`, ...)
//! and ask for conversions the registry was never told about directly. On
//! registration the registry:
//! - stores the converter for its target and every supertype of it
//! - chains it with existing converters, upstream and downstream
//! - keeps, per (from, to) pair, only the route with the fewest hops
//!
//! Lookups that miss retry with the source type's supertypes and remember the
//! answer.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{DateTime, Utc};
//! use typepath::{ConvertError, Registry};
//!
//! let registry = Registry::new();
//! registry.register_fn(|n: i32| Ok(i64::from(n)));
//! registry.register_fn(|millis: i64| {
//!     DateTime::<Utc>::from_timestamp_millis(millis)
//!         .ok_or_else(|| ConvertError::failed("i64", "DateTime<Utc>", "out of range"))
//! });
//!
//! // i32 -> i64 -> DateTime<Utc>
//! let date = registry.convert(1000).to::<DateTime<Utc>>()?;
//! assert_eq!(date, DateTime::from_timestamp_millis(1000));
//!
//! // Absence converts to the primitive default, or to absence
//! assert_eq!(registry.convert(typepath::Value::null()).to::<i32>()?, Some(0));
//! # Ok::<(), ConvertError>(())
//! ```
//!
//! ## Types
//!
//! Conversion is keyed by [`TypeToken`]s of types implementing [`Reflect`].
//! Rust primitives, `String`, `Vec<T>`, `Wrapping<T>` and chrono's
//! `DateTime<Utc>`/`NaiveDate` are covered; declare your own with
//! [`reflect!`]. A subtype's values reach its supertype's converters only
//! when the subtype declares how to widen into that supertype.
//!
//! ## Features
//!
//! - **Shortest Path**: routes compete on a hop metric favouring specific types
//! - **Supertype Lookup**: converters for a supertype serve its subtypes
//! - **Null Handling**: absent values map to defaults or stay absent
//! - **Thread-safe**: one registry can be shared and extended across threads
//! - **Configurable**: TOML files or `TYPEPATH_*` environment variables

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod convert;
mod error;

pub mod config;
pub mod converter;
pub mod global;
pub mod registry;
pub mod types;
pub mod value;

// Re-exports
pub use config::{BuiltinSet, RegistryConfig};
pub use convert::{Conversion, convert};
pub use converter::{Converter, SharedConverter};
pub use error::{ConvertError, Result};
pub use registry::{Registry, RegistryBuilder, RegistryStats, TypeKey};
pub use types::{Reflect, TypeToken};
pub use value::Value;

/// Prelude module for convenient imports
///
/// Commonly used types and traits
pub mod prelude {
    pub use crate::convert::convert;
    pub use crate::{
        ConvertError, Converter, Reflect, Registry, RegistryBuilder, Result, SharedConverter,
        TypeKey, TypeToken, Value, reflect,
    };
}
