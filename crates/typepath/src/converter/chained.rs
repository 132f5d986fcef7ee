//! Composition of two converters end to end.

use std::sync::Arc;

use super::{Converter, SharedConverter};
use crate::error::Result;
use crate::types::TypeToken;
use crate::value::Value;

/// `upstream` then `downstream`.
///
/// Chains nest: either side may itself be a chain. Hops and links add up
/// over the whole chain.
pub struct ChainedConverter {
    upstream: SharedConverter,
    downstream: SharedConverter,
}

impl ChainedConverter {
    /// Compose two converters.
    #[must_use]
    pub fn new(upstream: SharedConverter, downstream: SharedConverter) -> Self {
        Self {
            upstream,
            downstream,
        }
    }

    /// First converter applied.
    #[must_use]
    pub fn upstream(&self) -> &SharedConverter {
        &self.upstream
    }

    /// Second converter applied.
    #[must_use]
    pub fn downstream(&self) -> &SharedConverter {
        &self.downstream
    }
}

impl Converter for ChainedConverter {
    fn from_type(&self) -> TypeToken {
        self.upstream.from_type()
    }

    fn to_type(&self) -> TypeToken {
        self.downstream.to_type()
    }

    fn convert(&self, value: Value) -> Result<Value> {
        let intermediate = self.upstream.convert(value)?;
        self.downstream.convert(intermediate)
    }

    fn accepts(&self, source: TypeToken) -> bool {
        self.upstream.accepts(source)
    }

    fn hops(&self) -> i64 {
        self.upstream.hops() + self.downstream.hops()
    }

    fn links(&self) -> usize {
        self.upstream.links() + self.downstream.links()
    }
}

/// Compose `upstream` and `downstream` into a shared chain.
#[must_use]
pub fn chain(upstream: SharedConverter, downstream: SharedConverter) -> SharedConverter {
    Arc::new(ChainedConverter::new(upstream, downstream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::from_fn;
    use chrono::{DateTime, Utc};
    use proptest::prelude::*;

    fn widen() -> SharedConverter {
        from_fn(|n: i32| Ok(i64::from(n)))
    }

    fn to_date() -> SharedConverter {
        from_fn(|millis: i64| {
            DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
                crate::ConvertError::failed("i64", "DateTime<Utc>", "timestamp out of range")
            })
        })
    }

    #[test]
    fn test_chain_endpoints() {
        let chained = chain(widen(), to_date());
        assert_eq!(chained.from_type(), TypeToken::of::<i32>());
        assert_eq!(chained.to_type(), TypeToken::of::<DateTime<Utc>>());
        assert_eq!(chained.hops(), 99);
        assert_eq!(chained.links(), 2);
    }

    #[test]
    fn test_nested_chain_sums() {
        let stringify = from_fn(|d: DateTime<Utc>| Ok(d.to_rfc3339()));
        let nested = chain(chain(widen(), to_date()), stringify);
        assert_eq!(nested.links(), 3);
        assert_eq!(nested.hops(), 99 + 99);
        let out = nested.convert(Value::new(0i32)).unwrap();
        assert_eq!(
            out.downcast::<String>().unwrap().as_deref(),
            Some("1970-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn test_chain_stops_at_upstream_error() {
        let failing = from_fn(|_: i32| -> Result<i64> {
            Err(anyhow::anyhow!("upstream refused").into())
        });
        let chained = chain(failing, to_date());
        let err = chained.convert(Value::new(1i32)).unwrap_err();
        assert_eq!(err.to_string(), "upstream refused");
    }

    proptest! {
        /// Property: a chain converts exactly like its parts applied in order
        #[test]
        fn prop_chain_equals_composition(millis in -1_000_000_000i32..1_000_000_000i32) {
            let chained = chain(widen(), to_date());

            let via_chain = chained
                .convert(Value::new(millis))
                .unwrap()
                .downcast::<DateTime<Utc>>()
                .unwrap();

            let intermediate = widen().convert(Value::new(millis)).unwrap();
            let via_parts = to_date()
                .convert(intermediate)
                .unwrap()
                .downcast::<DateTime<Utc>>()
                .unwrap();

            prop_assert_eq!(via_chain, via_parts);
        }
    }
}
