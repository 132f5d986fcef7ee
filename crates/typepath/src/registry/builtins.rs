//! Built-in converter groups, installed in a fixed order.

use std::num::Wrapping;

use super::Registry;
use crate::config::BuiltinSet;
use crate::converter::{self, SharedConverter};
use crate::error::ConvertError;
use crate::types::Number;

pub(crate) fn install(registry: &Registry, builtins: BuiltinSet) {
    let groups = [
        (builtins.numeric_upcasts, numeric_upcasts as fn() -> Vec<SharedConverter>),
        (builtins.null_defaults, null_defaults),
        (builtins.string_parsing, string_parsers),
    ];
    for (enabled, group) in groups {
        if enabled {
            for converter in group() {
                registry.register(converter);
            }
        }
    }
}

macro_rules! upcasts {
    ($($t:ty),* $(,)?) => {
        vec![$(converter::upcast::<$t, Number>()),*]
    };
}

fn numeric_upcasts() -> Vec<SharedConverter> {
    let mut converters = upcasts![
        i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    ];
    converters.extend(upcasts![
        Wrapping<i8>,
        Wrapping<i16>,
        Wrapping<i32>,
        Wrapping<i64>,
        Wrapping<i128>,
        Wrapping<isize>,
        Wrapping<u8>,
        Wrapping<u16>,
        Wrapping<u32>,
        Wrapping<u64>,
        Wrapping<u128>,
        Wrapping<usize>,
    ]);
    converters
}

macro_rules! defaults {
    ($($t:ty),* $(,)?) => {
        vec![$(converter::constant::<$t>(<$t>::default)),*]
    };
}

fn null_defaults() -> Vec<SharedConverter> {
    defaults![
        bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    ]
}

macro_rules! parsers {
    ($($t:ty),* $(,)?) => {
        vec![$(
            converter::from_fn(|s: String| {
                s.parse::<$t>()
                    .map_err(|e| ConvertError::failed("String", stringify!($t), e.to_string()))
            })
        ),*]
    };
}

fn string_parsers() -> Vec<SharedConverter> {
    parsers![
        bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;
    use crate::types::{TypeToken, Void};
    use rstest::rstest;

    #[test]
    fn test_group_sizes() {
        assert_eq!(numeric_upcasts().len(), 26);
        assert_eq!(null_defaults().len(), 16);
        assert_eq!(string_parsers().len(), 16);
    }

    #[test]
    fn test_upcasts_target_number() {
        for converter in numeric_upcasts() {
            assert_eq!(converter.to_type(), TypeToken::of::<Number>());
        }
    }

    #[rstest]
    #[case(TypeToken::of::<bool>(), "false")]
    #[case(TypeToken::of::<i32>(), "0")]
    #[case(TypeToken::of::<f64>(), "0")]
    fn test_null_defaults(#[case] target: TypeToken, #[case] expected: &str) {
        let converter = null_defaults()
            .into_iter()
            .find(|c| c.to_type() == target)
            .unwrap();
        assert_eq!(converter.from_type(), TypeToken::of::<Void>());

        let out = converter.convert(Value::null()).unwrap();
        let rendered = if let Some(b) = out.downcast_ref::<bool>() {
            b.to_string()
        } else if let Some(n) = out.downcast_ref::<i32>() {
            n.to_string()
        } else {
            out.downcast_ref::<f64>().unwrap().to_string()
        };
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_string_parser_failure() {
        let parser = string_parsers()
            .into_iter()
            .find(|c| c.to_type() == TypeToken::of::<u8>())
            .unwrap();
        let out = parser.convert(Value::new("42".to_string())).unwrap();
        assert_eq!(out.downcast::<u8>().unwrap(), Some(42));

        let err = parser.convert(Value::new("-1".to_string())).unwrap_err();
        assert!(matches!(err, ConvertError::Failed { to: "u8", .. }));
    }

    #[test]
    fn test_install_respects_set() {
        let registry = Registry::empty();
        install(&registry, BuiltinSet::none());
        assert!(registry.is_empty());

        install(
            &registry,
            BuiltinSet {
                numeric_upcasts: false,
                null_defaults: true,
                string_parsing: false,
            },
        );
        assert_eq!(registry.len(), 16);
    }
}
