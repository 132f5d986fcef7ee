//! Integration tests for supertype handling
//!
//! Covers target expansion on registration, source widening on lookup,
//! memoization of widened lookups, routes placed under subtype keys, and
//! boxed numerics.

use std::num::Wrapping;
use std::sync::Arc;

use rstest::rstest;
use typepath::converter;
use typepath::prelude::*;
use typepath::types::Number;

pub struct Foo(u32);
pub enum IBar {}
pub enum AbsBar {}
pub struct Bar {
    id: u32,
}

typepath::reflect! {
    Foo => class;
    IBar => interface;
    AbsBar => class;
    Bar => class: AbsBar [IBar];
}

pub struct Animal {
    name: String,
}

pub struct Dog {
    name: String,
}

pub struct Puppy {
    name: String,
}

// Declared under Animal but without a way to become one
pub struct Pup {
    name: String,
}

typepath::reflect! {
    Animal => class;
    Dog => class: Animal { widen: |dog: Dog| Animal { name: dog.name } };
    Puppy => class: Dog { widen: |puppy: Puppy| Dog { name: format!("little {}", puppy.name) } };
    Pup => class: Animal;
}

fn describe_animal() -> SharedConverter {
    converter::from_fn(|animal: Animal| Ok(format!("animal named {}", animal.name)))
}

fn animal_registry() -> Registry {
    let registry = Registry::new();
    registry.register(describe_animal());
    registry
}

#[test]
fn test_target_supertypes_are_registered() {
    let registry = Registry::new();
    registry.register_fn(|foo: Foo| Ok(Bar { id: foo.0 }));

    for target in [
        TypeToken::of::<Bar>(),
        TypeToken::of::<IBar>(),
        TypeToken::of::<AbsBar>(),
    ] {
        let converter = registry.get(TypeToken::of::<Foo>(), target).unwrap();
        let out = converter.convert(Value::new(Foo(9))).unwrap();
        assert!(target.is_assignable_from(out.runtime_type()));
        assert_eq!(out.downcast_ref::<Bar>().map(|bar| bar.id), Some(9));
    }

    // A path to Object says nothing
    assert!(!registry.contains(&TypeKey::of::<Foo, typepath::types::Object>()));
}

#[test]
fn test_lookup_widens_source_and_memoizes() {
    let registry = animal_registry();
    let key = TypeKey::of::<Dog, String>();
    assert!(!registry.contains(&key));

    let first = registry.get_typed::<Dog, String>().unwrap();
    assert_eq!(first.from_type(), TypeToken::of::<Animal>());
    assert!(registry.contains(&key));
    assert_eq!(registry.stats().ancestor_walks, 1);
    assert_eq!(registry.stats().memoized, 1);

    let second = registry.get_typed::<Dog, String>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.stats().ancestor_walks, 1);
}

#[test]
fn test_convert_subtype_value() {
    let registry = animal_registry();
    let dog = Dog {
        name: "Rex".to_string(),
    };
    assert_eq!(
        registry.convert(dog).to::<String>().unwrap().as_deref(),
        Some("animal named Rex")
    );
}

#[test]
fn test_memoized_route_extends_downstream() {
    let registry = animal_registry();
    registry.register_fn(|s: String| Ok(s.len()));

    // Animal -> String -> usize already exists; Dog gets it through the walk
    let converter = registry.get_typed::<Dog, usize>().unwrap();
    assert_eq!(converter.links(), 2);

    let dog = Dog {
        name: "Fido".to_string(),
    };
    assert_eq!(
        registry.convert(dog).to::<usize>().unwrap(),
        Some("animal named Fido".len())
    );
}

#[test]
fn test_widening_walks_several_levels() {
    let registry = animal_registry();
    let puppy = Puppy {
        name: "Bo".to_string(),
    };
    assert_eq!(
        registry.convert(puppy).to::<String>().unwrap().as_deref(),
        Some("animal named little Bo")
    );
}

#[test]
fn test_subtype_without_widening_misses() {
    let registry = animal_registry();
    assert!(registry.get_typed::<Pup, String>().is_none());

    let pup = Pup {
        name: "Nib".to_string(),
    };
    let err = registry.convert(pup).to::<String>().unwrap_err();
    assert!(matches!(
        err,
        ConvertError::NoConverter {
            from: "Pup",
            to: "String"
        }
    ));
}

#[test]
fn test_structural_superclass_target_has_no_route() {
    let registry = Registry::new();
    registry.register_fn(|foo: Foo| Ok(Bar { id: foo.0 }));
    registry.register_fn(|abs: AbsBar| -> Result<String> { match abs {} });

    // Bar never becomes an AbsBar, so nothing can feed that converter
    assert!(registry.get_typed::<Foo, String>().is_none());
    assert!(registry.get_typed::<Bar, String>().is_none());
    assert!(registry.convert(Foo(1)).to::<String>().unwrap_err().is_not_found());
}

#[rstest]
#[case::widening_registered_first(true)]
#[case::widening_registered_last(false)]
fn test_subtype_key_stores_supertype_converter_itself(#[case] widening_first: bool) {
    let registry = Registry::empty();
    let describe = describe_animal();
    let register_widening =
        || registry.register_fn(|dog: Dog| Ok(Animal { name: dog.name }));

    if widening_first {
        register_widening();
        registry.register(Arc::clone(&describe));
    } else {
        registry.register(Arc::clone(&describe));
        register_widening();
    }

    assert!(registry.contains(&TypeKey::of::<Dog, String>()));
    let found = registry.get_typed::<Dog, String>().unwrap();
    assert!(Arc::ptr_eq(&found, &describe));
    assert_eq!(found.links(), 1);
    assert_eq!(registry.stats().ancestor_walks, 0);
}

#[test]
fn test_subtype_without_widening_is_chained() {
    let registry = Registry::empty();
    registry.register(describe_animal());
    registry.register_fn(|pup: Pup| Ok(Animal { name: pup.name }));

    let found = registry.get_typed::<Pup, String>().unwrap();
    assert_eq!(found.links(), 2);

    let pup = Pup {
        name: "Nib".to_string(),
    };
    assert_eq!(
        registry.convert(pup).to::<String>().unwrap().as_deref(),
        Some("animal named Nib")
    );
}

#[test]
fn test_unrelated_source_misses() {
    let registry = animal_registry();
    assert!(registry.get_typed::<Foo, String>().is_none());
    assert_eq!(registry.stats().misses, 1);
}

#[test]
fn test_boxed_target_registers_primitive() {
    let registry = Registry::new();
    registry.register_fn(|s: String| {
        s.parse::<i32>()
            .map(Wrapping)
            .map_err(|e| ConvertError::failed("String", "Wrapping<i32>", e.to_string()))
    });

    assert!(registry.contains(&TypeKey::of::<String, i32>()));
    assert_eq!(
        registry.convert("41".to_string()).to::<i32>().unwrap(),
        Some(41)
    );
    assert_eq!(
        registry.convert("41".to_string()).to::<Number>().unwrap(),
        Some(Number::I32(41))
    );
}

#[test]
fn test_boxed_source_reaches_number() {
    let registry = Registry::new();
    assert_eq!(
        registry.convert(Wrapping(5u8)).to::<Number>().unwrap(),
        Some(Number::U8(5))
    );
}
