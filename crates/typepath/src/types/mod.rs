//! Type identity and hierarchy.
//!
//! Conversion paths are keyed by types, and path resolution needs to ask
//! questions a plain [`TypeId`] cannot answer: what does this type extend,
//! which interfaces does it implement, how "generic" is it. Every type that
//! takes part in conversion therefore implements [`Reflect`], which describes
//! its place in a nominal hierarchy rooted at [`Object`].
//!
//! # Key Types
//!
//! - [`TypeToken`] - `Copy` handle identifying one type
//! - [`TypeDescriptor`] - kind, superclass and interfaces of a type
//! - [`Reflect`] - implemented by every convertible type
//!
//! # Examples
//!
//! ```rust
//! use typepath::reflect;
//! use typepath::types::{TypeToken, Object};
//!
//! pub enum Shape {}
//! pub struct Circle { pub radius: f64 }
//!
//! reflect! {
//!     Shape => interface;
//!     Circle => class [Shape];
//! }
//!
//! let circle = TypeToken::of::<Circle>();
//! assert!(TypeToken::of::<Shape>().is_assignable_from(circle));
//! assert!(TypeToken::of::<Object>().is_assignable_from(circle));
//! ```

mod builtin;
mod distance;

pub use builtin::{Number, Object, Void};
pub use distance::TOP_DISTANCE;

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::value::Value;

/// Maximum number of hierarchy levels walked before traversal gives up.
pub const MAX_HIERARCHY_DEPTH: usize = 64;

/// Owned, type-erased payload.
pub type AnyBox = Box<dyn Any + Send + Sync>;

type DescribeFn = fn() -> TypeDescriptor;
type WidenFn = fn(AnyBox, TypeToken) -> Result<Value, AnyBox>;

/// A type that can take part in conversion.
///
/// Implement it with the [`reflect!`](crate::reflect) macro, or by hand.
///
/// Declaring a supertype only places the type in the hierarchy. A value is
/// handed to a converter written for one of its supertypes only when the
/// type can also [`widen`](Reflect::widen) into that supertype, which takes
/// both a [`TypeDescriptor::widens_to`] entry and a matching `widen`
/// implementation. `reflect!` generates both for a superclass declared with
/// a `{ widen: ... }` clause. Without them the registry does not route
/// values of the type through converters for its supertypes, and such
/// lookups report no converter.
pub trait Reflect: Any + Send + Sync + Sized {
    /// Describe this type's position in the hierarchy.
    fn describe() -> TypeDescriptor;

    /// Name used in diagnostics.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Present this value as `target`, one of the types its descriptor lists
    /// under [`widens_to`](TypeDescriptor::widens_to).
    ///
    /// Only direct targets need handling; multi-step widening is walked by
    /// [`Value::widen`]. Returns the value unchanged in `Err` when no such
    /// view exists. The default implementation has none.
    fn widen(self, target: TypeToken) -> Result<Value, Self> {
        let _ = target;
        Err(self)
    }
}

/// Broad classification of a type, used by the distance metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// The universal supertype ([`Object`])
    Top,
    /// The absence marker ([`Void`])
    Void,
    /// Primitive-like leaf types: numbers, `bool`, `char`, strings
    Simple,
    /// Nominal types with a superclass
    Class,
    /// Interface-like marker types
    Interface,
    /// Sequence of the component type
    Array(TypeToken),
}

/// Static description of a type: kind, superclass, interfaces.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    kind: TypeKind,
    superclass: Option<TypeToken>,
    interfaces: Vec<TypeToken>,
    unboxed: Option<TypeToken>,
    widens: Vec<TypeToken>,
}

impl TypeDescriptor {
    fn with_kind(kind: TypeKind, superclass: Option<TypeToken>) -> Self {
        Self {
            kind,
            superclass,
            interfaces: Vec::new(),
            unboxed: None,
            widens: Vec::new(),
        }
    }

    pub(crate) fn top() -> Self {
        Self::with_kind(TypeKind::Top, None)
    }

    pub(crate) fn void() -> Self {
        Self::with_kind(TypeKind::Void, Some(TypeToken::of::<Object>()))
    }

    /// A primitive-like leaf with no supertypes.
    #[must_use]
    pub fn simple() -> Self {
        Self::with_kind(TypeKind::Simple, None)
    }

    /// A class extending [`Object`] unless [`extends`](Self::extends) says otherwise.
    #[must_use]
    pub fn class() -> Self {
        Self::with_kind(TypeKind::Class, Some(TypeToken::of::<Object>()))
    }

    /// An interface. Interfaces are always assignable to [`Object`].
    #[must_use]
    pub fn interface() -> Self {
        Self::with_kind(TypeKind::Interface, None)
    }

    /// A sequence of `component`.
    #[must_use]
    pub fn array(component: TypeToken) -> Self {
        Self::with_kind(TypeKind::Array(component), Some(TypeToken::of::<Object>()))
    }

    /// Set the superclass.
    #[must_use]
    pub fn extends(mut self, superclass: TypeToken) -> Self {
        self.superclass = Some(superclass);
        self
    }

    /// Add a directly implemented interface (or super-interface, for interfaces).
    #[must_use]
    pub fn implements(mut self, interface: TypeToken) -> Self {
        if !self.interfaces.contains(&interface) {
            self.interfaces.push(interface);
        }
        self
    }

    /// Declare the primitive counterpart of a boxed numeric type.
    #[must_use]
    pub fn unboxes_to(mut self, primitive: TypeToken) -> Self {
        self.unboxed = Some(primitive);
        self
    }

    /// Declare that values can be presented as `target` through
    /// [`Reflect::widen`].
    #[must_use]
    pub fn widens_to(mut self, target: TypeToken) -> Self {
        if !self.widens.contains(&target) {
            self.widens.push(target);
        }
        self
    }

    /// Kind of the type.
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Direct superclass, if any.
    #[must_use]
    pub fn superclass(&self) -> Option<TypeToken> {
        self.superclass
    }

    /// Directly implemented interfaces, in declaration order.
    #[must_use]
    pub fn interfaces(&self) -> &[TypeToken] {
        &self.interfaces
    }

    /// Primitive counterpart, for boxed numeric types.
    #[must_use]
    pub fn unboxed(&self) -> Option<TypeToken> {
        self.unboxed
    }

    /// Types values can be widened into directly.
    #[must_use]
    pub fn widens(&self) -> &[TypeToken] {
        &self.widens
    }
}

/// Identity handle for a [`Reflect`] type.
///
/// Equality and hashing use the underlying [`TypeId`] only.
#[derive(Clone, Copy)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
    describe: DescribeFn,
    widen: WidenFn,
}

impl TypeToken {
    /// Token for `T`.
    #[must_use]
    pub fn of<T: Reflect>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: T::type_name(),
            describe: T::describe,
            widen: widen_erased::<T>,
        }
    }

    /// Underlying [`TypeId`].
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Diagnostic name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Full descriptor of the type.
    #[must_use]
    pub fn descriptor(&self) -> TypeDescriptor {
        (self.describe)()
    }

    /// Kind of the type.
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.descriptor().kind
    }

    /// Whether this is [`Object`].
    #[must_use]
    pub fn is_top(&self) -> bool {
        self.id == TypeId::of::<Object>()
    }

    /// Whether this is [`Void`], the runtime type of absent values.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.id == TypeId::of::<Void>()
    }

    /// Primitive counterpart of a boxed numeric type.
    #[must_use]
    pub fn unboxed(&self) -> Option<TypeToken> {
        self.descriptor().unboxed
    }

    /// Direct supertypes: superclass first, then interfaces.
    ///
    /// Interfaces without a superclass report [`Object`] last.
    #[must_use]
    pub fn supertypes(&self) -> Vec<TypeToken> {
        let descriptor = self.descriptor();
        let mut supertypes = Vec::with_capacity(descriptor.interfaces.len() + 1);
        supertypes.extend(descriptor.superclass);
        for interface in descriptor.interfaces {
            if !supertypes.contains(&interface) {
                supertypes.push(interface);
            }
        }
        if descriptor.kind == TypeKind::Interface {
            let top = TypeToken::of::<Object>();
            if !supertypes.contains(&top) {
                supertypes.push(top);
            }
        }
        supertypes
    }

    /// All transitive supertypes, breadth-first, each reported once.
    #[must_use]
    pub fn ancestors(&self) -> Vec<TypeToken> {
        let mut seen = HashSet::from([*self]);
        let mut ancestors = Vec::new();
        let mut queue: VecDeque<(TypeToken, usize)> = VecDeque::from([(*self, 0)]);

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= MAX_HIERARCHY_DEPTH {
                tracing::warn!(
                    root = self.name,
                    at = current.name,
                    "type hierarchy deeper than {MAX_HIERARCHY_DEPTH} levels, truncating"
                );
                continue;
            }
            for supertype in current.supertypes() {
                if supertype == *self {
                    tracing::warn!(root = self.name, via = current.name, "cyclic type hierarchy");
                    continue;
                }
                if seen.insert(supertype) {
                    ancestors.push(supertype);
                    queue.push_back((supertype, depth + 1));
                }
            }
        }

        ancestors
    }

    /// Whether a value of type `other` can be used where `self` is expected.
    #[must_use]
    pub fn is_assignable_from(&self, other: TypeToken) -> bool {
        *self == other || other.ancestors().contains(self)
    }

    /// Whether values of this type can be presented as `target`, directly or
    /// through a series of widenings.
    #[must_use]
    pub fn can_widen_into(&self, target: TypeToken) -> bool {
        self.widening_path(target).is_some()
    }

    /// Shortest series of widening steps from this type to `target`,
    /// excluding this type itself. Empty when `target` is this type.
    #[must_use]
    pub fn widening_path(&self, target: TypeToken) -> Option<Vec<TypeToken>> {
        if *self == target {
            return Some(Vec::new());
        }

        let mut previous: HashMap<TypeToken, TypeToken> = HashMap::new();
        let mut queue: VecDeque<(TypeToken, usize)> = VecDeque::from([(*self, 0)]);

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= MAX_HIERARCHY_DEPTH {
                continue;
            }
            for next in current.descriptor().widens {
                if next == *self || previous.contains_key(&next) {
                    continue;
                }
                previous.insert(next, current);
                if next == target {
                    let mut path = vec![next];
                    let mut step = current;
                    while step != *self {
                        path.push(step);
                        step = previous[&step];
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back((next, depth + 1));
            }
        }

        None
    }

    pub(crate) fn widen_boxed(&self, value: AnyBox, target: TypeToken) -> Result<Value, AnyBox> {
        (self.widen)(value, target)
    }
}

fn widen_erased<T: Reflect>(value: AnyBox, target: TypeToken) -> Result<Value, AnyBox> {
    match value.downcast::<T>() {
        Ok(value) => (*value).widen(target).map_err(|value| Box::new(value) as AnyBox),
        Err(value) => Err(value),
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Declare [`Reflect`] implementations for user types.
///
/// Each entry reads `Type => kind [: Superclass [{ widen: f }]] [[Interface, ...]];`
/// where `kind` is `class`, `interface` or `simple`.
///
/// The optional `widen` clause takes a `fn(Type) -> Superclass` (a path or a
/// non-capturing closure). It lets values of `Type` run through converters
/// written for the superclass and anything above it that the superclass can
/// itself widen into. Without it the superclass is structural only.
///
/// ```rust
/// use typepath::reflect;
///
/// pub enum Named {}
/// pub struct Animal { pub name: String }
/// pub struct Dog { pub name: String }
///
/// reflect! {
///     Named => interface;
///     Animal => class;
///     Dog => class: Animal { widen: |dog: Dog| Animal { name: dog.name } } [Named];
/// }
///
/// use typepath::types::TypeToken;
/// assert!(TypeToken::of::<Dog>().can_widen_into(TypeToken::of::<Animal>()));
/// ```
#[macro_export]
macro_rules! reflect {
    () => {};
    (
        $ty:ty => $kind:ident : $sup:ty { widen: $via:expr $(,)? }
            $([$($iface:ty),* $(,)?])?;
        $($rest:tt)*
    ) => {
        impl $crate::types::Reflect for $ty {
            fn describe() -> $crate::types::TypeDescriptor {
                $crate::types::TypeDescriptor::$kind()
                    .extends($crate::types::TypeToken::of::<$sup>())
                    .widens_to($crate::types::TypeToken::of::<$sup>())
                    $($(.implements($crate::types::TypeToken::of::<$iface>()))*)?
            }

            fn type_name() -> &'static str {
                stringify!($ty)
            }

            fn widen(
                self,
                target: $crate::types::TypeToken,
            ) -> ::core::result::Result<$crate::value::Value, Self> {
                if target == $crate::types::TypeToken::of::<$sup>() {
                    let widen: fn($ty) -> $sup = $via;
                    Ok($crate::value::Value::new(widen(self)))
                } else {
                    Err(self)
                }
            }
        }

        $crate::reflect! { $($rest)* }
    };
    (
        $ty:ty => $kind:ident $(: $sup:ty)? $([$($iface:ty),* $(,)?])?;
        $($rest:tt)*
    ) => {
        impl $crate::types::Reflect for $ty {
            fn describe() -> $crate::types::TypeDescriptor {
                $crate::types::TypeDescriptor::$kind()
                    $(.extends($crate::types::TypeToken::of::<$sup>()))?
                    $($(.implements($crate::types::TypeToken::of::<$iface>()))*)?
            }

            fn type_name() -> &'static str {
                stringify!($ty)
            }
        }

        $crate::reflect! { $($rest)* }
    };
}
