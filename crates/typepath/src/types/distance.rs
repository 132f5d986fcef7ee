//! Genericity distance of a type.
//!
//! Distance feeds the hop count of converters: the smaller the sum over a
//! path's endpoint types, the more specific the path. The scale:
//!
//! ```text
//! Object           100
//! interface        100 - number of direct super-interfaces
//! array            distance(component)
//! simple leaf      0
//! class            distance(superclass) - 1
//! ```
//!
//! Class distance keeps dropping with hierarchy depth and may go negative.

use super::{MAX_HIERARCHY_DEPTH, TypeKind, TypeToken};

/// Distance of [`Object`](super::Object), the most generic type.
pub const TOP_DISTANCE: i64 = 100;

impl TypeToken {
    /// Genericity distance of this type.
    #[must_use]
    pub fn distance(&self) -> i64 {
        distance_at(*self, 0)
    }
}

fn distance_at(token: TypeToken, depth: usize) -> i64 {
    if depth > MAX_HIERARCHY_DEPTH {
        tracing::warn!(
            at = token.name(),
            "type hierarchy deeper than {MAX_HIERARCHY_DEPTH} levels, treating as Object"
        );
        return TOP_DISTANCE;
    }

    let descriptor = token.descriptor();
    match descriptor.kind() {
        TypeKind::Top => TOP_DISTANCE,
        TypeKind::Interface => TOP_DISTANCE - descriptor.interfaces().len() as i64,
        TypeKind::Array(component) => distance_at(component, depth + 1),
        TypeKind::Simple => 0,
        TypeKind::Class | TypeKind::Void => match descriptor.superclass() {
            Some(superclass) => distance_at(superclass, depth + 1) - 1,
            None => TOP_DISTANCE - 1,
        },
    }
}
