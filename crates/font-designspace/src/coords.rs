//! Coordinate spaces and locations.
//!
//! A value travels through three distinct spaces on its way into variation
//! math: user coordinates (what a font user asks for, `wght=400`), design
//! coordinates (the designer's working values, `wght=550`), and normalized
//! coordinates in [-1, 1] (what interpolation runs on). Each space gets its
//! own wrapper type so a value cannot silently cross spaces; conversions
//! live on [`Axis`](crate::Axis).

use std::collections::BTreeMap;
use std::fmt;

use ordered_float::OrderedFloat;

/// A coordinate in user space, e.g. the 400 in `wght=400`.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserCoord(OrderedFloat<f64>);

/// A coordinate in the designer's working space.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DesignCoord(OrderedFloat<f64>);

/// A coordinate in normalized interpolation space, nominally in [-1, 1].
///
/// 0 is the default position on every axis.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedCoord(OrderedFloat<f64>);

impl UserCoord {
    pub fn new(value: f64) -> Self {
        Self(OrderedFloat(value))
    }

    pub fn to_f64(self) -> f64 {
        self.0.into_inner()
    }
}

impl DesignCoord {
    pub fn new(value: f64) -> Self {
        Self(OrderedFloat(value))
    }

    pub fn to_f64(self) -> f64 {
        self.0.into_inner()
    }
}

impl NormalizedCoord {
    pub fn new(value: f64) -> Self {
        Self(OrderedFloat(value))
    }

    pub fn to_f64(self) -> f64 {
        self.0.into_inner()
    }

    /// Whether this coordinate sits on the default position.
    ///
    /// -0.0 counts as default.
    pub fn is_default(self) -> bool {
        self.0.into_inner() == 0.0
    }
}

impl From<f64> for UserCoord {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<f64> for DesignCoord {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<f64> for NormalizedCoord {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for UserCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0.into_inner())
    }
}

impl fmt::Debug for DesignCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0.into_inner())
    }
}

impl fmt::Debug for NormalizedCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0.into_inner())
    }
}

/// An ordered mapping from axis tag to a coordinate in one space.
///
/// Tags are compared as opaque strings. Equality and hashing are structural,
/// so locations can key maps and sets.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location<C>(BTreeMap<String, C>);

/// A location in user space.
pub type UserLocation = Location<UserCoord>;
/// A location in design space.
pub type DesignLocation = Location<DesignCoord>;
/// A location in normalized space. Absent axes read as 0.
pub type NormalizedLocation = Location<NormalizedCoord>;

impl<C> Default for Location<C> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<C: Copy> Location<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a location from (tag, value) pairs.
    pub fn for_pos(positions: &[(&str, f64)]) -> Self
    where
        C: From<f64>,
    {
        positions
            .iter()
            .map(|(tag, value)| (tag.to_string(), C::from(*value)))
            .collect()
    }

    pub fn insert(&mut self, tag: impl Into<String>, pos: C) -> Option<C> {
        self.0.insert(tag.into(), pos)
    }

    pub fn get(&self, tag: &str) -> Option<C> {
        self.0.get(tag).copied()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains_key(tag)
    }

    /// Entries in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, C)> + '_ {
        self.0.iter().map(|(tag, pos)| (tag.as_str(), *pos))
    }

    /// Tags in order.
    pub fn axis_tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl NormalizedLocation {
    /// Drop explicit-zero entries.
    ///
    /// Two normalized locations describe the same master iff their sparsified
    /// forms are equal.
    pub fn sparsify(&self) -> NormalizedLocation {
        self.0
            .iter()
            .filter(|(_, pos)| !pos.is_default())
            .map(|(tag, pos)| (tag.clone(), *pos))
            .collect()
    }

    /// Whether `tag` is present with a non-default value.
    pub fn has_non_zero(&self, tag: &str) -> bool {
        self.get(tag).is_some_and(|pos| !pos.is_default())
    }
}

impl<C> FromIterator<(String, C)> for Location<C> {
    fn from_iter<T: IntoIterator<Item = (String, C)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<C: fmt::Debug> fmt::Debug for Location<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparsify_drops_zeros() {
        let loc = NormalizedLocation::for_pos(&[("wght", 0.5), ("wdth", 0.0), ("ital", -0.0)]);
        assert_eq!(loc.sparsify(), NormalizedLocation::for_pos(&[("wght", 0.5)]));
    }

    #[test]
    fn sparse_equality() {
        let explicit = NormalizedLocation::for_pos(&[("wght", 0.55), ("wdth", 0.0)]);
        let sparse = NormalizedLocation::for_pos(&[("wght", 0.55)]);
        assert_ne!(explicit, sparse);
        assert_eq!(explicit.sparsify(), sparse.sparsify());
    }

    #[test]
    fn absent_axes_read_as_missing() {
        let loc = NormalizedLocation::for_pos(&[("wght", 1.0)]);
        assert_eq!(loc.get("wght"), Some(NormalizedCoord::new(1.0)));
        assert_eq!(loc.get("wdth"), None);
        assert!(loc.has_non_zero("wght"));
        assert!(!loc.has_non_zero("wdth"));
    }

    #[test]
    fn iteration_in_tag_order() {
        let loc = DesignLocation::for_pos(&[("wght", 400.0), ("ital", 1.0), ("wdth", 100.0)]);
        let tags: Vec<_> = loc.axis_tags().collect();
        assert_eq!(tags, vec!["ital", "wdth", "wght"]);
    }
}
