//! Variation axes and the conversions between coordinate spaces.

use crate::coords::{
    DesignCoord, DesignLocation, NormalizedCoord, NormalizedLocation, UserCoord, UserLocation,
};
use crate::error::{Error, Result};

/// A variation axis, with extremes in user coordinates.
///
/// `map` is an optional user-to-design break table, non-decreasing in both
/// columns. Without one, user and design coordinates coincide.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    /// Short axis tag (e.g. "wght", "ital"), compared as an opaque string.
    pub tag: String,
    /// Human-readable axis name.
    pub name: Option<String>,
    /// Whether UIs should hide this axis.
    pub hidden: bool,
    pub minimum: UserCoord,
    pub default: UserCoord,
    pub maximum: UserCoord,
    pub map: Option<Vec<(UserCoord, DesignCoord)>>,
}

impl Axis {
    /// Create an axis without a user-to-design mapping.
    pub fn new(tag: &str, minimum: f64, default: f64, maximum: f64) -> Self {
        Self {
            tag: tag.to_string(),
            name: None,
            hidden: false,
            minimum: minimum.into(),
            default: default.into(),
            maximum: maximum.into(),
            map: None,
        }
    }

    /// Set the human-readable name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Set the user-to-design break table from (user, design) pairs.
    pub fn with_map(mut self, map: Vec<(f64, f64)>) -> Self {
        self.map = Some(
            map.into_iter()
                .map(|(user, design)| (user.into(), design.into()))
                .collect(),
        );
        self
    }

    /// Convert a user-space value to design space through the break table.
    pub fn userspace_to_designspace(&self, value: UserCoord) -> DesignCoord {
        match &self.map {
            Some(map) => {
                let table: Vec<(f64, f64)> = map
                    .iter()
                    .map(|(user, design)| (user.to_f64(), design.to_f64()))
                    .collect();
                DesignCoord::new(piecewise_linear_map(value.to_f64(), &table))
            }
            None => DesignCoord::new(value.to_f64()),
        }
    }

    /// Convert a design-space value back to user space.
    pub fn designspace_to_userspace(&self, value: DesignCoord) -> UserCoord {
        match &self.map {
            Some(map) => {
                let table: Vec<(f64, f64)> = map
                    .iter()
                    .map(|(user, design)| (design.to_f64(), user.to_f64()))
                    .collect();
                UserCoord::new(piecewise_linear_map(value.to_f64(), &table))
            }
            None => UserCoord::new(value.to_f64()),
        }
    }

    pub fn design_minimum(&self) -> DesignCoord {
        self.userspace_to_designspace(self.minimum)
    }

    pub fn design_default(&self) -> DesignCoord {
        self.userspace_to_designspace(self.default)
    }

    pub fn design_maximum(&self) -> DesignCoord {
        self.userspace_to_designspace(self.maximum)
    }

    /// Normalize a design-space value against this axis.
    pub fn normalize_design(&self, value: DesignCoord, extrapolate: bool) -> Result<NormalizedCoord> {
        normalize_value(
            value,
            self.design_minimum(),
            self.design_default(),
            self.design_maximum(),
            extrapolate,
        )
    }

    /// Normalize a user-space value against this axis.
    pub fn normalize_user(&self, value: UserCoord, extrapolate: bool) -> Result<NormalizedCoord> {
        self.normalize_design(self.userspace_to_designspace(value), extrapolate)
    }
}

/// Map a value through a piecewise-linear break table.
///
/// The table is (from, to) pairs, non-decreasing in the `from` column. An
/// empty table is the identity. Values at or beyond the table ends map to the
/// end targets, and a value exactly on a breakpoint maps to that breakpoint's
/// target.
pub fn piecewise_linear_map(value: f64, mapping: &[(f64, f64)]) -> f64 {
    let [(first_from, first_to), .., (last_from, last_to)] = mapping else {
        return match mapping {
            [(_, only_to)] => *only_to,
            _ => value,
        };
    };
    if value <= *first_from {
        return *first_to;
    }
    if value >= *last_from {
        return *last_to;
    }
    let mut prev = (*first_from, *first_to);
    for &(from, to) in &mapping[1..] {
        if value < from {
            return prev.1 + (to - prev.1) * (value - prev.0) / (from - prev.0);
        }
        prev = (from, to);
    }
    *last_to
}

/// Normalize a design-space value into [-1, 1] against axis extremes.
///
/// When `extrapolate` is false the value is clamped to [minimum, maximum]
/// first; otherwise values beyond the extremes keep going linearly at the
/// slope of the nearer half.
pub fn normalize_value(
    value: DesignCoord,
    minimum: DesignCoord,
    default: DesignCoord,
    maximum: DesignCoord,
    extrapolate: bool,
) -> Result<NormalizedCoord> {
    let min = minimum.to_f64();
    let default = default.to_f64();
    let max = maximum.to_f64();
    if !(min <= default && default <= max) {
        return Err(Error::InvalidAxisBounds {
            minimum: min,
            default,
            maximum: max,
        });
    }
    let mut v = value.to_f64();
    if !extrapolate {
        v = v.clamp(min, max);
    }
    let normalized = if v == default || min == max {
        0.0
    } else if (v < default && min != default) || (v > default && max == default) {
        (v - default) / (default - min)
    } else {
        (v - default) / (max - default)
    };
    Ok(NormalizedCoord::new(normalized))
}

/// Normalize a design-space location, filling absent axes with the axis
/// default.
///
/// The result carries an entry for every axis, explicit zeros included;
/// consumers that need sparse locations call
/// [`sparsify`](NormalizedLocation::sparsify).
pub fn normalize_design_location(
    axes: &[Axis],
    location: &DesignLocation,
    extrapolate: bool,
) -> Result<NormalizedLocation> {
    axes.iter()
        .map(|axis| {
            let value = location
                .get(&axis.tag)
                .unwrap_or_else(|| axis.design_default());
            Ok((axis.tag.clone(), axis.normalize_design(value, extrapolate)?))
        })
        .collect()
}

/// Normalize a user-space location, filling absent axes with the axis default.
pub fn normalize_user_location(
    axes: &[Axis],
    location: &UserLocation,
    extrapolate: bool,
) -> Result<NormalizedLocation> {
    axes.iter()
        .map(|axis| {
            let value = location.get(&axis.tag).unwrap_or(axis.default);
            Ok((axis.tag.clone(), axis.normalize_user(value, extrapolate)?))
        })
        .collect()
}

/// Convert a user-space location to design space, axis by axis.
///
/// Only axes present in the input appear in the output.
pub fn userspace_to_designspace(axes: &[Axis], location: &UserLocation) -> DesignLocation {
    axes.iter()
        .filter_map(|axis| {
            location
                .get(&axis.tag)
                .map(|value| (axis.tag.clone(), axis.userspace_to_designspace(value)))
        })
        .collect()
}

/// Convert a design-space location back to user space, axis by axis.
pub fn designspace_to_userspace(axes: &[Axis], location: &DesignLocation) -> UserLocation {
    axes.iter()
        .filter_map(|axis| {
            location
                .get(&axis.tag)
                .map(|value| (axis.tag.clone(), axis.designspace_to_userspace(value)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(axis: &Axis, value: f64) -> f64 {
        axis.normalize_user(UserCoord::new(value), false)
            .unwrap()
            .to_f64()
    }

    #[test]
    fn piecewise_empty_table_is_identity() {
        assert_eq!(piecewise_linear_map(0.42, &[]), 0.42);
    }

    #[test]
    fn piecewise_clamps_to_end_targets() {
        let table = [(100.0, 0.0), (400.0, 0.5), (900.0, 1.0)];
        assert_eq!(piecewise_linear_map(50.0, &table), 0.0);
        assert_eq!(piecewise_linear_map(100.0, &table), 0.0);
        assert_eq!(piecewise_linear_map(900.0, &table), 1.0);
        assert_eq!(piecewise_linear_map(2000.0, &table), 1.0);
    }

    #[test]
    fn piecewise_breakpoint_maps_to_its_target() {
        let table = [(100.0, 0.0), (400.0, 0.5), (900.0, 1.0)];
        assert_eq!(piecewise_linear_map(400.0, &table), 0.5);
    }

    #[test]
    fn piecewise_interpolates_within_segment() {
        let table = [(100.0, 0.0), (400.0, 0.5), (900.0, 1.0)];
        assert_eq!(piecewise_linear_map(650.0, &table), 0.75);
        assert_eq!(piecewise_linear_map(250.0, &table), 0.25);
    }

    #[test]
    fn normalize_weight_axis() {
        let axis = Axis::new("wght", 100.0, 400.0, 900.0);
        assert_eq!(norm(&axis, 400.0), 0.0);
        assert_eq!(norm(&axis, 100.0), -1.0);
        assert_eq!(norm(&axis, 900.0), 1.0);
        assert_eq!(norm(&axis, 650.0), 0.5);
        // out-of-range values clamp
        assert_eq!(norm(&axis, 1000.0), 1.0);
        assert_eq!(norm(&axis, 0.0), -1.0);
    }

    #[test]
    fn normalize_axis_with_default_at_minimum() {
        let axis = Axis::new("opsz", 0.0, 0.0, 1000.0);
        assert_eq!(norm(&axis, 0.0), 0.0);
        assert_eq!(norm(&axis, -1.0), 0.0);
        assert_eq!(norm(&axis, 1000.0), 1.0);
        assert_eq!(norm(&axis, 500.0), 0.5);
    }

    #[test]
    fn normalize_axis_with_default_at_maximum() {
        let axis = Axis::new("wdth", 0.0, 1000.0, 1000.0);
        assert_eq!(norm(&axis, 0.0), -1.0);
        assert_eq!(norm(&axis, 500.0), -0.5);
        assert_eq!(norm(&axis, 1000.0), 0.0);
    }

    #[test]
    fn normalize_degenerate_axis() {
        let axis = Axis::new("ital", 1.0, 1.0, 1.0);
        assert_eq!(norm(&axis, 1.0), 0.0);
        assert_eq!(norm(&axis, 5.0), 0.0);
    }

    #[test]
    fn normalize_extrapolates_when_asked() {
        let axis = Axis::new("wght", 100.0, 400.0, 900.0);
        let above = axis
            .normalize_user(UserCoord::new(1150.0), true)
            .unwrap()
            .to_f64();
        assert_eq!(above, 1.5);
        let below = axis
            .normalize_user(UserCoord::new(-200.0), true)
            .unwrap()
            .to_f64();
        assert_eq!(below, -2.0);
    }

    #[test]
    fn normalize_rejects_unordered_bounds() {
        let result = normalize_value(
            DesignCoord::new(0.0),
            DesignCoord::new(2.0),
            DesignCoord::new(1.0),
            DesignCoord::new(3.0),
            false,
        );
        assert!(matches!(result, Err(Error::InvalidAxisBounds { .. })));
    }

    #[test]
    fn normalize_through_break_table() {
        let axis = Axis::new("wght", 100.0, 400.0, 900.0)
            .with_map(vec![(100.0, 0.0), (400.0, 0.5), (900.0, 1.0)]);
        // 650 user -> 0.75 design; design bounds are (0, 0.5, 1)
        assert_eq!(norm(&axis, 650.0), 0.5);
        assert_eq!(norm(&axis, 100.0), -1.0);
        assert_eq!(norm(&axis, 900.0), 1.0);
    }

    #[test]
    fn break_table_roundtrip() {
        let axis = Axis::new("wght", 100.0, 400.0, 900.0)
            .with_map(vec![(100.0, 0.0), (400.0, 0.5), (900.0, 1.0)]);
        let design = axis.userspace_to_designspace(UserCoord::new(650.0));
        assert_eq!(design, DesignCoord::new(0.75));
        assert_eq!(axis.designspace_to_userspace(design), UserCoord::new(650.0));
    }

    #[test]
    fn normalize_location_fills_axis_defaults() {
        let axes = vec![
            Axis::new("wght", 100.0, 400.0, 900.0),
            Axis::new("wdth", 50.0, 100.0, 200.0),
        ];
        let loc = DesignLocation::for_pos(&[("wght", 650.0)]);
        let normalized = normalize_design_location(&axes, &loc, false).unwrap();
        assert_eq!(
            normalized,
            NormalizedLocation::for_pos(&[("wght", 0.5), ("wdth", 0.0)])
        );
    }

    #[test]
    fn normalize_user_location_applies_mapping() {
        let axes = vec![
            Axis::new("wght", 100.0, 400.0, 900.0)
                .with_map(vec![(100.0, 0.0), (400.0, 0.5), (900.0, 1.0)]),
            Axis::new("ital", 0.0, 0.0, 1.0),
        ];
        let loc = UserLocation::for_pos(&[("wght", 650.0), ("ital", 1.0)]);
        let normalized = normalize_user_location(&axes, &loc, false).unwrap();
        assert_eq!(
            normalized,
            NormalizedLocation::for_pos(&[("wght", 0.5), ("ital", 1.0)])
        );
    }

    #[test]
    fn location_conversion_preserves_sparseness() {
        let axes = vec![
            Axis::new("wght", 100.0, 400.0, 900.0),
            Axis::new("wdth", 50.0, 100.0, 200.0),
        ];
        let design = userspace_to_designspace(&axes, &UserLocation::for_pos(&[("wght", 700.0)]));
        assert_eq!(design, DesignLocation::for_pos(&[("wght", 700.0)]));
        assert!(!design.contains("wdth"));
        let user = designspace_to_userspace(&axes, &design);
        assert_eq!(user, UserLocation::for_pos(&[("wght", 700.0)]));
    }
}
