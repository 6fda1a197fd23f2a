//! Canonical ordering of master locations.
//!
//! Masters are sorted so that each one can only be influenced by masters
//! before it: the default first, then masters sitting directly on an axis,
//! then corners and fixups. Remaining ties break on the caller's preferred
//! axis order, then tag names, then coordinate signs and magnitudes, which
//! keeps the ordering deterministic for any input.

use std::collections::{HashMap, HashSet};

use font_designspace::{NormalizedCoord, NormalizedLocation};
use ordered_float::OrderedFloat;

/// Sort index assigned to axes the caller gave no order for.
const UNORDERED_AXIS_INDEX: usize = 0x10000;

/// Precomputed context for sorting one family of master locations.
pub(crate) struct MasterOrdering<'a> {
    axis_order: &'a [String],
    /// Per axis, the values at which some master sits directly on that axis
    /// (plus the default).
    axis_points: HashMap<String, HashSet<NormalizedCoord>>,
}

impl<'a> MasterOrdering<'a> {
    /// `locations` must already be sparsified.
    pub(crate) fn new(locations: &[NormalizedLocation], axis_order: &'a [String]) -> Self {
        let mut axis_points: HashMap<String, HashSet<NormalizedCoord>> = HashMap::new();
        for location in locations {
            if location.len() != 1 {
                continue;
            }
            let Some((tag, pos)) = location.iter().next() else {
                continue;
            };
            axis_points
                .entry(tag.to_string())
                .or_insert_with(|| HashSet::from([NormalizedCoord::new(0.0)]))
                .insert(pos);
        }
        Self {
            axis_order,
            axis_points,
        }
    }

    pub(crate) fn key_for(&self, location: &NormalizedLocation) -> MasterSortKey {
        let mut on_point = 0i32;
        for (tag, pos) in location.iter() {
            if self
                .axis_points
                .get(tag)
                .is_some_and(|points| points.contains(&pos))
            {
                on_point += 1;
            }
        }

        // Axes the caller ordered come first, in that order; the rest follow
        // alphabetically (the map already iterates in tag order).
        let mut ordered_axes: Vec<String> = self
            .axis_order
            .iter()
            .filter(|tag| location.contains(tag))
            .cloned()
            .collect();
        ordered_axes.extend(
            location
                .axis_tags()
                .filter(|tag| !self.axis_order.iter().any(|o| o.as_str() == *tag))
                .map(str::to_string),
        );

        let axis_indices = ordered_axes
            .iter()
            .map(|tag| {
                self.axis_order
                    .iter()
                    .position(|o| o == tag)
                    .unwrap_or(UNORDERED_AXIS_INDEX)
            })
            .collect();

        let signs = ordered_axes
            .iter()
            .map(|tag| {
                let pos = location.get(tag).map_or(0.0, NormalizedCoord::to_f64);
                if pos > 0.0 {
                    1
                } else if pos < 0.0 {
                    -1
                } else {
                    0
                }
            })
            .collect();

        let magnitudes = ordered_axes
            .iter()
            .map(|tag| {
                OrderedFloat(
                    location
                        .get(tag)
                        .map_or(0.0, NormalizedCoord::to_f64)
                        .abs(),
                )
            })
            .collect();

        MasterSortKey {
            rank: location.len(),
            on_point_score: -on_point,
            axis_indices,
            ordered_axes,
            signs,
            magnitudes,
        }
    }
}

/// Lexicographic sort key for one master location.
///
/// Field order is the comparison order; shorter vectors win prefix ties.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct MasterSortKey {
    /// Number of non-default axes.
    rank: usize,
    /// Negated count of axes sitting on a single-axis master's value, so
    /// more on-point axes sort earlier.
    on_point_score: i32,
    axis_indices: Vec<usize>,
    ordered_axes: Vec<String>,
    signs: Vec<i8>,
    magnitudes: Vec<OrderedFloat<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(locations: &[NormalizedLocation], axis_order: &[&str]) -> Vec<NormalizedLocation> {
        let axis_order: Vec<String> = axis_order.iter().map(|tag| tag.to_string()).collect();
        let sparse: Vec<NormalizedLocation> =
            locations.iter().map(NormalizedLocation::sparsify).collect();
        let ordering = MasterOrdering::new(&sparse, &axis_order);
        let mut out = sparse;
        out.sort_by_cached_key(|location| ordering.key_for(location));
        out
    }

    #[test]
    fn default_master_sorts_first() {
        let out = sorted(
            &[
                NormalizedLocation::for_pos(&[("wght", 1.0)]),
                NormalizedLocation::for_pos(&[("wght", 0.0)]),
                NormalizedLocation::for_pos(&[("wght", -1.0)]),
            ],
            &["wght"],
        );
        assert!(out[0].is_empty());
    }

    #[test]
    fn on_axis_masters_sort_before_corners() {
        let out = sorted(
            &[
                NormalizedLocation::for_pos(&[("wght", 1.0), ("wdth", 1.0)]),
                NormalizedLocation::for_pos(&[("wght", 1.0)]),
                NormalizedLocation::new(),
                NormalizedLocation::for_pos(&[("wdth", 1.0)]),
            ],
            &["wght", "wdth"],
        );
        assert_eq!(
            out,
            vec![
                NormalizedLocation::new(),
                NormalizedLocation::for_pos(&[("wght", 1.0)]),
                NormalizedLocation::for_pos(&[("wdth", 1.0)]),
                NormalizedLocation::for_pos(&[("wght", 1.0), ("wdth", 1.0)]),
            ]
        );
    }

    #[test]
    fn unlisted_axes_sort_after_listed_ones() {
        let out = sorted(
            &[
                NormalizedLocation::for_pos(&[("wdth", 1.0)]),
                NormalizedLocation::for_pos(&[("wght", 1.0)]),
                NormalizedLocation::new(),
            ],
            &["wght"],
        );
        assert_eq!(
            out,
            vec![
                NormalizedLocation::new(),
                NormalizedLocation::for_pos(&[("wght", 1.0)]),
                NormalizedLocation::for_pos(&[("wdth", 1.0)]),
            ]
        );
    }

    #[test]
    fn negative_side_sorts_before_positive() {
        let out = sorted(
            &[
                NormalizedLocation::for_pos(&[("wght", 1.0)]),
                NormalizedLocation::for_pos(&[("wght", -1.0)]),
                NormalizedLocation::for_pos(&[("wght", -0.55)]),
                NormalizedLocation::for_pos(&[("wght", 0.55)]),
                NormalizedLocation::new(),
            ],
            &["wght"],
        );
        assert_eq!(
            out,
            vec![
                NormalizedLocation::new(),
                NormalizedLocation::for_pos(&[("wght", -0.55)]),
                NormalizedLocation::for_pos(&[("wght", -1.0)]),
                NormalizedLocation::for_pos(&[("wght", 0.55)]),
                NormalizedLocation::for_pos(&[("wght", 1.0)]),
            ]
        );
    }

    #[test]
    fn more_on_point_axes_sort_earlier() {
        // (1, 1) sits on both axis points; (0.66, 1) only on wdth.
        let out = sorted(
            &[
                NormalizedLocation::for_pos(&[("wght", 0.66), ("wdth", 1.0)]),
                NormalizedLocation::for_pos(&[("wght", 1.0), ("wdth", 1.0)]),
                NormalizedLocation::for_pos(&[("wght", 1.0)]),
                NormalizedLocation::for_pos(&[("wdth", 1.0)]),
                NormalizedLocation::new(),
            ],
            &["wght"],
        );
        assert_eq!(
            out[3],
            NormalizedLocation::for_pos(&[("wght", 1.0), ("wdth", 1.0)])
        );
        assert_eq!(
            out[4],
            NormalizedLocation::for_pos(&[("wght", 0.66), ("wdth", 1.0)])
        );
    }
}
