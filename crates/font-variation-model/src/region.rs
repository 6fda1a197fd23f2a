//! Support regions: where in normalized space a master has influence.

use std::collections::BTreeMap;
use std::fmt;

use font_designspace::{NormalizedCoord, NormalizedLocation};

/// One axis of a support region.
///
/// Influence rises linearly from 0 at `lower` to 1 at `peak`, then falls
/// back to 0 at `upper`; lower <= peak <= upper.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tent {
    pub lower: NormalizedCoord,
    pub peak: NormalizedCoord,
    pub upper: NormalizedCoord,
}

impl Tent {
    pub fn new(lower: NormalizedCoord, peak: NormalizedCoord, upper: NormalizedCoord) -> Self {
        Self { lower, peak, upper }
    }
}

impl From<(f64, f64, f64)> for Tent {
    fn from((lower, peak, upper): (f64, f64, f64)) -> Self {
        Tent::new(
            NormalizedCoord::new(lower),
            NormalizedCoord::new(peak),
            NormalizedCoord::new(upper),
        )
    }
}

impl fmt::Debug for Tent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?}, {:?})", self.lower, self.peak, self.upper)
    }
}

/// The box-shaped region of normalized space over which a master contributes.
///
/// A sparse map from axis tag to [`Tent`]; axes not present are
/// unconstrained. The empty region, the default master's, scales everything
/// by 1.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct VariationRegion {
    axis_tents: BTreeMap<String, Tent>,
}

impl VariationRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a region from (tag, (lower, peak, upper)) triples.
    pub fn for_tents(tents: &[(&str, (f64, f64, f64))]) -> Self {
        let mut region = Self::new();
        for (tag, triple) in tents {
            region.insert(*tag, Tent::from(*triple));
        }
        region
    }

    pub fn insert(&mut self, tag: impl Into<String>, tent: Tent) {
        self.axis_tents.insert(tag.into(), tent);
    }

    pub fn get(&self, tag: &str) -> Option<Tent> {
        self.axis_tents.get(tag).copied()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.axis_tents.contains_key(tag)
    }

    /// Entries in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Tent)> + '_ {
        self.axis_tents.iter().map(|(tag, tent)| (tag.as_str(), *tent))
    }

    pub fn axis_tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.axis_tents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.axis_tents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axis_tents.is_empty()
    }

    /// The blend weight this region assigns to `location`, in [0, 1].
    ///
    /// Axes absent from the location read as 0. A tent is inert when its
    /// peak sits on the default, when its triple is out of order, or when it
    /// straddles the default; the OpenType variation store cannot express
    /// attenuation for any of those.
    pub fn scalar_at(&self, location: &NormalizedLocation) -> f64 {
        let mut scalar = 1.0;
        for (tag, tent) in self.iter() {
            let lower = tent.lower.to_f64();
            let peak = tent.peak.to_f64();
            let upper = tent.upper.to_f64();

            if peak == 0.0 {
                continue;
            }
            if lower > peak || peak > upper {
                continue;
            }
            if lower < 0.0 && upper > 0.0 {
                continue;
            }

            let v = location.get(tag).map_or(0.0, NormalizedCoord::to_f64);
            if v == peak {
                continue;
            }
            if v <= lower || v >= upper {
                return 0.0;
            }
            if v < peak {
                scalar *= (v - lower) / (peak - lower);
            } else {
                scalar *= (v - upper) / (peak - upper);
            }
        }
        scalar
    }
}

impl fmt::Debug for VariationRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.axis_tents.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_region_is_everywhere() {
        let region = VariationRegion::new();
        assert_eq!(region.scalar_at(&NormalizedLocation::new()), 1.0);
        assert_eq!(
            region.scalar_at(&NormalizedLocation::for_pos(&[("wght", 0.2)])),
            1.0
        );
    }

    #[test]
    fn scalar_rises_toward_peak() {
        let region = VariationRegion::for_tents(&[("wght", (0.0, 2.0, 3.0))]);
        let loc = NormalizedLocation::for_pos(&[("wght", 0.2)]);
        assert_eq!(region.scalar_at(&loc), 0.1);
    }

    #[test]
    fn scalar_falls_past_peak() {
        let region = VariationRegion::for_tents(&[("wght", (0.0, 2.0, 4.0))]);
        let loc = NormalizedLocation::for_pos(&[("wght", 2.5)]);
        assert_eq!(region.scalar_at(&loc), 0.75);
    }

    #[test]
    fn scalar_zero_outside_the_box() {
        let region = VariationRegion::for_tents(&[("wght", (0.0, 2.0, 2.0))]);
        let loc = NormalizedLocation::for_pos(&[("wght", 3.0)]);
        assert_eq!(region.scalar_at(&loc), 0.0);

        let region = VariationRegion::for_tents(&[("wght", (0.0, 1.0, 1.0))]);
        let loc = NormalizedLocation::for_pos(&[("wght", -0.5)]);
        assert_eq!(region.scalar_at(&loc), 0.0);
    }

    #[test]
    fn scalar_exactly_one_at_peak() {
        let region = VariationRegion::for_tents(&[("wght", (0.0, 1.0, 1.0))]);
        let loc = NormalizedLocation::for_pos(&[("wght", 1.0), ("wdth", 1.0)]);
        assert_eq!(region.scalar_at(&loc), 1.0);
    }

    #[test]
    fn peak_on_default_is_inert() {
        let region =
            VariationRegion::for_tents(&[("wght", (0.0, 2.0, 4.0)), ("wdth", (-1.0, 0.0, 1.0))]);
        let loc = NormalizedLocation::for_pos(&[("wght", 2.5), ("wdth", 0.0)]);
        assert_eq!(region.scalar_at(&loc), 0.75);
    }

    #[test]
    fn out_of_order_tent_is_inert() {
        let region = VariationRegion::for_tents(&[("wght", (0.5, 0.2, 1.0))]);
        let loc = NormalizedLocation::for_pos(&[("wght", 0.9)]);
        assert_eq!(region.scalar_at(&loc), 1.0);
    }

    #[test]
    fn straddling_tent_is_inert() {
        let region = VariationRegion::for_tents(&[("wght", (-1.0, 0.5, 1.0))]);
        let loc = NormalizedLocation::for_pos(&[("wght", -0.9)]);
        assert_eq!(region.scalar_at(&loc), 1.0);
    }

    #[test]
    fn absent_axis_reads_as_default() {
        let region = VariationRegion::for_tents(&[("wght", (0.0, 1.0, 1.0))]);
        assert_eq!(region.scalar_at(&NormalizedLocation::new()), 0.0);
    }
}
