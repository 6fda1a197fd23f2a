//! The variation model proper: canonical master ordering, support
//! derivation, and delta arithmetic.

use std::collections::{HashMap, HashSet};
use std::ops::Deref;
use std::sync::{Arc, Mutex};

use font_designspace::{NormalizedCoord, NormalizedLocation};
use log::{debug, trace};

use crate::error::{Error, Result};
use crate::region::{Tent, VariationRegion};
use crate::sort::MasterOrdering;

/// How [`VariationModel::deltas_with_rounding`] rounds each delta.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rounding {
    /// Keep full-precision deltas.
    #[default]
    None,
    /// Round half-way cases to the nearest even integer.
    TiesEven,
}

impl Rounding {
    fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::None => value,
            Rounding::TiesEven => value.round_ties_even(),
        }
    }
}

/// A model of how a set of masters subdivides variation space.
///
/// Given master locations in normalized space, the model derives a canonical
/// master ordering, a support region per master, and the triangular weight
/// matrix that turns per-master values into additive deltas. Interpolating
/// the deltas at any location reproduces each master's value exactly at that
/// master's own location.
///
/// The model is immutable after construction; all read operations take
/// `&self` and may run concurrently. Only the submodel cache mutates, behind
/// its own lock.
#[derive(Debug)]
pub struct VariationModel {
    original_locations: Vec<NormalizedLocation>,
    axis_order: Vec<String>,
    /// Sparsified master locations in canonical order; index 0 is the
    /// default when one was supplied.
    locations: Vec<NormalizedLocation>,
    /// Original index -> canonical index.
    mapping: Vec<usize>,
    /// Canonical index -> original index.
    reverse_mapping: Vec<usize>,
    supports: Vec<VariationRegion>,
    /// Row i holds (j, weight) pairs with j < i and weight != 0: how much of
    /// master j's delta is already present at master i's location.
    delta_weights: Vec<Vec<(usize, f64)>>,
    sub_models: Mutex<HashMap<Vec<usize>, Arc<VariationModel>>>,
}

impl VariationModel {
    /// Build a model over the given master locations.
    ///
    /// `axis_order` is the caller's preferred axis ordering, consumed as a
    /// sort tie-breaker; axes not listed sort after listed ones,
    /// alphabetically.
    ///
    /// # Errors
    ///
    /// - [`Error::CoordinateOutOfRange`] if any coordinate is outside [-1, 1]
    /// - [`Error::DuplicateMaster`] if two locations are equal once explicit
    ///   zeros are dropped
    pub fn new(locations: Vec<NormalizedLocation>, axis_order: Vec<String>) -> Result<Self> {
        for location in &locations {
            for (tag, pos) in location.iter() {
                let value = pos.to_f64();
                if !(-1.0..=1.0).contains(&value) {
                    return Err(Error::CoordinateOutOfRange {
                        tag: tag.to_string(),
                        value,
                    });
                }
            }
        }

        let sparse: Vec<NormalizedLocation> =
            locations.iter().map(NormalizedLocation::sparsify).collect();
        let mut seen = HashSet::new();
        for location in &sparse {
            if !seen.insert(location.clone()) {
                return Err(Error::DuplicateMaster {
                    location: location.clone(),
                });
            }
        }

        let mut sorted = sparse.clone();
        {
            let ordering = MasterOrdering::new(&sparse, &axis_order);
            sorted.sort_by_cached_key(|location| ordering.key_for(location));
        }

        let index_of: HashMap<&NormalizedLocation, usize> = sorted
            .iter()
            .enumerate()
            .map(|(idx, location)| (location, idx))
            .collect();
        let mapping: Vec<usize> = sparse.iter().map(|location| index_of[location]).collect();
        let mut reverse_mapping = vec![0usize; mapping.len()];
        for (original, canonical) in mapping.iter().enumerate() {
            reverse_mapping[*canonical] = original;
        }

        let supports = master_supports(&sorted);
        let delta_weights = delta_weights(&sorted, &supports);

        if log::log_enabled!(log::Level::Trace) {
            for (location, support) in sorted.iter().zip(&supports) {
                trace!("master {location:?} support {support:?}");
            }
        }
        debug!(
            "variation model over {} masters, {} ordered axes",
            sorted.len(),
            axis_order.len()
        );

        Ok(Self {
            original_locations: locations,
            axis_order,
            locations: sorted,
            mapping,
            reverse_mapping,
            supports,
            delta_weights,
            sub_models: Mutex::new(HashMap::new()),
        })
    }

    /// Number of masters.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Master locations in canonical order, sparsified.
    pub fn locations(&self) -> &[NormalizedLocation] {
        &self.locations
    }

    /// Master locations exactly as given to the constructor.
    pub fn original_locations(&self) -> &[NormalizedLocation] {
        &self.original_locations
    }

    pub fn axis_order(&self) -> &[String] {
        &self.axis_order
    }

    /// Support regions, one per master in canonical order.
    pub fn supports(&self) -> &[VariationRegion] {
        &self.supports
    }

    /// Original index -> canonical index.
    pub fn mapping(&self) -> &[usize] {
        &self.mapping
    }

    /// Canonical index -> original index.
    pub fn reverse_mapping(&self) -> &[usize] {
        &self.reverse_mapping
    }

    /// Per-master delta weight rows, canonical order.
    pub fn delta_weights(&self) -> &[Vec<(usize, f64)>] {
        &self.delta_weights
    }

    /// Where the default master sits in the caller's original order, if a
    /// master at the default location was supplied.
    pub fn default_master_index(&self) -> Option<usize> {
        self.locations
            .first()
            .filter(|location| location.is_empty())
            .map(|_| self.reverse_mapping[0])
    }

    /// Convert per-master values (original order) into per-master deltas
    /// (canonical order).
    ///
    /// Blending the deltas with [`scalars`](Self::scalars) at any location
    /// reproduces each master's value at its own location.
    pub fn deltas(&self, master_values: &[f64]) -> Result<Vec<f64>> {
        self.deltas_with_rounding(master_values, Rounding::None)
    }

    /// Like [`deltas`](Self::deltas), rounding each delta as it is produced.
    ///
    /// Deltas headed for an integer variation store should be rounded here
    /// rather than after the fact: rounding inside the accumulation keeps
    /// the error at any location within half a unit even where many master
    /// supports overlap.
    pub fn deltas_with_rounding(
        &self,
        master_values: &[f64],
        rounding: Rounding,
    ) -> Result<Vec<f64>> {
        if master_values.len() != self.len() {
            return Err(Error::LengthMismatch {
                expected: self.len(),
                actual: master_values.len(),
            });
        }
        let mut out: Vec<f64> = Vec::with_capacity(self.len());
        for (i, weights) in self.delta_weights.iter().enumerate() {
            let mut delta = master_values[self.reverse_mapping[i]];
            for (j, weight) in weights {
                delta -= out[*j] * weight;
            }
            out.push(rounding.apply(delta));
        }
        Ok(out)
    }

    /// The support scalar of every master (canonical order) at `location`.
    pub fn scalars(&self, location: &NormalizedLocation) -> Vec<f64> {
        self.supports
            .iter()
            .map(|support| support.scalar_at(location))
            .collect()
    }

    /// Coefficients such that the value at `location` is their dot product
    /// with the caller's master values, in original order.
    pub fn master_scalars(&self, location: &NormalizedLocation) -> Vec<f64> {
        let mut out = self.scalars(location);
        for i in (0..out.len()).rev() {
            let scalar = out[i];
            for (j, weight) in &self.delta_weights[i] {
                out[*j] -= scalar * weight;
            }
        }
        self.mapping.iter().map(|canonical| out[*canonical]).collect()
    }

    /// Dot product of values and scalars, skipping zero scalars.
    ///
    /// Returns `Ok(None)` when no term contributed, which is not the same
    /// thing as a sum of 0; a caller typically renders `None` as the default
    /// value. -0.0 counts as zero.
    pub fn interpolate_from_values_and_scalars(
        values: &[f64],
        scalars: &[f64],
    ) -> Result<Option<f64>> {
        if values.len() != scalars.len() {
            return Err(Error::LengthMismatch {
                expected: values.len(),
                actual: scalars.len(),
            });
        }
        let mut result = None;
        for (value, scalar) in values.iter().zip(scalars) {
            if *scalar == 0.0 {
                continue;
            }
            result = Some(result.unwrap_or(0.0) + value * scalar);
        }
        Ok(result)
    }

    /// Blend deltas (canonical order, from [`deltas`](Self::deltas)) at
    /// `location`.
    pub fn interpolate_from_deltas(
        &self,
        location: &NormalizedLocation,
        deltas: &[f64],
    ) -> Result<Option<f64>> {
        if deltas.len() != self.len() {
            return Err(Error::LengthMismatch {
                expected: self.len(),
                actual: deltas.len(),
            });
        }
        Self::interpolate_from_values_and_scalars(deltas, &self.scalars(location))
    }

    /// Interpolate the caller's master values (original order) at `location`.
    pub fn interpolate_from_masters(
        &self,
        location: &NormalizedLocation,
        master_values: &[f64],
    ) -> Result<Option<f64>> {
        if master_values.len() != self.len() {
            return Err(Error::LengthMismatch {
                expected: self.len(),
                actual: master_values.len(),
            });
        }
        Self::interpolate_from_values_and_scalars(master_values, &self.master_scalars(location))
    }

    /// Blend master values with scalars previously obtained from
    /// [`scalars`](Self::scalars).
    ///
    /// The scalars here weight *deltas*, so the deltas are computed first.
    /// To weight master values directly, pair
    /// [`master_scalars`](Self::master_scalars) with
    /// [`interpolate_from_values_and_scalars`](Self::interpolate_from_values_and_scalars)
    /// instead.
    pub fn interpolate_from_masters_and_scalars(
        &self,
        master_values: &[f64],
        scalars: &[f64],
    ) -> Result<Option<f64>> {
        let deltas = self.deltas(master_values)?;
        Self::interpolate_from_values_and_scalars(&deltas, scalars)
    }

    /// Restrict the model to the masters a value is present for.
    ///
    /// `items` is one entry per original master, `None` marking masters the
    /// caller has no value for. When nothing is missing the receiver itself
    /// is returned along with the values. Otherwise a model over the present
    /// locations is built with an empty axis order and cached; calls with
    /// the same set of present indices observe the same instance.
    pub fn sub_model(&self, items: &[Option<f64>]) -> Result<(SubModel<'_>, Vec<f64>)> {
        if items.len() != self.len() {
            return Err(Error::LengthMismatch {
                expected: self.len(),
                actual: items.len(),
            });
        }
        let present: Vec<f64> = items.iter().flatten().copied().collect();
        if present.len() == items.len() {
            return Ok((SubModel::Whole(self), present));
        }
        let key: Vec<usize> = items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| item.map(|_| idx))
            .collect();
        let mut cache = self.sub_models.lock().expect("submodel cache poisoned");
        let model = match cache.get(&key) {
            Some(model) => Arc::clone(model),
            None => {
                trace!("building sub-model over masters {key:?}");
                let sub_locations = key
                    .iter()
                    .map(|idx| self.original_locations[*idx].clone())
                    .collect();
                let model = Arc::new(VariationModel::new(sub_locations, Vec::new())?);
                cache.insert(key, Arc::clone(&model));
                model
            }
        };
        Ok((SubModel::Restricted(model), present))
    }
}

/// A view of a model restricted to the masters a caller has values for.
///
/// Dereferences to [`VariationModel`]: either the whole model borrowed, or a
/// shared cached restriction.
#[derive(Debug, Clone)]
pub enum SubModel<'a> {
    Whole(&'a VariationModel),
    Restricted(Arc<VariationModel>),
}

impl Deref for SubModel<'_> {
    type Target = VariationModel;

    fn deref(&self) -> &VariationModel {
        match self {
            SubModel::Whole(model) => model,
            SubModel::Restricted(model) => model,
        }
    }
}

/// Derive a support region per master: an initial box from each master's own
/// coordinates, then a refinement pass that shrinks boxes so earlier masters
/// stop influencing later ones where they should not.
fn master_supports(locations: &[NormalizedLocation]) -> Vec<VariationRegion> {
    // Per-axis extremes across all masters.
    let mut extremes: HashMap<&str, (f64, f64)> = HashMap::new();
    for location in locations {
        for (tag, pos) in location.iter() {
            let value = pos.to_f64();
            let (min, max) = extremes.entry(tag).or_insert((value, value));
            *min = min.min(value);
            *max = max.max(value);
        }
    }

    let mut supports: Vec<VariationRegion> = Vec::with_capacity(locations.len());
    for location in locations {
        let mut region = VariationRegion::new();
        for (tag, pos) in location.iter() {
            let value = pos.to_f64();
            let (min, max) = extremes[tag];
            let tent = if value > 0.0 {
                Tent::new(NormalizedCoord::new(0.0), pos, NormalizedCoord::new(max))
            } else {
                Tent::new(NormalizedCoord::new(min), pos, NormalizedCoord::new(0.0))
            };
            region.insert(tag, tent);
        }

        for prev in &supports {
            // Masters with extra axes do not participate.
            if !prev.axis_tags().all(|tag| region.contains(tag)) {
                continue;
            }
            // Nor do masters outside the current box.
            let relevant = region.iter().all(|(tag, tent)| {
                prev.get(tag).is_some_and(|prev_tent| {
                    prev_tent.peak == tent.peak
                        || (tent.lower < prev_tent.peak && prev_tent.peak < tent.upper)
                })
            });
            if !relevant {
                continue;
            }

            // Split the box along the axis where the cut removes the largest
            // share; on an exact tie, cut across all tied axes.
            let mut best_ratio = -1.0f64;
            let mut cuts: Vec<(String, Tent)> = Vec::new();
            for (tag, prev_tent) in prev.iter() {
                let Some(tent) = region.get(tag) else {
                    continue;
                };
                let cut_at = prev_tent.peak.to_f64();
                let lower = tent.lower.to_f64();
                let peak = tent.peak.to_f64();
                let upper = tent.upper.to_f64();
                let (ratio, cut) = if cut_at < peak {
                    (
                        (cut_at - peak) / (lower - peak),
                        Tent::new(prev_tent.peak, tent.peak, tent.upper),
                    )
                } else if cut_at > peak {
                    (
                        (cut_at - peak) / (upper - peak),
                        Tent::new(tent.lower, tent.peak, prev_tent.peak),
                    )
                } else {
                    continue;
                };
                if ratio > best_ratio {
                    cuts.clear();
                    best_ratio = ratio;
                }
                if ratio == best_ratio {
                    cuts.push((tag.to_string(), cut));
                }
            }
            for (tag, tent) in cuts {
                region.insert(tag, tent);
            }
        }
        supports.push(region);
    }
    supports
}

/// The triangular delta-weight matrix: row i holds, for each earlier master
/// j, the scalar of j's support at master i's location (nonzero entries
/// only).
fn delta_weights(
    locations: &[NormalizedLocation],
    supports: &[VariationRegion],
) -> Vec<Vec<(usize, f64)>> {
    locations
        .iter()
        .enumerate()
        .map(|(i, location)| {
            supports[..i]
                .iter()
                .enumerate()
                .filter_map(|(j, support)| {
                    let scalar = support.scalar_at(location);
                    (scalar != 0.0).then_some((j, scalar))
                })
                .collect()
        })
        .collect()
}
