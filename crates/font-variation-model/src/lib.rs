//! # Variation model
//!
//! Interpolate values across the masters of a variable design space.
//!
//! This crate implements the model behind OpenType variation stores: given a
//! set of master designs at known locations in normalized axis space, it
//! derives a canonical master ordering, a box-shaped support region per
//! master, and the delta decomposition that lets any location be rendered as
//! a weighted sum of master contributions. Interpolation agrees with every
//! master at that master's own location.
//!
//! ## Example
//!
//! ```
//! use font_variation_model::{NormalizedLocation, VariationModel};
//!
//! let masters = vec![
//!     NormalizedLocation::new(),
//!     NormalizedLocation::for_pos(&[("wght", 1.0)]),
//! ];
//! let model = VariationModel::new(masters, vec!["wght".to_string()])?;
//!
//! let thin_to_bold = [10.0, 20.0];
//! let location = NormalizedLocation::for_pos(&[("wght", 0.5)]);
//! assert_eq!(
//!     model.interpolate_from_masters(&location, &thin_to_bold)?,
//!     Some(15.0)
//! );
//! # Ok::<(), font_variation_model::Error>(())
//! ```

mod error;
mod model;
mod region;
mod sort;

pub use error::{Error, Result};
pub use model::{Rounding, SubModel, VariationModel};
pub use region::{Tent, VariationRegion};

pub use font_designspace::{NormalizedCoord, NormalizedLocation};
