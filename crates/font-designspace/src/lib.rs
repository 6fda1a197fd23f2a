//! # Designspace primitives
//!
//! Coordinate spaces, variation axes, and the conversions between them.
//!
//! User, design, and normalized coordinates are distinct types, so a value
//! from one space cannot be passed where another is expected. Axes carry
//! their extremes in user space plus an optional piecewise-linear
//! user-to-design break table, and normalization folds everything into the
//! [-1, 1] range that variation math runs on.
//!
//! ## Example
//!
//! ```
//! use font_designspace::{normalize_user_location, Axis, UserLocation};
//!
//! let axes = vec![
//!     Axis::new("wght", 100.0, 400.0, 900.0).with_name("Weight"),
//!     Axis::new("ital", 0.0, 0.0, 1.0).with_name("Italic"),
//! ];
//!
//! let location = UserLocation::for_pos(&[("wght", 650.0)]);
//! let normalized = normalize_user_location(&axes, &location, false)?;
//! assert_eq!(normalized.get("wght").unwrap().to_f64(), 0.5);
//! # Ok::<(), font_designspace::Error>(())
//! ```

mod axis;
mod coords;
mod error;

pub use axis::{
    designspace_to_userspace, normalize_design_location, normalize_user_location, normalize_value,
    piecewise_linear_map, userspace_to_designspace, Axis,
};
pub use coords::{
    DesignCoord, DesignLocation, Location, NormalizedCoord, NormalizedLocation, UserCoord,
    UserLocation,
};
pub use error::{Error, Result};
