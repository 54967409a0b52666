// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CityModel Geometry Processing
//!
//! Plane rotations, 2D polygon clipping (i_overlay) and footprint buffering
//! (geo) used to compare building surfaces with each other.

pub mod bool2d;
pub mod error;
pub mod footprint;
pub mod rotation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use bool2d::{intersect_2d, Piece2D, Pieces};
pub use error::{Error, Result};
pub use footprint::{BufferedFootprint, Footprint};
pub use rotation::{rotate_about_z, working_plane_angle, WorkingPlane};
