// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CityModel Core
//!
//! In-memory semantic model of 3D city buildings as exchanged in
//! CityGML/CityJSON.
//!
//! ## Overview
//!
//! - **Surfaces**: planar boundary rings with derived normal, area, tilt and
//!   orientation ([`Surface`])
//! - **Buildings**: buildings and building parts with their walls, roofs,
//!   grounds and closures ([`Building`], [`BuildingPart`], [`BuildingLike`])
//! - **Datasets**: ordered building collections ([`Dataset`])
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use citymodel_core::{Building, Dataset, Surface, SurfaceConfig};
//!
//! let config = SurfaceConfig::default();
//! let mut building = Building::new("DEBW_0001");
//! building.add_surface(Surface::from_flat("wall_1", &pos_list, None, &config)?)?;
//!
//! let mut dataset = Dataset::new(Some("district".into()));
//! dataset.add_building(building, false)?;
//! ```

pub mod building;
pub mod config;
pub mod dataset;
pub mod error;
pub mod surface;

pub use building::{
    BoundarySurfaces, Building, BuildingAttributes, BuildingLike, BuildingPart, WallCounts,
};
pub use config::{SurfaceConfig, DEFAULT_COLLINEAR_TOLERANCE};
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use surface::{Orientation, Surface, SurfaceKind};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
