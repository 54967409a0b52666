// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CityModel Processing
//!
//! Party wall detection for 3D city models: finds the wall areas that
//! neighbouring buildings and building parts share.
//!
//! ## Pipeline
//!
//! 1. **Prefilter** ([`GroundFootprints`]): buffered ground footprints must
//!    touch before any walls are compared
//! 2. **Resolver** ([`resolve_party_walls`]): parallel walls at the same
//!    offset are intersected in their common plane
//! 3. **Orchestration** ([`PartyWallDetector`]): pairs every building and
//!    part once, optionally on the rayon thread pool
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use citymodel_processing::{detect_party_walls, PartyWallConfig};
//!
//! let report = detect_party_walls(&dataset, &PartyWallConfig::default())?;
//! for record in &report.records {
//!     println!("{} | {}: {:.1} m²", record.building_a, record.building_b, record.area);
//! }
//! report.apply(&mut dataset)?;
//! ```

pub mod config;
pub mod detector;
pub mod error;
pub mod prefilter;
pub mod record;
pub mod resolver;

pub use config::{
    PartyWallConfig, DEFAULT_MIN_CONTACT_AREA, DEFAULT_NORMAL_ALIGNMENT_COS, DEFAULT_TOLERANCE,
};
pub use detector::{detect_party_walls, DetectionStats, PartyWallDetector, PartyWallReport};
pub use error::{Error, Result};
pub use prefilter::GroundFootprints;
pub use record::PartyWallRecord;
pub use resolver::{normals_aligned, resolve_party_walls, Resolution};
