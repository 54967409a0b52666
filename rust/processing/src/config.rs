// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Party wall detection tolerances.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default footprint buffer and wall offset tolerance (length units).
pub const DEFAULT_TOLERANCE: f64 = 0.15;

/// cos(15°): walls whose normals deviate more than this are not parallel.
pub const DEFAULT_NORMAL_ALIGNMENT_COS: f64 = 0.9659;

/// Contact pieces up to this area (square units) are treated as noise.
pub const DEFAULT_MIN_CONTACT_AREA: f64 = 5.0;

/// Tolerances for party wall detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyWallConfig {
    /// Outward buffer applied to ground footprints before the proximity test.
    pub ground_buffer: f64,
    /// Largest distance between two parallel walls still treated as touching.
    pub wall_offset_tolerance: f64,
    /// Walls are compared only when |n0 · n1| exceeds this value.
    pub normal_alignment_cos: f64,
    /// Contact pieces must be strictly larger than this area.
    pub min_contact_area: f64,
    /// Evaluate candidate pairs on the rayon thread pool.
    pub parallel: bool,
}

impl Default for PartyWallConfig {
    fn default() -> Self {
        Self {
            ground_buffer: DEFAULT_TOLERANCE,
            wall_offset_tolerance: DEFAULT_TOLERANCE,
            normal_alignment_cos: DEFAULT_NORMAL_ALIGNMENT_COS,
            min_contact_area: DEFAULT_MIN_CONTACT_AREA,
            parallel: true,
        }
    }
}

impl PartyWallConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparsable variables keep their default value.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ground_buffer: env_or("CITYMODEL_GROUND_BUFFER", defaults.ground_buffer),
            wall_offset_tolerance: env_or("CITYMODEL_WALL_OFFSET", defaults.wall_offset_tolerance),
            normal_alignment_cos: env_or("CITYMODEL_NORMAL_COS", defaults.normal_alignment_cos),
            min_contact_area: env_or("CITYMODEL_MIN_CONTACT_AREA", defaults.min_contact_area),
            parallel: env_or("CITYMODEL_PARALLEL", defaults.parallel),
        }
    }

    /// Rejects negative tolerances and alignment thresholds outside (0, 1].
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("ground_buffer", self.ground_buffer),
            ("wall_offset_tolerance", self.wall_offset_tolerance),
            ("min_contact_area", self.min_contact_area),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if !(self.normal_alignment_cos > 0.0 && self.normal_alignment_cos <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "normal_alignment_cos must be in (0, 1], got {}",
                self.normal_alignment_cos
            )));
        }
        Ok(())
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
