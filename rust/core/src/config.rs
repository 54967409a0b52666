// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Surface construction settings.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default distance below which an intermediate ring point is treated as
/// lying on the line through its neighbours.
pub const DEFAULT_COLLINEAR_TOLERANCE: f64 = 0.01;

/// Settings applied when a [`crate::Surface`] derives its attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SurfaceConfig {
    /// Point-to-segment distance (length units) used by the collinearity collapse.
    pub collinear_tolerance: f64,
    /// Run the advisory planarity check on every surface.
    pub check_planarity: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            collinear_tolerance: DEFAULT_COLLINEAR_TOLERANCE,
            check_planarity: true,
        }
    }
}
