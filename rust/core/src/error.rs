// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the city model.

use thiserror::Error;

/// Result type alias for city model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while assembling a city model.
///
/// Degenerate geometry is not an error: such surfaces are built and
/// flagged invalid instead (see [`crate::Surface::is_valid`]).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A flat coordinate list whose length is not a multiple of three.
    #[error("coordinate list of length {0} is not a sequence of xyz triples")]
    MalformedCoordinates(usize),

    /// A surface id is already used on the same building or building part.
    #[error("surface {surface} already present on {owner}")]
    DuplicateSurface { owner: String, surface: String },

    /// A surface kind name that is not one of the CityGML boundary surfaces.
    #[error("unknown surface kind: {0}")]
    UnknownSurfaceKind(String),

    /// A building id is already present in the dataset.
    #[error("building {0} already exists in dataset")]
    DuplicateBuilding(String),

    /// A building part id is already present on its building.
    #[error("building part {part} already exists on building {building}")]
    DuplicateBuildingPart { building: String, part: String },

    /// No building with the given id.
    #[error("building not found: {0}")]
    BuildingNotFound(String),

    /// No building part with the given id on the building.
    #[error("building part {part} not found on building {building}")]
    BuildingPartNotFound { building: String, part: String },

    /// A building part whose parent id does not name the receiving building.
    #[error("building part {part} belongs to {found}, not {expected}")]
    ParentMismatch {
        part: String,
        expected: String,
        found: String,
    },
}
