// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for party wall detection.

use thiserror::Error;

/// Result type alias for processing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while detecting party walls.
///
/// Degenerate geometry never produces an error; it is filtered out.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Party wall detection was cancelled")]
    Cancelled,

    #[error("City model error: {0}")]
    Core(#[from] citymodel_core::Error),
}
