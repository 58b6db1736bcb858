// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error taxonomy shared across the editing engine, interchange I/O,
//! and the batch pipeline.

use thiserror::Error;

use crate::io::transcode::TranscodeError;

/// Library-level errors.
#[derive(Debug, Error)]
pub enum Error {
    /// An action was rejected before touching any state: an unsupported
    /// video path, an imported rectangle with impossible dimensions, a
    /// missing frame.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Filesystem failure. Fatal to a batch run when the output directory
    /// cannot be created; local to the triggering action otherwise.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An interchange file could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A single transcode job failed. The batch records it and continues.
    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    /// The batch was invoked with nothing to do.
    #[error("precondition failed: {0}")]
    Precondition(String),
}

pub type Result<T> = std::result::Result<T, Error>;
