// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: media access, transcoding, and interchange files.

pub mod media;
pub mod serialization;
pub mod transcode;
