// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! CROPS - Cropped Region Output Processing System
//!
//! A library for marking rectangular regions of interest (ROIs) on a
//! reference frame of a video and batch-exporting one cropped clip per
//! ROI per video.
//!
//! The interactive editing engine ([`editor`]) consumes abstract pointer
//! events and mutates a working copy of a per-video ROI list; the batch
//! pipeline ([`pipeline`]) turns the saved lists into crop jobs and drives
//! an external transcoder. Frame decoding and transcoding live behind the
//! traits in [`io::media`] and [`io::transcode`] so hosts can plug in
//! their own backends.

pub mod app;
pub mod editor;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod util;

pub use error::{Error, Result};
