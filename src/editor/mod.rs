// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The interactive ROI editing engine: hit-zone geometry, the ordered
//! selection set, and the pointer-driven editing state machine.

pub mod hit;
pub mod selection;
pub mod session;
