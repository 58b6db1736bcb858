// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Ordered selection set.
//!
//! Selected collection indices, kept in insertion order and duplicate-free
//! so render numbering stays deterministic.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    indices: Vec<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Add an index; returns whether the selection changed.
    pub fn insert(&mut self, index: usize) -> bool {
        if self.contains(index) {
            false
        } else {
            self.indices.push(index);
            true
        }
    }

    /// Collapse to a single index.
    pub fn set_single(&mut self, index: usize) {
        self.indices.clear();
        self.indices.push(index);
    }

    /// Select indices `0..count`.
    pub fn set_all(&mut self, count: usize) {
        self.indices = (0..count).collect();
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }
}
