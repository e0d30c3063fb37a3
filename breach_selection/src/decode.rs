// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Select buffer decoding.
//!
//! ## Layout
//!
//! A select buffer is a sequence of hit records, one per hit:
//!
//! ```text
//! [name_count, depth_min_raw, depth_max_raw, name_1, ..., name_<name_count>]
//! ```
//!
//! Raw depths are window depths in `[0, 1]` scaled to the full `u32` range.
//! The hit count is reported separately; a negative count means the buffer overflowed.

use alloc::vec::Vec;
use core::any::Any;

use breach_scene::{NodeId, Payload, Scene};

use crate::resolver::{SelectionResolver, TypedSelectionResolver};

/// Converts a raw select-buffer depth to `[0, 1]`.
pub fn normalize_depth(raw: u32) -> f32 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "normalized depth is single precision."
    )]
    let depth = (f64::from(raw) / f64::from(u32::MAX)) as f32;
    depth
}

/// Converts a depth in `[0, 1]` to its raw select-buffer form. Out-of-range values saturate.
pub fn raw_depth(depth: f32) -> u32 {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "float to int casts saturate."
    )]
    let raw = (f64::from(depth) * f64::from(u32::MAX) + 0.5) as u32;
    raw
}

/// One decoded hit record.
#[derive(Clone, Debug, PartialEq)]
pub struct Hit {
    /// Nearest window depth of the hit, in `[0, 1]`.
    pub depth_min: f32,
    /// Farthest window depth of the hit, in `[0, 1]`.
    pub depth_max: f32,
    /// Name path active when the hit was recorded, outermost first.
    pub names: Vec<u32>,
}

impl Hit {
    /// Appends this hit's record to `out` in select-buffer layout.
    pub fn encode_into(&self, out: &mut Vec<u32>) {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "name paths are far shorter than u32::MAX."
        )]
        out.push(self.names.len() as u32);
        out.push(raw_depth(self.depth_min));
        out.push(raw_depth(self.depth_max));
        out.extend_from_slice(&self.names);
    }
}

/// Errors from [`Selection::decode`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The backend reported a negative hit count: its buffer was too small.
    #[error("select buffer overflowed")]
    Overflow,
    /// A record claims more words than the buffer holds.
    #[error("hit {hit} needs {needed} words but only {available} remain")]
    Truncated {
        /// Index of the offending record.
        hit: usize,
        /// Words the record needs.
        needed: usize,
        /// Words left in the buffer.
        available: usize,
    },
}

/// Decoded hits, nearest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    hits: Vec<Hit>,
}

impl Selection {
    /// Decodes `hit_count` records from `buffer`.
    ///
    /// Hits are stable-sorted by `depth_min`, so equal depths keep buffer order and index `0` is
    /// the frontmost hit. Words after the last record are ignored.
    pub fn decode(hit_count: i32, buffer: &[u32]) -> Result<Self, DecodeError> {
        let count = usize::try_from(hit_count).map_err(|_| DecodeError::Overflow)?;
        let mut hits = Vec::with_capacity(count);
        let mut rest = buffer;
        for hit in 0..count {
            let Some((&[name_count, min, max], tail)) = rest.split_first_chunk::<3>() else {
                return Err(DecodeError::Truncated {
                    hit,
                    needed: 3,
                    available: rest.len(),
                });
            };
            let name_count = name_count as usize;
            let Some(names) = tail.get(..name_count) else {
                return Err(DecodeError::Truncated {
                    hit,
                    needed: 3 + name_count,
                    available: rest.len(),
                });
            };
            hits.push(Hit {
                depth_min: normalize_depth(min),
                depth_max: normalize_depth(max),
                names: names.to_vec(),
            });
            rest = &tail[name_count..];
        }
        Ok(Self::from_hits(hits))
    }

    /// Builds a selection from already decoded hits, sorting them nearest first.
    pub fn from_hits(mut hits: Vec<Hit>) -> Self {
        hits.sort_by(|a, b| a.depth_min.total_cmp(&b.depth_min));
        Self { hits }
    }

    /// Re-encodes the hits as `(hit_count, buffer)`.
    pub fn encode(&self) -> (i32, Vec<u32>) {
        let mut buffer = Vec::new();
        for hit in &self.hits {
            hit.encode_into(&mut buffer);
        }
        (i32::try_from(self.hits.len()).unwrap_or(i32::MAX), buffer)
    }

    /// All hits, nearest first.
    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    /// Consumes the selection.
    pub fn into_hits(self) -> Vec<Hit> {
        self.hits
    }

    /// The frontmost hit.
    pub fn nearest(&self) -> Option<&Hit> {
        self.hits.first()
    }

    /// Number of hits.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Returns `true` if nothing was hit.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Resolves the frontmost hit's name path to a payload under `root`.
    pub fn nearest_payload<'s>(&self, scene: &'s Scene<'_>, root: NodeId) -> Option<Payload<'s>> {
        let hit = self.nearest()?;
        SelectionResolver::new(&hit.names).resolve(scene, root)
    }

    /// Resolves the frontmost hit's name path to a payload of type `T` under `root`.
    pub fn nearest_typed<'s, T: Any>(&self, scene: &'s Scene<'_>, root: NodeId) -> Option<&'s T> {
        let hit = self.nearest()?;
        TypedSelectionResolver::<T>::new(&hit.names).resolve(scene, root)
    }
}
