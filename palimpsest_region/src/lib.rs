// Copyright 2026 the Palimpsest Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=palimpsest_region --heading-base-level=0

//! Palimpsest Region: rectangle-list region algebra.
//!
//! A [`Region`] approximates an area as a list of pairwise disjoint integer
//! rectangles ([`IRect`]). Regions are combined with one rectangle, or with
//! another region, through the six [`RegionOp`]s: difference, intersect,
//! union, xor, reverse difference and replace.
//!
//! The algebra is deliberately simple: rectangles are split with a classic
//! four-strip subtraction and never coalesced, so results are deterministic
//! for a given operation sequence but not minimal.
//!
//! ## Example
//!
//! ```rust
//! use palimpsest_region::{IRect, Region, RegionOp};
//!
//! let mut region = Region::from_rect(IRect::new(0, 0, 10, 10));
//! region.op(IRect::new(5, 5, 15, 15), RegionOp::Union);
//! assert_eq!(region.area(), 175);
//! assert!(region.contains(12, 12));
//!
//! region.op(IRect::new(0, 0, 15, 15), RegionOp::Difference);
//! assert!(region.is_empty());
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod rect;
mod region;

pub use rect::IRect;
pub use region::{Region, RegionOp};
