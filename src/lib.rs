//! Sorted maps and sets over an unbalanced binary search tree.
//!
//! This crate provides [`SoMap`] and [`SoSet`]: ordered containers with a pluggable
//! [`Comparator`], min/max queries and *snapshot* iteration.
//!
//! - [`SoMap::entries`], [`SoMap::keys`] and [`SoMap::values`] copy the contents out in
//!   ascending key order at the moment they are called. The container can then be changed freely
//!   while the [`Snapshot`] is consumed; several snapshots advance independently, report their
//!   position and can be cancelled early.
//! - [`Value`] keys carry their kind at runtime. Comparing two different kinds is an
//!   [`Error::TypeMismatch`] rather than a silent coercion.
//!
//! # Example
//!
//! ```
//! use somap::SoMap;
//!
//! let mut map = SoMap::new();
//! for key in ["x", "z", "y", "b", "a", "c", "d"] {
//!     map.set(key, key.to_uppercase()).unwrap();
//! }
//!
//! let keys: Vec<_> = map.keys().collect();
//! assert_eq!(keys, ["a", "b", "c", "d", "x", "y", "z"]);
//!
//! // "x" is the root; deleting it promotes its in-order successor.
//! map.delete("x").unwrap();
//! assert_eq!(map.to_string(), "SoMap 6 { a => A, b => B, c => C, d => D, y => Y, z => Z }");
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **`serde`** - `Serialize`/`Deserialize` for the containers and [`Value`]
//!
//! # Implementation
//!
//! Nodes live in an arena and link to their children by handle. The tree is never rebalanced:
//! insertion order decides its shape, so keys inserted in sorted order produce a chain and
//! O(n) operations. Traversal is iterative, so such chains are walked without deep recursion.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod comparator;
mod error;
mod raw;
#[cfg(feature = "serde")]
mod serde_impls;
mod snapshot;
mod value;

pub mod somap;
pub mod soset;

pub use comparator::{Comparator, Natural, NaturalOrder, Reversed};
pub use error::{Error, Result};
pub use snapshot::{Snapshot, Step};
pub use somap::SoMap;
pub use soset::SoSet;
pub use value::{Kind, Value};
