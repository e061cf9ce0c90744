//! # Topflow
//!
//! Top-k frequency reporting for line-oriented streams.
//!
//! Topflow reads newline-delimited records, estimates how often each distinct
//! record occurs, and reports the k most frequent ones.
//!
//! ## Engines
//!
//! - **Exact**: Full tally plus bounded heap extraction ([`ExactTopK`])
//! - **Space-Saving**: Bounded memory, over-estimates by at most the absorbed
//!   count ([`SpaceSaving`])
//! - **Filtered Space-Saving**: Space-Saving with a bucketed admission filter
//!   that keeps a skewed tail from churning the monitored set
//!   ([`FilteredSpaceSaving`])
//!
//! ## Quick Start
//!
//! ```rust
//! use topflow::prelude::*;
//!
//! let mut exact = ExactTopK::new(2);
//! for record in ["a", "b", "a", "c", "a", "b"] {
//!     exact.observe(&record);
//! }
//!
//! let top = exact.top_k();
//! assert_eq!((top[0].item, top[0].count), ("a", 3));
//! assert_eq!((top[1].item, top[1].count), ("b", 2));
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Standard library collections, the line reader, the
//!   renderer and the pipeline
//! - `cli` (default): The `topflow` binary
//! - `serde`: Serialization of configuration and results

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Core modules always available
pub mod config;
pub mod frequency;
pub mod heap;
mod math;
pub mod traits;

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod input;

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod pipeline;

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod render;

pub mod prelude {
    pub use crate::config::{Algorithm, EngineConfig, HashSeed};
    pub use crate::frequency::{ExactTopK, FilteredSpaceSaving, ItemCount, SpaceSaving};
    pub use crate::traits::*;

    #[cfg(feature = "std")]
    pub use crate::render::Report;
}

pub use config::{Algorithm, EngineConfig};
pub use frequency::{ExactTopK, FilteredSpaceSaving, ItemCount, SpaceSaving};
