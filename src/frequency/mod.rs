//! Frequency estimation engines
//!
//! This module provides the engines that rank the items of a stream by how
//! often they occur.
//!
//! # Algorithms
//!
//! - [`ExactTopK`]: Exact tally with bounded heap extraction
//! - [`SpaceSaving`]: Top-K / heavy hitters in bounded memory
//! - [`FilteredSpaceSaving`]: Space-Saving behind a bucketed admission filter
//!
//! All three report [`ItemCount`] pairs ordered by count descending, ties
//! broken by item ascending.
//!
//! # Example
//!
//! ```
//! use topflow::frequency::SpaceSaving;
//! use topflow::traits::FrequencyEngine;
//!
//! let mut ss = SpaceSaving::new(2, 10);
//! ss.extend(&["a", "b", "a", "c", "a", "b"]);
//!
//! let top = ss.top_k();
//! assert_eq!(top[0].item, "a");
//! assert_eq!(top[0].count, 3);
//! ```

mod counter;
mod exact;
mod filtered;
mod space_saving;

pub use counter::ItemCount;
pub use exact::ExactTopK;
pub use filtered::FilteredSpaceSaving;
pub use space_saving::SpaceSaving;
