#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report aggregation engine.
//!
//! [`summarize`] reduces any collection of damage reports into a
//! [`StatsSummary`]. It is pure and cheap enough to run on every change to
//! the collection. [`ReportLog`] is the grow-only collection the reporting
//! session owns: new reports go to the head, nothing is ever edited or
//! removed.

pub mod aggregate;
pub mod collection;

pub use aggregate::summarize;
pub use collection::ReportLog;
pub use relief_map_analytics_models::StatsSummary;
