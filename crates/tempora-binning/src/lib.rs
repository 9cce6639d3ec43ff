#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tempora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Period engine for ISO and calendar date binning.
//!
//! - [`Period`](period::Period) - Engine holding default span, periodicity and week start
//! - [`BinRequest`](period::BinRequest) - Per-call overrides for bin generation
//! - [`Redistribution`](redistribute::Redistribution) - Values re-binned by per-day apportionment
//! - [`LabelAnchor`](labels::LabelAnchor) - Which bin date custom labels format

mod calendar;
mod iso;
/// Bin labels.
pub mod labels;
/// The period engine.
pub mod period;
/// Value redistribution between binnings.
pub mod redistribute;

pub use labels::LabelAnchor;
pub use period::{BinRequest, Period};
pub use redistribute::Redistribution;
