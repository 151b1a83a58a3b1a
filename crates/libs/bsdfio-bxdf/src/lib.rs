//! Sampled BRDFs, analytic reflectance models and the tabular exporters.
//!
//! A [`Brdf`] is a dense 4D [`SampleSet`] tagged with the [`CoordSysKind`]
//! its angle axes are expressed in. Measured data, files read back from disk
//! and analytic models sampled on a grid all end up in this representation,
//! which is then normalised by [`process::prepare_for_export`] and emitted by
//! the writers in [`io`].
#![warn(missing_docs)]

pub mod brdf;
pub mod config;
pub mod coord;
pub mod io;
pub mod model;
pub mod process;
pub mod samples;
mod view;

pub use brdf::Brdf;
pub use config::ExportConfig;
pub use coord::CoordSysKind;
pub use samples::{SampleSet, SampleSet2D, SourceType};
pub use view::CoordView;
