//! Flagdeck turns country flags into branded card images and packs them into
//! a single downloadable ZIP archive.
//!
//! # Pipeline overview
//!
//! 1. **Select**: pick a bounded, shuffled batch of countries for a region
//!    ([`select_batch`])
//! 2. **Fetch**: pull each flag raster from a [`FlagSource`]
//! 3. **Render**: composite each flag into a fixed-size card
//!    ([`CardRenderer`])
//! 4. **Pack**: bundle the rendered cards into one ZIP ([`ArchiveBuilder`])
//! 5. **Deliver**: hand the archive to an [`ArchiveSink`]
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Partial failure is data**: a missing or broken flag never aborts the
//!   batch; it is recorded in [`BatchOutcome::failures`].
//! - **Premultiplied RGBA8** during compositing; encoded PNG output carries
//!   straight alpha.
//! - **Deterministic selection**: batch composition is reproducible from a
//!   seed ([`SelectionOptions::seed`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod archive;
mod batch;
mod catalog;
mod error;
mod pipeline;
mod render;
mod source;

pub use archive::{ArchiveBuilder, ArchiveSink, FileSink, archive_file_name};
pub use batch::{BatchFailure, BatchOutcome, compose_batch};
pub use catalog::{Catalog, FlagEntry, RegionId};
pub use error::{FlagdeckError, FlagdeckResult};
pub use pipeline::{
    PipelineOptions, PipelineReport, SelectionOptions, run_pipeline, select_batch,
};
pub use render::card::{
    CardRenderer, CardStyle, RenderedCard, card_file_name, rounded_rect_path,
};
pub use render::text::{TextBrushRgba8, TextLayoutEngine};
pub use source::{FLAGCDN_W320, FlagCdnSource, FlagSource};
