use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{
    archive::{ArchiveBuilder, ArchiveSink, archive_file_name},
    batch::{BatchFailure, compose_batch},
    catalog::{Catalog, FlagEntry, RegionId},
    error::{FlagdeckError, FlagdeckResult},
    render::card::{CardRenderer, CardStyle},
    source::FlagSource,
};

#[derive(Clone, Debug)]
/// Controls how a region's catalog is sampled into one batch.
pub struct SelectionOptions {
    /// Maximum batch size; the shuffled list is truncated to this many entries.
    pub cap: usize,
    /// Shuffle seed; `None` draws fresh entropy per run.
    pub seed: Option<u64>,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self { cap: 15, seed: None }
    }
}

/// Shuffle a region's catalog and truncate it to the configured cap.
///
/// With a fixed seed the selection is fully reproducible.
pub fn select_batch(
    catalog: &Catalog,
    region: RegionId,
    options: &SelectionOptions,
) -> FlagdeckResult<Vec<FlagEntry>> {
    if options.cap == 0 {
        return Err(FlagdeckError::validation("selection cap must be at least 1"));
    }
    let mut entries = catalog.list_countries(region).to_vec();
    if entries.is_empty() {
        return Err(FlagdeckError::validation(format!(
            "no countries listed for region '{region}'"
        )));
    }
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    entries.shuffle(&mut rng);
    entries.truncate(options.cap);
    Ok(entries)
}

#[derive(Clone, Debug)]
/// Options for one end-to-end pipeline run.
pub struct PipelineOptions {
    /// Batch selection controls.
    pub selection: SelectionOptions,
    /// Prefix of the suggested archive file name.
    pub artifact_prefix: String,
    /// Card visual parameters.
    pub style: CardStyle,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            selection: SelectionOptions::default(),
            artifact_prefix: "flags".to_string(),
            style: CardStyle::default(),
        }
    }
}

#[derive(Clone, Debug)]
/// Outcome report for one pipeline run.
pub struct PipelineReport {
    /// Suggested archive file name handed to the sink.
    pub archive_file_name: String,
    /// Size of the finished archive in bytes.
    pub archive_len: usize,
    /// Number of cards rendered and packed.
    pub rendered: usize,
    /// Per-entry failures recorded during the batch.
    pub failures: Vec<BatchFailure>,
    /// Sink delivery failure, if any; the archive itself was still produced.
    pub delivery_error: Option<String>,
}

/// Run the full pipeline for one region: select, fetch, render, pack, deliver.
///
/// Per-entry failures surface in [`PipelineReport::failures`]. A batch where
/// nothing rendered fails with [`FlagdeckError::EmptyArchive`] before any
/// delivery is attempted, and an archive serialization failure aborts the run
/// with [`FlagdeckError::ArchiveWrite`]. A failed delivery is reported in the
/// result, not propagated. Cancelling the returned future abandons the run;
/// the archive is only materialized after the whole batch completes, so a
/// partial archive can never reach the sink.
#[tracing::instrument(skip(catalog, source, sink, options))]
pub async fn run_pipeline<S: FlagSource, K: ArchiveSink>(
    catalog: &Catalog,
    region: RegionId,
    source: &S,
    sink: &mut K,
    options: &PipelineOptions,
) -> FlagdeckResult<PipelineReport> {
    let batch = select_batch(catalog, region, &options.selection)?;
    let mut renderer = CardRenderer::new(options.style.clone())?;
    let outcome = compose_batch(&batch, source, &mut renderer).await?;

    let mut builder = ArchiveBuilder::new();
    for card in outcome.successes {
        builder.add_entry(card.file_name(), card.png_bytes);
    }
    let rendered = builder.len();
    let archive = builder.build()?;

    let file_name = archive_file_name(&options.artifact_prefix, region);
    let delivery_error = match sink.deliver(&file_name, &archive) {
        Ok(()) => None,
        Err(err) => {
            tracing::warn!(file = %file_name, error = %err, "archive delivery failed");
            Some(err.to_string())
        }
    };

    Ok(PipelineReport {
        archive_file_name: file_name,
        archive_len: archive.len(),
        rendered,
        failures: outcome.failures,
        delivery_error,
    })
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
