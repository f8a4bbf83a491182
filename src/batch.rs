use crate::{
    catalog::FlagEntry,
    error::{FlagdeckError, FlagdeckResult},
    render::card::{CardRenderer, RenderedCard},
    source::FlagSource,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// One recorded per-entry failure.
pub struct BatchFailure {
    /// Country id of the entry that failed.
    pub country_id: String,
    /// Human-readable failure reason.
    pub reason: String,
}

#[derive(Debug, Default)]
/// Aggregate result of driving one batch through fetch and render.
///
/// Every input entry lands in exactly one of the two lists, so
/// `successes.len() + failures.len()` always equals the batch size.
pub struct BatchOutcome {
    /// Cards rendered successfully, in input order.
    pub successes: Vec<RenderedCard>,
    /// Entries that failed to fetch or render, in input order.
    pub failures: Vec<BatchFailure>,
}

/// Fetch and render every entry in order, isolating per-entry failures.
///
/// Entries are processed strictly sequentially, one fetch and one render at a
/// time, so success order equals input order and the renderer's drawing
/// surface is never aliased. A fetch or render failure never aborts the
/// remaining entries; it is recorded in [`BatchOutcome::failures`]. An empty
/// batch is a hard error.
pub async fn compose_batch<S: FlagSource>(
    entries: &[FlagEntry],
    source: &S,
    renderer: &mut CardRenderer,
) -> FlagdeckResult<BatchOutcome> {
    if entries.is_empty() {
        return Err(FlagdeckError::validation(
            "batch must contain at least one entry",
        ));
    }

    let mut outcome = BatchOutcome::default();
    for entry in entries {
        let flag_bytes = match source.fetch(&entry.country_id).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(country_id = %entry.country_id, error = %err, "flag fetch failed");
                outcome.failures.push(BatchFailure {
                    country_id: entry.country_id.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
        };
        match renderer.render_card(entry, &flag_bytes) {
            Ok(card) => outcome.successes.push(card),
            Err(err) => {
                tracing::warn!(country_id = %entry.country_id, error = %err, "card render failed");
                outcome.failures.push(BatchFailure {
                    country_id: entry.country_id.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
    Ok(outcome)
}

#[cfg(test)]
#[path = "../tests/unit/batch.rs"]
mod tests;
