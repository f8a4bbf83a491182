/// Convenience result type used across Flagdeck.
pub type FlagdeckResult<T> = Result<T, FlagdeckError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Per-entry conditions (`Fetch`, `Decode`, `Encode`) are recoverable: the
/// batch driver records them and continues. `EmptyArchive` and `ArchiveWrite`
/// are batch-level and abort the run. `SinkDelivery` happens after a valid
/// archive was produced and is reported rather than propagated.
#[derive(thiserror::Error, Debug)]
pub enum FlagdeckError {
    /// Invalid user-provided configuration or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The remote flag source was unreachable or returned a non-success status.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// The fetched bytes could not be decoded as a raster image.
    #[error("image decode error: {0}")]
    Decode(String),

    /// The composited canvas could not be encoded as PNG.
    #[error("image encode error: {0}")]
    Encode(String),

    /// No entries were available at packaging time; nothing to deliver.
    #[error("empty archive: no entries to package")]
    EmptyArchive,

    /// The archive serialization failed; no partial archive is returned.
    #[error("archive write error: {0}")]
    ArchiveWrite(String),

    /// The finished archive could not be handed to the external sink.
    #[error("sink delivery error: {0}")]
    SinkDelivery(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlagdeckError {
    /// Build a [`FlagdeckError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FlagdeckError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`FlagdeckError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`FlagdeckError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`FlagdeckError::ArchiveWrite`] value.
    pub fn archive_write(msg: impl Into<String>) -> Self {
        Self::ArchiveWrite(msg.into())
    }

    /// Build a [`FlagdeckError::SinkDelivery`] value.
    pub fn sink_delivery(msg: impl Into<String>) -> Self {
        Self::SinkDelivery(msg.into())
    }
}

#[cfg(test)]
#[path = "../tests/unit/error.rs"]
mod tests;
