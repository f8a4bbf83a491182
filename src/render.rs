//! Card compositing: text layout plus the per-card rasterization pipeline.

/// Card styling, the rounded-rect outline, and the flag-to-PNG renderer.
pub mod card;
/// Parley-backed label shaping for card text.
pub mod text;
