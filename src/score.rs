//! Chunk ordering keys. Lower keys are packed first.

use crate::types::{Chunk, ScoringWeights, SortOrder};

pub fn sort_key(chunk: &Chunk, order: SortOrder, weights: ScoringWeights) -> f64 {
    let volume = chunk.total_volume();
    let value = chunk.total_value();
    match order {
        SortOrder::Volume => -volume,
        SortOrder::Density => {
            if volume > 0.0 {
                -(value / volume)
            } else {
                f64::NEG_INFINITY
            }
        }
        SortOrder::Composite => -(weights.alpha * value / (volume + 1.0) + weights.beta * volume),
        SortOrder::Value => -value,
        SortOrder::Input => 0.0,
    }
}

/// Stable sort by key, so equal keys keep their input order.
pub fn sort_chunks(chunks: &mut [Chunk], order: SortOrder, weights: ScoringWeights) {
    if order == SortOrder::Input {
        return;
    }
    chunks.sort_by(|a, b| {
        sort_key(a, order, weights).total_cmp(&sort_key(b, order, weights))
    });
}
