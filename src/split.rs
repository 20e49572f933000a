//! Stack splitting: divides an inventory stack into chunks that fit a package.

use crate::error::{Error, Result};
use crate::types::{Chunk, ItemStack, PackWarning, PackingConfig, SplitPolicy};

/// Upper bound on the chunks one run may produce.
pub const MAX_CHUNKS_PER_RUN: u64 = 10_000;

#[derive(Debug, Clone, Default)]
pub struct SplitResult {
    pub chunks: Vec<Chunk>,
    pub warning: Option<PackWarning>,
}

/// Largest chunk size allowed by the per-chunk volume and value caps.
///
/// The value cap is the tighter of `max_stack_value` and `value_limit`, each
/// only when positive. A zero unit volume or value leaves that dimension
/// unconstrained. The result is at least 1 so a single unit larger than the
/// caps still forms a chunk.
pub fn ideal_chunk_size(stack: &ItemStack, config: &PackingConfig) -> u64 {
    let count = stack.count;
    let cap_by_volume = if stack.unit_volume > 0.0 {
        floor_ratio(config.volume_limit, stack.unit_volume)
    } else {
        count
    };
    let value_cap = [config.max_stack_value, config.value_limit]
        .into_iter()
        .filter(|&cap| cap > 0.0)
        .reduce(f64::min);
    let cap_by_value = match value_cap {
        Some(cap) if stack.unit_value > 0.0 => floor_ratio(cap, stack.unit_value),
        _ => count,
    };
    cap_by_volume.min(cap_by_value).min(count).max(1)
}

fn floor_ratio(limit: f64, unit: f64) -> u64 {
    let mut ratio = (limit / unit).floor();
    // the division can round up onto the next whole number
    if ratio > 0.0 && ratio * unit > limit {
        ratio -= 1.0;
    }
    if ratio >= u64::MAX as f64 { u64::MAX } else { ratio as u64 }
}

pub fn split_stack(stack: &ItemStack, config: &PackingConfig) -> Result<SplitResult> {
    if stack.count == 0 {
        return Ok(SplitResult::default());
    }

    let ideal = ideal_chunk_size(stack, config);
    let needed = stack.count.div_ceil(ideal);
    let max_splits = u64::from(config.max_splits_per_stack);

    let mut warning = None;
    let splits = if needed > max_splits {
        let message = match config.split_policy {
            SplitPolicy::Hard => format!(
                "needs {needed} splits, more than the maximum of {max_splits}; splitting {needed} ways to keep chunks within caps"
            ),
            SplitPolicy::Soft => format!(
                "needs {needed} splits, more than the maximum of {max_splits}; chunks of up to {} units exceed the per-chunk caps",
                stack.count.div_ceil(max_splits)
            ),
        };
        tracing::warn!(item_type = %stack.item_type, needed, max_splits, "split budget exceeded");
        warning = Some(PackWarning {
            item_type: stack.item_type.clone(),
            message,
        });
        match config.split_policy {
            SplitPolicy::Hard => needed,
            SplitPolicy::Soft => max_splits,
        }
    } else {
        needed
    };

    if splits > MAX_CHUNKS_PER_RUN {
        return Err(too_many_chunks(&stack.item_type, splits));
    }

    Ok(SplitResult {
        chunks: even_split(stack, splits),
        warning,
    })
}

fn too_many_chunks(item_type: &str, chunks: u64) -> Error {
    Error::MalformedInput(format!(
        "{item_type}: splitting would produce {chunks} chunks, more than the {MAX_CHUNKS_PER_RUN} allowed per run"
    ))
}

/// Spreads `stack.count` over `splits` chunks whose sizes differ by at most one.
fn even_split(stack: &ItemStack, splits: u64) -> Vec<Chunk> {
    let base = stack.count / splits;
    let remainder = stack.count % splits;
    (0..splits)
        .map(|i| base + u64::from(i < remainder))
        .filter(|&count| count > 0)
        .map(|count| Chunk::from_stack(stack, count))
        .collect()
}

/// Splits every stack, returning all chunks in stack order plus any warnings.
pub fn split_all(
    stacks: &[ItemStack],
    config: &PackingConfig,
) -> Result<(Vec<Chunk>, Vec<PackWarning>)> {
    let mut chunks = Vec::new();
    let mut warnings = Vec::new();
    for stack in stacks {
        let result = split_stack(stack, config)?;
        let total = (chunks.len() + result.chunks.len()) as u64;
        if total > MAX_CHUNKS_PER_RUN {
            return Err(too_many_chunks(&stack.item_type, total));
        }
        tracing::debug!(
            item_type = %stack.item_type,
            count = stack.count,
            chunks = result.chunks.len(),
            "split stack"
        );
        chunks.extend(result.chunks);
        warnings.extend(result.warning);
    }
    Ok((chunks, warnings))
}
