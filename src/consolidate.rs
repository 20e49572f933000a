use crate::package::{Capacity, Package};
use crate::types::{Chunk, PackageSummary, TypeSummary};

/// Groups chunks by item type in first-appearance order.
///
/// Chunks of the same type but different unit volume or value (duplicate
/// inventory names) stay in separate lines.
pub fn consolidate(chunks: &[Chunk]) -> Vec<TypeSummary> {
    let mut lines: Vec<TypeSummary> = Vec::new();
    for chunk in chunks {
        match lines.iter_mut().find(|l| {
            l.item_type == chunk.item_type
                && l.unit_volume == chunk.unit_volume
                && l.unit_value == chunk.unit_value
        }) {
            Some(line) => line.count += chunk.count,
            None => lines.push(TypeSummary {
                item_type: chunk.item_type.clone(),
                count: chunk.count,
                unit_volume: chunk.unit_volume,
                unit_value: chunk.unit_value,
                total_volume: 0.0,
                total_value: 0.0,
            }),
        }
    }
    for line in &mut lines {
        line.total_volume = line.count as f64 * line.unit_volume;
        line.total_value = line.count as f64 * line.unit_value;
    }
    lines
}

pub fn summarize(package: &Package, capacity: &Capacity) -> PackageSummary {
    let items = consolidate(package.chunks());
    PackageSummary {
        total_volume: items.iter().map(|l| l.total_volume).sum(),
        total_value: items.iter().map(|l| l.total_value).sum(),
        residual_volume: package.residual_volume(capacity),
        items,
    }
}
