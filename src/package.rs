use serde::Serialize;

use crate::types::{Chunk, PackingConfig};

/// Slack for float accumulation when totals are updated incrementally.
const EPSILON: f64 = 1e-6;

/// Hard capacity of every package in a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capacity {
    pub volume: f64,
    /// `None` when value is unlimited.
    pub value: Option<f64>,
}

impl Capacity {
    pub fn from_config(config: &PackingConfig) -> Self {
        Self {
            volume: config.volume_limit,
            value: config.has_value_limit().then_some(config.value_limit),
        }
    }

    pub fn admits(&self, volume: f64, value: f64) -> bool {
        volume <= self.volume + EPSILON && self.value.is_none_or(|limit| value <= limit + EPSILON)
    }

    /// Whether the chunk fits an empty package.
    pub fn admits_chunk(&self, chunk: &Chunk) -> bool {
        self.admits(chunk.total_volume(), chunk.total_value())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Package {
    chunks: Vec<Chunk>,
    total_volume: f64,
    total_value: f64,
}

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunk(chunk: Chunk) -> Self {
        let mut package = Self::new();
        package.insert(chunk);
        package
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn total_volume(&self) -> f64 {
        self.total_volume
    }

    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    pub fn residual_volume(&self, capacity: &Capacity) -> f64 {
        capacity.volume - self.total_volume
    }

    pub fn can_accept(&self, chunk: &Chunk, capacity: &Capacity) -> bool {
        capacity.admits(
            self.total_volume + chunk.total_volume(),
            self.total_value + chunk.total_value(),
        )
    }

    /// Whether replacing the chunk at `idx` with `incoming` keeps the package within capacity.
    pub fn can_exchange(&self, idx: usize, incoming: &Chunk, capacity: &Capacity) -> bool {
        let outgoing = &self.chunks[idx];
        capacity.admits(
            self.total_volume - outgoing.total_volume() + incoming.total_volume(),
            self.total_value - outgoing.total_value() + incoming.total_value(),
        )
    }

    pub fn insert(&mut self, chunk: Chunk) {
        self.total_volume += chunk.total_volume();
        self.total_value += chunk.total_value();
        self.chunks.push(chunk);
    }

    pub fn remove(&mut self, idx: usize) -> Chunk {
        let chunk = self.chunks.remove(idx);
        if self.chunks.is_empty() {
            // Reset exactly instead of carrying float residue.
            self.total_volume = 0.0;
            self.total_value = 0.0;
        } else {
            self.total_volume -= chunk.total_volume();
            self.total_value -= chunk.total_value();
        }
        chunk
    }

    /// Puts `incoming` in slot `idx` and returns the chunk that was there.
    pub fn exchange(&mut self, idx: usize, incoming: Chunk) -> Chunk {
        self.total_volume += incoming.total_volume();
        self.total_value += incoming.total_value();
        let outgoing = std::mem::replace(&mut self.chunks[idx], incoming);
        self.total_volume -= outgoing.total_volume();
        self.total_value -= outgoing.total_value();
        outgoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(item_type: &str, count: u64, unit_volume: f64, unit_value: f64) -> Chunk {
        Chunk {
            item_type: item_type.to_string(),
            count,
            unit_volume,
            unit_value,
        }
    }

    fn capacity(volume: f64, value: Option<f64>) -> Capacity {
        Capacity { volume, value }
    }

    #[test]
    fn test_insert_and_remove_track_totals() {
        let mut package = Package::new();
        package.insert(chunk("Rook", 4, 10_000.0, 100.0));
        package.insert(chunk("Onyx", 2, 10_000.0, 50.0));
        assert_eq!(package.total_volume(), 60_000.0);
        assert_eq!(package.total_value(), 500.0);

        let removed = package.remove(0);
        assert_eq!(removed.item_type, "Rook");
        assert_eq!(package.total_volume(), 20_000.0);
        assert_eq!(package.total_value(), 100.0);

        package.remove(0);
        assert!(package.is_empty());
        assert_eq!(package.total_volume(), 0.0);
    }

    #[test]
    fn test_volume_capacity() {
        let cap = capacity(350_000.0, None);
        let mut package = Package::with_chunk(chunk("A", 20, 10_000.0, 1.0));
        assert_eq!(package.residual_volume(&cap), 150_000.0);
        assert!(package.can_accept(&chunk("B", 15, 10_000.0, 1.0), &cap));
        assert!(!package.can_accept(&chunk("B", 16, 10_000.0, 1.0), &cap));
        package.insert(chunk("B", 15, 10_000.0, 1.0));
        assert_eq!(package.residual_volume(&cap), 0.0);
    }

    #[test]
    fn test_value_capacity() {
        let cap = capacity(1_000_000.0, Some(1_000.0));
        let package = Package::with_chunk(chunk("A", 1, 10.0, 600.0));
        assert!(!package.can_accept(&chunk("B", 1, 10.0, 500.0), &cap));
        assert!(package.can_accept(&chunk("B", 1, 10.0, 400.0), &cap));
        assert!(capacity(1_000_000.0, None).admits_chunk(&chunk("B", 1, 10.0, 1e12)));
    }

    #[test]
    fn test_exchange() {
        let cap = capacity(100.0, None);
        let mut package = Package::with_chunk(chunk("A", 6, 10.0, 1.0));
        package.insert(chunk("B", 3, 10.0, 2.0));
        let incoming = chunk("C", 7, 10.0, 3.0);
        assert!(!package.can_exchange(1, &incoming, &cap));
        assert!(package.can_exchange(0, &incoming, &cap));

        let outgoing = package.exchange(0, incoming);
        assert_eq!(outgoing.item_type, "A");
        assert_eq!(package.total_volume(), 100.0);
        assert_eq!(package.total_value(), 27.0);
        assert_eq!(package.chunks()[0].item_type, "C");
    }
}
