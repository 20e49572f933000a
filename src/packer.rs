//! Assigns ordered chunks to packages under the configured placement policy.

use crate::package::{Capacity, Package};
use crate::types::{Chunk, PackingConfig, PlacementPolicy, ScoringWeights};

#[derive(Debug, Clone, Default)]
pub struct PackOutcome {
    pub packages: Vec<Package>,
    /// Chunks larger than an empty package, in input order.
    pub unplaced: Vec<Chunk>,
}

pub struct BinPacker {
    capacity: Capacity,
    policy: PlacementPolicy,
    weights: ScoringWeights,
}

impl BinPacker {
    pub fn new(capacity: Capacity, policy: PlacementPolicy, weights: ScoringWeights) -> Self {
        Self {
            capacity,
            policy,
            weights,
        }
    }

    pub fn from_config(config: &PackingConfig) -> Self {
        Self::new(Capacity::from_config(config), config.policy, config.weights)
    }

    /// Packs chunks in the given order. Chunks no package could hold are set
    /// aside in `unplaced`; the rest are still packed.
    pub fn pack(&self, chunks: Vec<Chunk>) -> PackOutcome {
        let mut outcome = PackOutcome::default();
        let mut placeable = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            if self.capacity.admits_chunk(&chunk) {
                placeable.push(chunk);
            } else {
                tracing::warn!(
                    item_type = %chunk.item_type,
                    count = chunk.count,
                    volume = chunk.total_volume(),
                    "chunk exceeds package capacity"
                );
                outcome.unplaced.push(chunk);
            }
        }

        if self.policy == PlacementPolicy::ModifiedFirstFit {
            let half = self.capacity.volume / 2.0;
            let (large, rest): (Vec<Chunk>, Vec<Chunk>) = placeable
                .into_iter()
                .partition(|c| c.total_volume() > half);
            outcome.packages.extend(large.into_iter().map(Package::with_chunk));
            placeable = rest;
        }

        if self.policy == PlacementPolicy::ValueBalance {
            // Spread value over the lower-bound package count from the start.
            let volume: f64 = placeable.iter().map(Chunk::total_volume).sum();
            let opened = (volume / self.capacity.volume).ceil() as usize;
            outcome.packages.resize_with(opened, Package::new);
        }

        for chunk in placeable {
            match self.choose_package(&outcome.packages, &chunk) {
                Some(pi) => {
                    tracing::debug!(chunk = %chunk, package = pi, "placed in existing package");
                    outcome.packages[pi].insert(chunk);
                }
                None => {
                    tracing::debug!(
                        chunk = %chunk,
                        package = outcome.packages.len(),
                        "opened package"
                    );
                    outcome.packages.push(Package::with_chunk(chunk));
                }
            }
        }

        outcome.packages.retain(|p| !p.is_empty());
        outcome
    }

    fn choose_package(&self, packages: &[Package], chunk: &Chunk) -> Option<usize> {
        let mut candidates = packages
            .iter()
            .enumerate()
            .filter(|(_, p)| p.can_accept(chunk, &self.capacity));

        match self.policy {
            PlacementPolicy::FirstFit | PlacementPolicy::ModifiedFirstFit => {
                candidates.next().map(|(pi, _)| pi)
            }
            PlacementPolicy::BestFit => {
                let mut best: Option<(usize, f64)> = None;
                for (pi, package) in candidates {
                    let residual_after =
                        package.residual_volume(&self.capacity) - chunk.total_volume();
                    let score = self.weights.alpha * residual_after
                        + self.weights.beta * package.total_value();
                    // strict comparison keeps the earliest package on ties
                    if best.is_none_or(|(_, s)| score < s) {
                        best = Some((pi, score));
                    }
                }
                best.map(|(pi, _)| pi)
            }
            PlacementPolicy::ValueBalance => {
                let mut best: Option<(usize, (f64, usize))> = None;
                for (pi, package) in candidates {
                    let score = (package.total_value(), package.len());
                    let better = match best {
                        None => true,
                        Some((_, (value, len))) => {
                            score.0 < value || (score.0 == value && score.1 < len)
                        }
                    };
                    if better {
                        best = Some((pi, score));
                    }
                }
                best.map(|(pi, _)| pi)
            }
        }
    }
}
