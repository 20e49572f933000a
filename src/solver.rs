use tracing::instrument;

use crate::consolidate::summarize;
use crate::error::Result;
use crate::improve::{ImproveStats, LocalImprover};
use crate::package::{Capacity, Package};
use crate::packer::BinPacker;
use crate::score::sort_chunks;
use crate::split::split_all;
use crate::types::{Chunk, ItemStack, PackWarning, PackingConfig, PlacementPolicy, Solution};

/// Package assignment before consolidation.
#[derive(Debug, Clone)]
pub struct Packing {
    pub packages: Vec<Package>,
    pub unplaced: Vec<Chunk>,
    pub warnings: Vec<PackWarning>,
    pub stats: ImproveStats,
}

/// One packing run: split, order, pack, improve, consolidate.
pub struct Solver {
    config: PackingConfig,
    stacks: Vec<ItemStack>,
}

impl Solver {
    pub fn new(config: PackingConfig, stacks: Vec<ItemStack>) -> Self {
        Self { config, stacks }
    }

    /// Fails on invalid configuration or malformed stacks. Unplaceable chunks
    /// and split warnings are reported inside the returned `Solution`.
    #[instrument(skip(self), fields(stacks = self.stacks.len(), policy = ?self.config.policy))]
    pub fn solve(&self) -> Result<Solution> {
        let packing = self.pack()?;
        let capacity = Capacity::from_config(&self.config);

        let solution = Solution {
            packages: packing
                .packages
                .iter()
                .map(|p| summarize(p, &capacity))
                .collect(),
            volume_limit: self.config.volume_limit,
            warnings: packing.warnings,
            unplaced: packing.unplaced,
        };

        tracing::info!(
            packages = solution.package_count(),
            estimated = solution.estimated_packages(),
            unplaced = solution.unplaced.len(),
            warnings = solution.warnings.len(),
            relocations = packing.stats.relocations,
            swaps = packing.stats.swaps,
            "packing finished"
        );
        Ok(solution)
    }

    /// Runs the pipeline up to the improved package list.
    pub fn pack(&self) -> Result<Packing> {
        self.config.validate()?;
        for stack in &self.stacks {
            stack.validate()?;
        }
        let (mut chunks, warnings) = split_all(&self.stacks, &self.config)?;
        sort_chunks(&mut chunks, self.config.order, self.config.weights);

        let outcome = BinPacker::from_config(&self.config).pack(chunks);
        let mut packages = outcome.packages;

        let mut improver = LocalImprover::new(
            Capacity::from_config(&self.config),
            self.config.max_improve_iterations,
        );
        if self.config.policy == PlacementPolicy::ValueBalance {
            improver = improver.emptying_only();
        }
        let stats = improver.improve(&mut packages);

        Ok(Packing {
            packages,
            unplaced: outcome.unplaced,
            warnings,
            stats,
        })
    }
}
