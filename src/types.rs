use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// One inventory line: a quantity of a single item type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(deserialize_with = "deserialize_count_from_number")]
    pub count: u64,
    pub unit_volume: f64,
    pub unit_value: f64,
}

impl ItemStack {
    pub fn new(item_type: impl Into<String>, count: u64, unit_volume: f64, unit_value: f64) -> Self {
        Self {
            item_type: item_type.into(),
            count,
            unit_volume,
            unit_value,
        }
    }

    pub fn total_volume(&self) -> f64 {
        self.count as f64 * self.unit_volume
    }

    pub fn total_value(&self) -> f64 {
        self.count as f64 * self.unit_value
    }

    /// Unit figures must be finite and non-negative; zero leaves a dimension unconstrained.
    pub fn validate(&self) -> Result<()> {
        for (name, amount) in [("unit volume", self.unit_volume), ("unit value", self.unit_value)] {
            if !amount.is_finite() || amount < 0.0 {
                return Err(Error::MalformedInput(format!(
                    "{}: {name} must be a non-negative number, got {amount}",
                    self.item_type
                )));
            }
        }
        Ok(())
    }
}

/// Accepts counts written as JSON integers or integral floats (`16` or `16.0`).
pub fn deserialize_count_from_number<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let n = f64::deserialize(deserializer)?;
    if !n.is_finite() || n < 0.0 || n.fract() != 0.0 || n >= u64::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative whole number, got {n}"
        )));
    }
    Ok(n as u64)
}

/// A sub-quantity of a stack; the unit that gets placed into packages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub item_type: String,
    pub count: u64,
    pub unit_volume: f64,
    pub unit_value: f64,
}

impl Chunk {
    pub fn from_stack(stack: &ItemStack, count: u64) -> Self {
        Self {
            item_type: stack.item_type.clone(),
            count,
            unit_volume: stack.unit_volume,
            unit_value: stack.unit_value,
        }
    }

    pub fn total_volume(&self) -> f64 {
        self.count as f64 * self.unit_volume
    }

    pub fn total_value(&self) -> f64 {
        self.count as f64 * self.unit_value
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x {}", self.count, self.item_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub alpha: f64,
    pub beta: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 0.0,
        }
    }
}

/// Order in which chunks are fed to the packer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Largest total volume first.
    #[default]
    Volume,
    /// Highest value per unit of volume first.
    Density,
    /// Weighted blend of density and volume.
    Composite,
    /// Highest total value first.
    Value,
    /// Keep the order the stacks were given in.
    Input,
}

/// How the packer picks a package for each chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementPolicy {
    #[default]
    FirstFit,
    BestFit,
    ValueBalance,
    ModifiedFirstFit,
}

/// What to do when a stack needs more chunks than `max_splits_per_stack`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitPolicy {
    /// Split as often as the caps require; the split budget only triggers a warning.
    #[default]
    Hard,
    /// Never exceed the split budget; chunks may then break the per-chunk caps.
    Soft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackingConfig {
    pub volume_limit: f64,
    /// 0 means unlimited.
    pub value_limit: f64,
    pub max_splits_per_stack: u32,
    /// Per-chunk value cap; 0 means unlimited.
    pub max_stack_value: f64,
    pub weights: ScoringWeights,
    pub order: SortOrder,
    pub policy: PlacementPolicy,
    pub split_policy: SplitPolicy,
    /// Sweeps of the local improver; 0 disables it.
    pub max_improve_iterations: usize,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            volume_limit: 350_000.0,
            value_limit: 0.0,
            max_splits_per_stack: 10,
            max_stack_value: 0.0,
            weights: ScoringWeights::default(),
            order: SortOrder::default(),
            policy: PlacementPolicy::default(),
            split_policy: SplitPolicy::default(),
            max_improve_iterations: 50,
        }
    }
}

impl PackingConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.volume_limit.is_finite() || self.volume_limit <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "volume limit must be positive, got {}",
                self.volume_limit
            )));
        }
        if !self.value_limit.is_finite() || self.value_limit < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "value limit must be non-negative, got {}",
                self.value_limit
            )));
        }
        if self.max_splits_per_stack == 0 {
            return Err(Error::InvalidConfig(
                "max splits per stack must be at least 1".to_string(),
            ));
        }
        if !self.max_stack_value.is_finite() || self.max_stack_value < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max stack value must be non-negative, got {}",
                self.max_stack_value
            )));
        }
        if !self.weights.alpha.is_finite() || !self.weights.beta.is_finite() {
            return Err(Error::InvalidConfig(
                "scoring weights must be finite".to_string(),
            ));
        }
        Ok(())
    }

    pub fn has_value_limit(&self) -> bool {
        self.value_limit > 0.0
    }
}

/// A non-fatal condition attributed to one item type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackWarning {
    pub item_type: String,
    pub message: String,
}

impl std::fmt::Display for PackWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.item_type, self.message)
    }
}

/// Per-type line of a consolidated package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSummary {
    pub item_type: String,
    pub count: u64,
    pub unit_volume: f64,
    pub unit_value: f64,
    pub total_volume: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub total_volume: f64,
    pub total_value: f64,
    pub residual_volume: f64,
    pub items: Vec<TypeSummary>,
}

impl PackageSummary {
    pub fn fill_percent(&self, volume_limit: f64) -> f64 {
        if volume_limit <= 0.0 {
            return 0.0;
        }
        self.total_volume / volume_limit * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub packages: Vec<PackageSummary>,
    pub volume_limit: f64,
    pub warnings: Vec<PackWarning>,
    pub unplaced: Vec<Chunk>,
}

impl Solution {
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    pub fn total_volume(&self) -> f64 {
        self.packages.iter().map(|p| p.total_volume).sum()
    }

    pub fn total_value(&self) -> f64 {
        self.packages.iter().map(|p| p.total_value).sum()
    }

    /// Lower bound on the package count: packed plus unplaced volume over the limit.
    pub fn estimated_packages(&self) -> usize {
        let unplaced: f64 = self.unplaced.iter().map(Chunk::total_volume).sum();
        let total = self.total_volume() + unplaced;
        if total <= 0.0 {
            return 0;
        }
        (total / self.volume_limit).ceil() as usize
    }

    pub fn total_waste_percent(&self) -> f64 {
        let capacity = self.volume_limit * self.packages.len() as f64;
        if capacity <= 0.0 {
            return 0.0;
        }
        (capacity - self.total_volume()) / capacity * 100.0
    }

    /// Unplaceable chunks as errors, in the order they were encountered.
    pub fn errors(&self) -> Vec<Error> {
        self.unplaced
            .iter()
            .map(|c| Error::UnplaceableChunk {
                item_type: c.item_type.clone(),
                count: c.count,
                total_volume: c.total_volume(),
                total_value: c.total_value(),
            })
            .collect()
    }

    /// `Err` with the first unplaceable chunk, if any.
    pub fn check_complete(&self) -> Result<()> {
        match self.errors().into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
