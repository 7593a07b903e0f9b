use crate::{
    conversion::{BatchRatio, DualRecipe, Efficiency, TimeScaling, UnitRecipe},
    error::CalcResult,
};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "refinery.json";

/// Ratio tables and policy knobs for every calculator.
///
/// Loaded from `{data_dir}/refinery.json`.
/// In tests, use `RefineryConfig::standard()`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefineryConfig {
    /// Large Spice Refinery: spice sand -> melange.
    pub spice:      BatchRatio,
    /// Medium Chemical Refinery: stravidium mass -> fiber.
    pub fiber:      UnitRecipe,
    /// Large Ore Refinery: fiber + titanium ore -> plastanium.
    pub plastanium: DualRecipe,
    /// Landsraad crafting discount. Applies to fiber and plastanium only.
    pub landsraad:  Efficiency,
    /// Identities allowed to delete any run.
    #[serde(default)]
    pub admins:     Vec<String>,
}

impl RefineryConfig {
    /// Load from the data/ directory.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/{CONFIG_FILE}");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: RefineryConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid {path}: {e}"))?;
        log::debug!("Loaded refinery config from {path}");
        Ok(config)
    }

    /// Current community-known ratios.
    pub fn standard() -> Self {
        Self {
            spice: BatchRatio {
                input_per_batch:     10_000.0,
                output_per_batch:    200.0,
                byproduct_per_batch: 75_000.0,
                seconds_per_batch:   2_700.0,
            },
            fiber: UnitRecipe {
                input_per_output:     3.0,
                byproduct_per_output: 100.0,
                seconds_per_output:   10.0,
            },
            plastanium: DualRecipe {
                primary_per_output:   1.0,
                secondary_per_output: 4.0,
                byproduct_per_output: 1_250.0,
                seconds_per_output:   20.0,
            },
            landsraad: Efficiency {
                multiplier:   0.75,
                time_scaling: TimeScaling::Fixed,
            },
            admins: Vec::new(),
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        self.spice.validate()?;
        self.fiber.validate()?;
        self.plastanium.validate()?;
        self.landsraad.validate()
    }

    /// The efficiency to apply to crafting stages.
    pub fn crafting_efficiency(&self, landsraad: bool) -> Efficiency {
        if landsraad {
            self.landsraad
        } else {
            Efficiency::NONE
        }
    }
}

impl Default for RefineryConfig {
    fn default() -> Self {
        Self::standard()
    }
}
