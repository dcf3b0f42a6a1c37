use crate::defaults::*;
use crate::error::DecompError;
use crate::initialization::Reference;
use crate::localization::LocalizationVariant;
use crate::population::{AssignOptions, AssignOptionsBuilder, PartitionPolicy, PopulationScheme};
use anyhow::{Context, Result};
use orbpart_localization::{JacobiSweeps, JacobiSweepsBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::thread;

fn default_reference() -> Reference {
    REFERENCE
}
fn default_population_scheme() -> PopulationScheme {
    POPULATION_SCHEME
}
fn default_partition_policy() -> PartitionPolicy {
    PARTITION_POLICY
}
fn default_parallel() -> bool {
    PARALLEL
}
fn default_verbose() -> i8 {
    0
}
fn default_conv_tol() -> f64 {
    LOC_CONV
}
fn default_max_sweeps() -> usize {
    MAX_SWEEPS
}
fn default_number_of_cores() -> usize {
    NUMBER_OF_CORES
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Configuration {
    #[serde(default = "default_reference")]
    pub reference: Reference,
    /// The orbitals are only localized if a variant is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localization_variant: Option<LocalizationVariant>,
    #[serde(default = "default_population_scheme")]
    pub population_scheme: PopulationScheme,
    #[serde(default = "default_partition_policy")]
    pub partition_policy: PartitionPolicy,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default = "default_verbose")]
    pub verbose: i8,
    #[serde(default)]
    pub localization: LocalizationConfig,
    #[serde(default)]
    pub parallelization: ParallelizationConfig,
}

impl Configuration {
    pub fn new() -> Result<Self> {
        Self::load(Path::new(CONFIG_FILE_NAME))
    }

    /// Reads the configuration file at `path`. If it does not exist the default settings are
    /// used and written to `path`, so that the user can see all the used options.
    pub fn load(path: &Path) -> Result<Self> {
        let config_string: String = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Unable to read config file {}", path.display()))?
        } else {
            String::new()
        };
        let config: Self = Self::from_toml(&config_string)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        if !path.exists() {
            let config_string: String =
                toml::to_string(&config).context("Unable to serialize the configuration")?;
            fs::write(path, config_string)
                .with_context(|| format!("Unable to write config file {}", path.display()))?;
        }
        Ok(config)
    }

    pub fn from_toml(config_string: &str) -> Result<Self> {
        let config: Self = toml::from_str(config_string)?;
        config.validate()?;
        Ok(config)
    }

    /// The bond partitioning cannot be used without a threshold.
    pub fn validate(&self) -> Result<(), DecompError> {
        if self.partition_policy == PartitionPolicy::Bonds && self.threshold.is_none() {
            return Err(DecompError::MissingParameter {
                parameter: "threshold",
                required_by: format!("the partition policy '{}'", self.partition_policy),
            });
        }
        Ok(())
    }

    pub fn assign_options(&self) -> Result<AssignOptions, DecompError> {
        self.validate()?;
        let mut builder = AssignOptionsBuilder::default();
        builder
            .reference(self.reference)
            .scheme(self.population_scheme)
            .policy(self.partition_policy)
            .parallel(self.parallel)
            .verbose(self.verbose);
        if let Some(threshold) = self.threshold {
            builder.threshold(threshold);
        }
        builder.build().map_err(|err| DecompError::MissingParameter {
            parameter: "population options",
            required_by: err.to_string(),
        })
    }

    /// Number of workers of the parallel population analysis. The worker pool of a spin
    /// channel never exceeds the global pool, which holds `number_of_cores` threads.
    pub fn population_workers(&self) -> usize {
        match (self.parallel, self.parallelization.number_of_cores) {
            (false, _) => 1,
            (true, 0) => thread::available_parallelism().map_or(1, |n| n.get()),
            (true, n) => n,
        }
    }

    pub fn jacobi_sweeps(&self) -> Result<JacobiSweeps, DecompError> {
        JacobiSweepsBuilder::default()
            .conv_tol(self.localization.conv_tol)
            .max_sweeps(self.localization.max_sweeps)
            .build()
            .map_err(|err| DecompError::MissingParameter {
                parameter: "localization settings",
                required_by: err.to_string(),
            })
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct LocalizationConfig {
    #[serde(default = "default_conv_tol")]
    pub conv_tol: f64,
    #[serde(default = "default_max_sweeps")]
    pub max_sweeps: usize,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            conv_tol: default_conv_tol(),
            max_sweeps: default_max_sweeps(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ParallelizationConfig {
    #[serde(default = "default_number_of_cores")]
    pub number_of_cores: usize,
}

impl Default for ParallelizationConfig {
    fn default() -> Self {
        Self {
            number_of_cores: default_number_of_cores(),
        }
    }
}
