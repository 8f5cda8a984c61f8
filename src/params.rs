// Copyright 2019 Conflux Foundation. All rights reserved.
// Conflux is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::error::ConfigError;
use serde_derive::{Deserialize, Serialize};
use std::{fs, path::Path};

pub const TRANSACTION_BASE_FEE: u64 = 21_000;
pub const CONTRACT_CREATION_FEE: u64 = 200_000;
pub const ZERO_BYTE_FEE: u64 = 4;
pub const NON_ZERO_BYTE_FEE: u64 = 64;
pub const MAX_CALL_DEPTH: u32 = 128;

/// Parameters controlling the executor. Every field has a default, so a
/// configuration file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorParams {
    pub energy: EnergySchedule,
    pub max_call_depth: u32,
    /// Chain identifier expected by signed precompiled operations.
    pub chain_id: u8,
    pub create_failure_policy: CreateFailurePolicy,
    pub forks: ForkFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergySchedule {
    pub transaction_base_fee: u64,
    pub contract_creation_fee: u64,
    pub zero_byte_fee: u64,
    pub non_zero_byte_fee: u64,
    pub call_energy_limit: EnergyRange,
    pub create_energy_limit: EnergyRange,
}

/// Inclusive bounds on the energy limit of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyRange {
    pub min: u64,
    pub max: u64,
}

/// What a failed contract creation leaves behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateFailurePolicy {
    /// The created account and the value transfer are discarded.
    RevertAll,
    /// The created account keeps the transferred value but no code.
    KeepTransfer,
}

/// Activation switches of the precompiled contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForkFlags {
    pub ed_verify: bool,
    pub name_registry: bool,
}

impl Default for ExecutorParams {
    fn default() -> Self {
        ExecutorParams {
            energy: EnergySchedule::default(),
            max_call_depth: MAX_CALL_DEPTH,
            chain_id: 0,
            create_failure_policy: CreateFailurePolicy::default(),
            forks: ForkFlags::default(),
        }
    }
}

impl Default for EnergySchedule {
    fn default() -> Self {
        EnergySchedule {
            transaction_base_fee: TRANSACTION_BASE_FEE,
            contract_creation_fee: CONTRACT_CREATION_FEE,
            zero_byte_fee: ZERO_BYTE_FEE,
            non_zero_byte_fee: NON_ZERO_BYTE_FEE,
            call_energy_limit: EnergyRange::new(21_000, 2_000_000),
            create_energy_limit: EnergyRange::new(200_000, 5_000_000),
        }
    }
}

impl Default for CreateFailurePolicy {
    fn default() -> Self { CreateFailurePolicy::RevertAll }
}

impl Default for ForkFlags {
    fn default() -> Self {
        ForkFlags {
            ed_verify: true,
            name_registry: true,
        }
    }
}

impl EnergyRange {
    pub const fn new(min: u64, max: u64) -> Self { EnergyRange { min, max } }

    #[inline]
    pub fn contains(&self, limit: u64) -> bool {
        self.min <= limit && limit <= self.max
    }
}

impl ExecutorParams {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let params: ExecutorParams = toml::from_str(content)?;
        params.validate()?;
        Ok(params)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let params = Self::from_toml_str(&content)?;
        debug!("executor params loaded from {}: {:?}", path.display(), params);
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, range) in [
            ("call_energy_limit", &self.energy.call_energy_limit),
            ("create_energy_limit", &self.energy.create_energy_limit),
        ] {
            if range.min > range.max {
                return Err(ConfigError::InvalidRange {
                    name,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }

    pub fn energy_range(&self, is_create: bool) -> &EnergyRange {
        if is_create {
            &self.energy.create_energy_limit
        } else {
            &self.energy.call_energy_limit
        }
    }
}
