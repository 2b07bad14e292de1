use super::index::IndexPolicy;
use super::ucb::Ucb;
use super::ucbv::UcbV;

use crate::errors::{PolicyError, RegistryError};

use serde::Deserialize;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyKind {
    Ucb,
    UcbV,
}

impl PolicyKind {
    pub fn build(
        self,
        nb_arms: usize,
        params: &PolicyParams,
    ) -> Result<Box<dyn IndexPolicy>, PolicyError> {
        let PolicyParams {
            lower,
            amplitude,
            seed,
        } = *params;

        Ok(match self {
            PolicyKind::Ucb => Box::new(Ucb::new(nb_arms, lower, amplitude, seed)?),
            PolicyKind::UcbV => Box::new(UcbV::new(nb_arms, lower, amplitude, seed)?),
        })
    }
}

impl FromStr for PolicyKind {
    type Err = RegistryError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "UCB" | "Ucb" => Ok(PolicyKind::Ucb),
            "UCBV" | "UCB-V" | "UcbV" => Ok(PolicyKind::UcbV),
            _ => Err(RegistryError::UnknownPolicy(name.to_string())),
        }
    }
}

/// Parameters shared by every index policy. Unknown keys are rejected.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PolicyParams {
    #[serde(default)]
    pub lower: f64,
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_amplitude() -> f64 {
    1.0
}

impl Default for PolicyParams {
    fn default() -> Self {
        Self {
            lower: 0.0,
            amplitude: default_amplitude(),
            seed: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PolicyConfig {
    pub archtype: String,
    #[serde(default)]
    pub params: PolicyParams,
}

impl PolicyConfig {
    pub fn kind(&self) -> Result<PolicyKind, RegistryError> {
        self.archtype.parse()
    }

    pub fn build(&self, nb_arms: usize) -> Result<Box<dyn IndexPolicy>, RegistryError> {
        Ok(self.kind()?.build(nb_arms, &self.params)?)
    }
}
