//! HQC parameter sets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::testing::BuildMetadata;

/// Parameters of one HQC security level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariantParams {
    pub name: &'static str,
    /// Length of the ambient space, a prime.
    pub n: usize,
    pub security_bits: u32,
    /// Reed-Solomon length in GF(2^8) symbols.
    pub n1: usize,
    /// Reed-Solomon dimension.
    pub k: usize,
    /// Reed-Solomon correction capacity.
    pub delta: usize,
    /// Duplicated Reed-Muller length.
    pub n2: usize,
    /// Weight of the secret key vectors.
    pub omega: usize,
    /// Weight of the ephemeral vectors.
    pub omega_r: usize,
}

impl VariantParams {
    /// Length of the concatenated code, `n1 * n2 <= n`.
    #[must_use]
    pub const fn concatenated_len(&self) -> usize {
        self.n1 * self.n2
    }
}

const HQC_128: VariantParams = VariantParams {
    name: "HQC-128",
    n: 17_669,
    security_bits: 128,
    n1: 46,
    k: 16,
    delta: 15,
    n2: 384,
    omega: 66,
    omega_r: 75,
};

const HQC_192: VariantParams = VariantParams {
    name: "HQC-192",
    n: 35_851,
    security_bits: 192,
    n1: 56,
    k: 24,
    delta: 16,
    n2: 640,
    omega: 100,
    omega_r: 114,
};

const HQC_256: VariantParams = VariantParams {
    name: "HQC-256",
    n: 57_637,
    security_bits: 256,
    n1: 90,
    k: 32,
    delta: 29,
    n2: 640,
    omega: 131,
    omega_r: 149,
};

/// Security level under test.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Variant {
    #[default]
    #[serde(rename = "hqc-128")]
    #[value(name = "hqc-128")]
    Hqc128,
    #[serde(rename = "hqc-192")]
    #[value(name = "hqc-192")]
    Hqc192,
    #[serde(rename = "hqc-256")]
    #[value(name = "hqc-256")]
    Hqc256,
}

impl Variant {
    pub const ALL: [Self; 3] = [Self::Hqc128, Self::Hqc192, Self::Hqc256];

    #[must_use]
    pub const fn params(self) -> &'static VariantParams {
        match self {
            Self::Hqc128 => &HQC_128,
            Self::Hqc192 => &HQC_192,
            Self::Hqc256 => &HQC_256,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hqc128 => "hqc-128",
            Self::Hqc192 => "hqc-192",
            Self::Hqc256 => "hqc-256",
        }
    }

    /// Banner metadata for this variant.
    #[must_use]
    pub fn metadata(self) -> BuildMetadata {
        let params = self.params();
        BuildMetadata {
            name: Some(params.name.to_string()),
            size_parameter: Some(params.n as u64),
            security_bits: Some(params.security_bits),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    /// Accepts `hqc-128`, `HQC-128`, `hqc128` or just `128`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        match normalized.trim_start_matches("hqc") {
            "128" => Ok(Self::Hqc128),
            "192" => Ok(Self::Hqc192),
            "256" => Ok(Self::Hqc256),
            _ => Err(format!(
                "unknown variant '{s}' (expected hqc-128, hqc-192 or hqc-256)"
            )),
        }
    }
}
