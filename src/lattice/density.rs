// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Lattice density labels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strut-grid density. Higher density means a smaller grid step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Low,
    #[default]
    Medium,
    High,
}

impl Density {
    /// Grid step for this density
    pub fn element_size(self) -> f64 {
        match self {
            Density::Low => 1.0,
            Density::Medium => 0.5,
            Density::High => 0.25,
        }
    }

    /// Lenient lookup: unknown labels fall back to [`Density::Medium`]
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_else(|_| {
            tracing::debug!(label, "unknown flexure density, using medium");
            Density::default()
        })
    }
}

impl FromStr for Density {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Density::Low),
            "medium" => Ok(Density::Medium),
            "high" => Ok(Density::High),
            other => Err(format!("unknown density: {}", other)),
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Density::Low => "low",
            Density::Medium => "medium",
            Density::High => "high",
        };
        f.write_str(label)
    }
}

/// Element size for a density label, defaulting to 0.5
pub fn element_size_for(label: &str) -> f64 {
    Density::from_label(label).element_size()
}
