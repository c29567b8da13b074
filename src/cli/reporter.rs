// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting
//!
//! Everything goes to stderr; stdout carries the JSON result.

use crate::compute::CallLog;
use crate::service::MeshArtifacts;
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report the files written for a mesh request
    pub fn report_artifacts(artifacts: &MeshArtifacts, duration: Duration) {
        eprintln!("\n{}", "━".repeat(80).bright_black());
        eprintln!("{} {}", "✅".green(), artifacts.message.green().bold());
        eprintln!("{}", "━".repeat(80).bright_black());
        eprintln!(
            "  {} {}",
            "OBJ:".bright_black(),
            artifacts.obj_file_path.display().to_string().cyan()
        );
        eprintln!(
            "  {} {}",
            "Scene:".bright_black(),
            artifacts.rhino_file_path.display().to_string().cyan()
        );
        eprintln!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        eprintln!("{}", "━".repeat(80).bright_black());
    }

    /// Summarise the kernel calls a dry run would have made
    pub fn report_call_log(log: &CallLog) {
        eprintln!("\n{}", "Kernel round trips (dry run):".bold());
        eprintln!(
            "  {} {} ({} struts)",
            "Builds:".bright_black(),
            log.primitives.len().to_string().cyan(),
            log.cylinders().count()
        );
        eprintln!(
            "  {} {}",
            "Splits:".bright_black(),
            log.splits.len().to_string().cyan()
        );
        eprintln!(
            "  {} {}",
            "Joins:".bright_black(),
            log.joins.len().to_string().cyan()
        );
        eprintln!(
            "  {} {}",
            "Meshes:".bright_black(),
            log.meshes.to_string().cyan()
        );
        eprintln!(
            "  {} {}",
            "Total:".bright_black(),
            log.round_trips().to_string().yellow()
        );
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        eprintln!("{} {}", "ℹ️".bright_blue(), message);
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }

    /// Print success message
    pub fn success(message: &str) {
        eprintln!("{} {}", "✅".green(), message.green());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(
            Reporter::format_duration(Duration::from_micros(500)),
            "500µs"
        );
        assert_eq!(
            Reporter::format_duration(Duration::from_millis(5)),
            "5.00ms"
        );
        assert_eq!(Reporter::format_duration(Duration::from_secs(2)), "2.00s");
    }
}
