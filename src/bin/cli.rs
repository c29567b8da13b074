// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyframe Compute CLI

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use polyframe_compute::cli::Reporter;
use polyframe_compute::compute::{ComputeError, GeometryClient, HttpComputeClient, InMemoryKernel};
use polyframe_compute::config::ComputeConfig;
use polyframe_compute::io::ExportError;
use polyframe_compute::service::{
    BrepToMeshParams, ExportParams, MeshParams, MeshService, ServiceError, SphereParams,
    TransformParams,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "polyframe-compute")]
#[command(about = "Polyframe Compute - lattice flexures and mesh export over a remote CAD kernel", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./compute.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for written files
    #[arg(short, long, global = true, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Run against the in-memory kernel instead of a compute server
    #[arg(long, global = true)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build, mesh and export a mesh request
    Mesh {
        /// JSON request file, `-` for stdin
        request: PathBuf,
    },

    /// Create a sphere Brep
    Sphere {
        #[arg(short, long)]
        radius: f64,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        center_x: f64,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        center_y: f64,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        center_z: f64,
    },

    /// Scale and rotate an encoded Brep
    Transform {
        /// File holding the encoded Brep, `-` for stdin
        brep: PathBuf,

        #[arg(short, long, default_value_t = 1.0)]
        scale: f64,

        /// Rotation about +Z in degrees
        #[arg(short = 'r', long, default_value_t = 0.0, allow_hyphen_values = true)]
        rotation_degrees: f64,
    },

    /// Mesh an encoded Brep
    Convert {
        /// File holding the encoded Brep, `-` for stdin
        brep: PathBuf,
    },

    /// Export an encoded Brep to obj or 3dm
    Export {
        /// File holding the encoded Brep, `-` for stdin
        brep: PathBuf,

        /// Output format (obj, 3dm)
        #[arg(short, long, default_value = "obj")]
        format: String,
    },

    /// Check the compute server
    Health,

    /// Solve a Grasshopper definition
    RunDefinition {
        /// Definition pointer or encoded definition
        definition: String,

        /// Input as NAME=VALUE, repeatable
        #[arg(short, long = "input", value_name = "NAME=VALUE")]
        inputs: Vec<String>,
    },

    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            Reporter::report_error(&format!("{:#}", err));
            exit_code_for(&err)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// 2 for bad input, 1 for everything else
fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    let client = if let Some(e) = err.downcast_ref::<ServiceError>() {
        e.is_client_error()
    } else if let Some(e) = err.downcast_ref::<ComputeError>() {
        e.is_client_error()
    } else if let Some(e) = err.downcast_ref::<ExportError>() {
        e.is_client_error()
    } else {
        err.downcast_ref::<serde_json::Error>().is_some()
            || err.downcast_ref::<InputError>().is_some()
    };

    if client {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

/// Unreadable or malformed command line input
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct InputError(String);

fn run(cli: &Cli) -> Result<()> {
    if let Commands::Version = cli.command {
        println!("Polyframe Compute v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config = ComputeConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }

    if cli.dry_run {
        Reporter::report_info("Dry run: using the in-memory kernel");
        let kernel = InMemoryKernel::new();
        let service = MeshService::from_config(&kernel, &config);
        execute(cli, &service)?;
        if cli.verbose {
            Reporter::report_call_log(&kernel.calls());
        }
        return Ok(());
    }

    let client = HttpComputeClient::from_config(&config)
        .context("Invalid compute server configuration")?;

    match &cli.command {
        Commands::Health => {
            let body = client.health_check()?;
            print_json(&serde_json::json!({ "status": "healthy", "details": body }))
        }
        Commands::RunDefinition { definition, inputs } => {
            let inputs = parse_inputs(inputs)?;
            let result = client.run_definition(definition, &inputs)?;
            print_json(&result)
        }
        _ => {
            let service = MeshService::from_config(client, &config);
            execute(cli, &service)
        }
    }
}

/// Commands that go through the mesh service
fn execute<C: GeometryClient>(cli: &Cli, service: &MeshService<C>) -> Result<()> {
    match &cli.command {
        Commands::Mesh { request } => {
            let text = read_input(request)?;
            let params: MeshParams = serde_json::from_str(&text)
                .with_context(|| format!("Invalid mesh request {}", request.display()))?;

            let start = Instant::now();
            let artifacts = service.create_mesh(&params)?;
            if cli.verbose {
                Reporter::report_artifacts(&artifacts, start.elapsed());
            }
            print_json(&artifacts)
        }
        Commands::Sphere {
            radius,
            center_x,
            center_y,
            center_z,
        } => print_json(&service.create_sphere(&SphereParams {
            radius: *radius,
            center_x: *center_x,
            center_y: *center_y,
            center_z: *center_z,
        })?),
        Commands::Transform {
            brep,
            scale,
            rotation_degrees,
        } => print_json(&service.transform_geometry(&TransformParams {
            brep_str: read_input(brep)?.trim().to_string(),
            scale: *scale,
            rotation_degrees: *rotation_degrees,
        })?),
        Commands::Convert { brep } => print_json(&service.convert_to_mesh(&BrepToMeshParams {
            brep_str: read_input(brep)?.trim().to_string(),
        })?),
        Commands::Export { brep, format } => {
            let response = service.export_geometry(&ExportParams {
                brep_str: read_input(brep)?.trim().to_string(),
                format: format.to_lowercase(),
            })?;
            if cli.verbose {
                Reporter::success(&format!("Wrote {}", response.file_path.display()));
            }
            print_json(&response)
        }
        Commands::Health => {
            print_json(&serde_json::json!({ "status": "healthy", "details": "in-memory kernel" }))
        }
        Commands::RunDefinition { .. } => {
            bail!("run-definition needs a compute server; drop --dry-run")
        }
        Commands::Version => Ok(()),
    }
}

fn read_input(path: &Path) -> Result<String> {
    let mut text = String::new();
    if path == Path::new("-") {
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| InputError(format!("Failed to read stdin: {}", e)))?;
    } else {
        text = std::fs::read_to_string(path)
            .map_err(|e| InputError(format!("Failed to read {}: {}", path.display(), e)))?;
    }
    Ok(text)
}

fn parse_inputs(inputs: &[String]) -> Result<BTreeMap<String, Value>> {
    inputs
        .iter()
        .map(|pair| {
            let (name, value) = pair
                .split_once('=')
                .ok_or_else(|| anyhow!(InputError(format!("Expected NAME=VALUE, got '{}'", pair))))?;
            Ok((name.to_string(), Value::String(value.to_string())))
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
