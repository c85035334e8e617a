//! Vessel CLI
//!
//! Run an application body against the desktop host without a device.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vessel_core::{Application, Runtime};
use vessel_platform::SaveStatePolicy;
use vessel_platform_desktop::DesktopHost;

mod config;
mod demo;
mod simulate;

use config::VesselConfig;
use demo::{DemoApp, DemoReport};

#[derive(Parser)]
#[command(name = "vessel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Vessel host simulator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./vessel.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive the demo application through a scripted lifecycle
    Run {
        /// Frames to render while active
        #[arg(short, long)]
        frames: Option<u32>,
    },

    /// Load a resource through the runtime and print its size
    Asset {
        /// Resource path, rooted at `/`
        path: String,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = VesselConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { frames } => cmd_run(config, frames).map(|_| ()),
        Commands::Asset { path } => cmd_asset(&config, &path).map(|len| println!("{}", len)),
        Commands::Config => cmd_config(&config),
    }
}

fn cmd_run(mut config: VesselConfig, frames: Option<u32>) -> Result<DemoReport> {
    if let Some(frames) = frames {
        config.demo.frames = frames;
    }

    let host = Arc::new(DesktopHost::new(config.host.clone()));
    info!(
        "Running demo for {} frames on {}x{} (assets in {})",
        config.demo.frames,
        config.demo.width,
        config.demo.height,
        host.asset_root().display()
    );

    let app = DemoApp::new(config.demo.resource.clone());
    let report = app.report();
    let runtime = Runtime::new(host, app, config.runtime.clone());

    let mut steps = simulate::script(config.demo.frames, config.demo.surface());
    if config.runtime.save_state == SaveStatePolicy::AfterHidden {
        steps = simulate::save_after_hidden(steps);
    }
    simulate::run(&runtime, &steps);

    info!("Finished in state {}", runtime.state());
    runtime.teardown();

    let report = report.lock().clone();
    info!(
        "{} hooks, {} frames, {} touches",
        report.hooks.len(),
        report.frames,
        report.touches.len()
    );
    Ok(report)
}

struct Idle;

impl Application for Idle {}

fn cmd_asset(config: &VesselConfig, path: &str) -> Result<usize> {
    let host = Arc::new(DesktopHost::new(config.host.clone()));
    let runtime = Runtime::new(host, Idle, config.runtime.clone());

    let handle = runtime
        .resources()
        .load(path)
        .with_context(|| format!("Failed to load {}", path))?;
    let len = runtime.resources().len(&handle).unwrap_or(0);
    runtime.resources().unload(handle);
    runtime.teardown();

    info!("{}: {} bytes", path, len);
    Ok(len)
}

fn cmd_config(config: &VesselConfig) -> Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}

#[cfg(test)]
mod tests;
