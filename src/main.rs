use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use crate::config::DeployConfig;
use crate::datastage::command::{DryRunner, SystemRunner};
use crate::datastage::stage::Tools;
use crate::deploy::{Paths, DEFAULT_BUILD_OUT, DEFAULT_TEMPLATE};
use crate::dsx::context::DeploymentContext;

mod config;
mod datastage;
mod deploy;
mod dsx;
mod error;

/// Render a DataStage job definition and deploy it with istool / dsjob
///
/// Connection details come from the environment: DS_DOMAIN, DS_USER, DS_PASS and DS_ASBHOST
/// are required. DS_PROJECT, EXPORT_DATE, EXPORT_TIME, JOB_NAME, SOURCE_PARAM, SOURCE_SQL,
/// TARGET_SCHEMA and TARGET_TABLE are optional.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Job definition template containing $NAME placeholders
    #[arg(long, default_value = DEFAULT_TEMPLATE)]
    template: PathBuf,

    /// Path the rendered .dsx is written to and imported from
    #[arg(long, default_value = DEFAULT_BUILD_OUT)]
    out: PathBuf,

    /// istool executable
    #[arg(long, default_value = "istool")]
    istool: String,

    /// dsjob executable
    #[arg(long, default_value = "dsjob")]
    dsjob: String,

    /// Render the template and log tool commands without running them
    #[arg(long)]
    dry_run: bool,

    /// Print template values as JSON and exit
    #[arg(long)]
    print_context: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = DeployConfig::from_env().context("Can't load deployment configuration")?;

    if args.print_context {
        let json = DeploymentContext::new(&config).to_json()?;
        println!("{json}");
        return Ok(());
    }

    let paths = Paths { template: args.template, out: args.out };
    let tools = Tools { istool: args.istool, dsjob: args.dsjob };

    let deployed = match args.dry_run {
        true => deploy::run(&config, &paths, &tools, &mut DryRunner),
        false => deploy::run(&config, &paths, &tools, &mut SystemRunner),
    };
    deployed.with_context(|| format!("Deployment of {}/{} failed", config.project, config.job_name))?;

    info!("Finished deploying {}", config.job_name);
    Ok(())
}
