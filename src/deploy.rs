use std::path::PathBuf;

use log::info;

use crate::config::DeployConfig;
use crate::datastage::command::ToolRunner;
use crate::datastage::stage::{run_stages, Tools};
use crate::dsx::context::DeploymentContext;
use crate::dsx::render::render_dsx;
use crate::error::DeployError;

/// Template shipped with the crate
pub static DEFAULT_TEMPLATE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/cd_sales_payment_detail_template.dsx");
/// Where the rendered job definition is written before import
pub static DEFAULT_BUILD_OUT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/build/cd_sales_payment_detail.dsx");

/// Input template and rendered output locations
#[derive(Debug, Clone)]
pub struct Paths {
    pub template: PathBuf,
    pub out: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Paths { template: PathBuf::from(DEFAULT_TEMPLATE), out: PathBuf::from(DEFAULT_BUILD_OUT) }
    }
}

/// Render the job definition, then import, compile, run and query it
pub fn run<R: ToolRunner>(config: &DeployConfig, paths: &Paths, tools: &Tools, runner: &mut R) -> Result<(), DeployError> {
    let context = DeploymentContext::new(config);
    render_dsx(&paths.template, &paths.out, &context)?;

    run_stages(runner, config, tools, &paths.out)?;
    info!("Deployed {}/{} to {}", config.project, config.job_name, config.asb_host);
    Ok(())
}
