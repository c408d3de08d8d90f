use std::fmt;
use std::path::Path;

use log::{info, warn};

use crate::config::DeployConfig;
use crate::datastage::command::{ToolCommand, ToolRunner};
use crate::error::DeployError;

/// Program names for the two DataStage clients
///
/// Defaults to whatever `istool` and `dsjob` resolve to on `PATH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    pub istool: String,
    pub dsjob: String,
}

impl Default for Tools {
    fn default() -> Self {
        Tools { istool: "istool".to_string(), dsjob: "dsjob".to_string() }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    Import,
    Compile,
    Run,
    JobInfo,
}

impl Stage {
    /// Execution order, each stage only runs if the previous one succeeded
    pub const ALL: [Stage; 4] = [Stage::Import, Stage::Compile, Stage::Run, Stage::JobInfo];

    /// Build the command line for this stage
    ///
    /// `archive` is the rendered `.dsx` that import registers (with -overwrite). The run stage
    /// passes no job parameters, so the job does a full load.
    pub fn command(&self, config: &DeployConfig, tools: &Tools, archive: &Path) -> ToolCommand {
        match self {
            Stage::Import => ToolCommand::new(&tools.istool)
                .arg("import")
                .arg("-dom")
                .arg(&config.domain)
                .arg("-u")
                .arg(&config.user)
                .arg("-p")
                .secret_arg(&config.password)
                .arg("-archive")
                .arg(archive.display().to_string())
                .arg("-overwrite"),
            Stage::Compile => login(&tools.dsjob, None, config)
                .arg("-compile")
                .arg(&config.project)
                .arg(&config.job_name),
            Stage::Run => login(&tools.dsjob, Some("-run"), config)
                .arg(&config.project)
                .arg(&config.job_name),
            Stage::JobInfo => login(&tools.dsjob, Some("-jobinfo"), config)
                .arg(&config.project)
                .arg(&config.job_name),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stage::Import => write!(f, "import"),
            Stage::Compile => write!(f, "compile"),
            Stage::Run => write!(f, "run"),
            Stage::JobInfo => write!(f, "jobinfo"),
        }
    }
}

/// `dsjob [action] -server <host> -user <user> -password <password>`
fn login(dsjob: &str, action: Option<&str>, config: &DeployConfig) -> ToolCommand {
    let mut command = ToolCommand::new(dsjob);
    if let Some(action) = action {
        command = command.arg(action);
    }
    command
        .arg("-server")
        .arg(&config.asb_host)
        .arg("-user")
        .arg(&config.user)
        .arg("-password")
        .secret_arg(&config.password)
}

/// Run every stage in order, stopping at the first failure
pub fn run_stages<R: ToolRunner>(runner: &mut R, config: &DeployConfig, tools: &Tools, archive: &Path) -> Result<(), DeployError> {
    for stage in Stage::ALL {
        let command = stage.command(config, tools, archive);
        info!("Starting {stage} stage for {}/{}", config.project, config.job_name);

        if let Err(failure) = runner.run(&command) {
            warn!("{stage} stage failed ({failure}), skipping remaining stages");
            return Err(DeployError::ExternalTool { stage, failure });
        }

        info!("{stage} stage succeeded");
    }
    Ok(())
}

#[cfg(test)]
pub mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::ToolFailure;

    /// Records every command it sees and fails the configured stage
    pub struct RecordingRunner {
        pub calls: Vec<ToolCommand>,
        fail_at: Option<(usize, i32)>,
    }

    impl RecordingRunner {
        pub fn new() -> RecordingRunner {
            RecordingRunner { calls: Vec::new(), fail_at: None }
        }

        /// Fail the nth invocation (0-based) with the given exit code
        pub fn failing(call: usize, code: i32) -> RecordingRunner {
            RecordingRunner { calls: Vec::new(), fail_at: Some((call, code)) }
        }

        pub fn programs(&self) -> Vec<&str> {
            self.calls.iter().map(|c| c.program()).collect()
        }
    }

    impl ToolRunner for RecordingRunner {
        fn run(&mut self, command: &ToolCommand) -> Result<(), ToolFailure> {
            let call = self.calls.len();
            self.calls.push(command.clone());
            match self.fail_at {
                Some((n, code)) if n == call => Err(ToolFailure::Exit(code)),
                _ => Ok(()),
            }
        }
    }

    pub fn config() -> DeployConfig {
        DeployConfig::from_lookup(|key| match key {
            "DS_DOMAIN" => Some("host:9080".to_string()),
            "DS_USER" => Some("u".to_string()),
            "DS_PASS" => Some("p".to_string()),
            "DS_ASBHOST" => Some("asb1".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn archive() -> PathBuf {
        PathBuf::from("build/cd_sales_payment_detail.dsx")
    }

    #[test]
    fn import_command_line() {
        let command = Stage::Import.command(&config(), &Tools::default(), &archive());
        assert_eq!(command.program(), "istool");
        assert_eq!(
            command.args(),
            ["import", "-dom", "host:9080", "-u", "u", "-p", "p", "-archive", "build/cd_sales_payment_detail.dsx", "-overwrite"]
        );
    }

    #[test]
    fn dsjob_command_lines() {
        let config = config();
        let tools = Tools::default();

        let compile = Stage::Compile.command(&config, &tools, &archive());
        assert_eq!(compile.program(), "dsjob");
        assert_eq!(
            compile.args(),
            ["-server", "asb1", "-user", "u", "-password", "p", "-compile", "BIDW_ADM", "DM_SP_SL_PAY_D_LOAD"]
        );

        let run = Stage::Run.command(&config, &tools, &archive());
        assert_eq!(
            run.args(),
            ["-run", "-server", "asb1", "-user", "u", "-password", "p", "BIDW_ADM", "DM_SP_SL_PAY_D_LOAD"]
        );

        let info = Stage::JobInfo.command(&config, &tools, &archive());
        assert_eq!(
            info.args(),
            ["-jobinfo", "-server", "asb1", "-user", "u", "-password", "p", "BIDW_ADM", "DM_SP_SL_PAY_D_LOAD"]
        );
    }

    #[test]
    fn password_is_masked_in_every_stage() {
        let mut config = config();
        config.password = "s3cret".to_string();
        for stage in Stage::ALL {
            let shown = stage.command(&config, &Tools::default(), &archive()).to_string();
            assert!(!shown.contains("s3cret"), "{stage}: {shown}");
        }
    }

    #[test]
    fn tool_overrides_change_program_names() {
        let tools = Tools { istool: "/opt/IBM/InformationServer/Clients/istools/cli/istool.sh".to_string(), dsjob: "/opt/dsjob".to_string() };
        assert_eq!(Stage::Import.command(&config(), &tools, &archive()).program(), tools.istool);
        assert_eq!(Stage::JobInfo.command(&config(), &tools, &archive()).program(), "/opt/dsjob");
    }

    #[test]
    fn stages_run_in_order() {
        let mut runner = RecordingRunner::new();
        run_stages(&mut runner, &config(), &Tools::default(), &archive()).unwrap();

        assert_eq!(runner.programs(), ["istool", "dsjob", "dsjob", "dsjob"]);
        assert_eq!(runner.calls[1].args()[6], "-compile");
        assert_eq!(runner.calls[2].args()[0], "-run");
        assert_eq!(runner.calls[3].args()[0], "-jobinfo");
    }

    #[test]
    fn failed_import_skips_everything_else() {
        let mut runner = RecordingRunner::failing(0, 1);
        let result = run_stages(&mut runner, &config(), &Tools::default(), &archive());

        assert!(matches!(result, Err(DeployError::ExternalTool { stage: Stage::Import, failure: ToolFailure::Exit(1) })));
        assert_eq!(runner.calls.len(), 1);
    }

    #[test]
    fn failed_run_skips_jobinfo() {
        let mut runner = RecordingRunner::failing(2, 255);
        let result = run_stages(&mut runner, &config(), &Tools::default(), &archive());

        match result {
            Err(err @ DeployError::ExternalTool { stage: Stage::Run, .. }) => {
                assert_eq!(err.to_string(), "run stage failed: exited with status 255")
            }
            other => panic!("expected run failure, got {other:?}"),
        }
        assert_eq!(runner.calls.len(), 3);
    }
}
