use std::fmt;
use std::process::Command;

use log::info;

use crate::error::ToolFailure;

static MASK: &str = "********";

/// A program and its arguments, with secret arguments masked whenever it's displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
    secrets: Vec<usize>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> ToolCommand {
        ToolCommand { program: program.into(), args: Vec::new(), secrets: Vec::new() }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> ToolCommand {
        self.args.push(arg.into());
        self
    }

    /// Append an argument that must never show up in logs or error messages
    pub fn secret_arg(mut self, arg: impl Into<String>) -> ToolCommand {
        self.secrets.push(self.args.len());
        self.arg(arg)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for (i, arg) in self.args.iter().enumerate() {
            match self.secrets.contains(&i) {
                true => write!(f, " {MASK}")?,
                false => write!(f, " {arg}")?,
            }
        }
        Ok(())
    }
}

/// Something that can execute a tool command to completion
pub trait ToolRunner {
    fn run(&mut self, command: &ToolCommand) -> Result<(), ToolFailure>;
}

/// Launch the real process and block until it exits
///
/// stdout and stderr are inherited, so tool output (e.g. `dsjob -jobinfo`) goes straight to
/// the terminal. No timeout is applied.
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&mut self, command: &ToolCommand) -> Result<(), ToolFailure> {
        info!("Running {command}");
        let status = Command::new(command.program())
            .args(command.args())
            .status()
            .map_err(ToolFailure::Launch)?;

        match status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(ToolFailure::Exit(code)),
            None => Err(ToolFailure::Signal),
        }
    }
}

/// Log commands instead of launching them (--dry-run)
pub struct DryRunner;

impl ToolRunner for DryRunner {
    fn run(&mut self, command: &ToolCommand) -> Result<(), ToolFailure> {
        info!("--dry-run set, not running {command}");
        Ok(())
    }
}
