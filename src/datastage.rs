//! Drive the DataStage command-line tools
//!
//! Import, compile, run and jobinfo are four blocking invocations of `istool` and `dsjob`.
//! The first one that fails ends the deployment, and earlier stages are never undone.

/// Command lines and the runners that execute them
pub mod command;

/// The fixed import -> compile -> run -> jobinfo sequence
pub mod stage;
