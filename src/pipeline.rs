//! Two-stage pipelines: `left | right`.
//!
//! One pipe connects the stages. The left stage is started first with its
//! standard output on the write end, then the right stage with its standard
//! input on the read end. The parent drops both ends before waiting, so the
//! right stage sees end-of-stream as soon as the left one is done, and it
//! reaps both children before returning.

use crate::builtin::Builtin;
use crate::env::Environment;
use crate::error::LaunchError;
use crate::external::{self, Reaper};
use std::io::{self, Write};
use std::process::Stdio;
use tracing::{debug, warn};

enum Stage<'a> {
    Empty,
    Builtin(Builtin, &'a [String]),
    External(&'a [String]),
}

impl<'a> Stage<'a> {
    fn classify(argv: &'a [String]) -> Self {
        match argv.split_first() {
            None => Stage::Empty,
            Some((name, args)) => match Builtin::from_name(name) {
                Some(builtin) => Stage::Builtin(builtin, args),
                None => Stage::External(argv),
            },
        }
    }
}

/// Run `left | right` and wait for both stages.
///
/// Built-in stages run against a [`subshell`](Environment::subshell) copy of
/// `env`: their output flows through the pipe like a program's would, but
/// `cd` and `exit` do not reach the interactive session. A stage that cannot
/// be started is reported on `stderr` and the other stage still runs.
pub fn launch_pipeline(
    left: &[String],
    right: &[String],
    env: &Environment,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<(), LaunchError> {
    let (reader, writer) = io::pipe().map_err(LaunchError::Pipe)?;
    let mut reader = Some(reader);
    let mut writer = Some(writer);
    // Output of a built-in left stage, delivered once the right stage is up.
    let mut pending = Vec::new();

    let mut left_child = match Stage::classify(left) {
        Stage::Empty => None,
        Stage::Builtin(builtin, args) => {
            run_builtin(builtin, args, &mut pending, stderr, env);
            None
        }
        Stage::External(argv) => {
            let pipe_in = writer.take().map_or_else(Stdio::null, Stdio::from);
            start(argv, env, Stdio::inherit(), pipe_in, stderr)
        }
    };
    if pending.is_empty() {
        drop(writer.take());
    }

    let mut right_child = match Stage::classify(right) {
        Stage::Empty => None,
        Stage::Builtin(builtin, args) => {
            run_builtin(builtin, args, stdout, stderr, env);
            None
        }
        Stage::External(argv) => {
            if let Err(e) = stdout.flush() {
                debug!(error = %e, "flushing stdout before the right stage");
            }
            let pipe_out = reader.take().map_or_else(Stdio::null, Stdio::from);
            start(argv, env, pipe_out, Stdio::inherit(), stderr)
        }
    };
    drop(reader.take());

    if let Some(mut writer) = writer.take() {
        if let Err(e) = writer.write_all(&pending) {
            debug!(error = %e, "right stage stopped reading before built-in output was delivered");
        }
    }

    if let Some(child) = left_child.as_mut() {
        child.wait().map_err(LaunchError::Wait)?;
    }
    if let Some(child) = right_child.as_mut() {
        child.wait().map_err(LaunchError::Wait)?;
    }
    Ok(())
}

fn start(
    argv: &[String],
    env: &Environment,
    stdin: Stdio,
    stdout: Stdio,
    stderr: &mut dyn Write,
) -> Option<Reaper> {
    match external::spawn(argv, env, stdin, stdout) {
        Ok(child) => Some(child),
        Err(e) => {
            let e = anyhow::Error::from(e);
            if let Err(write_err) = writeln!(stderr, "{e:#}") {
                warn!(error = %write_err, launch_error = %e, "could not report launch failure");
            }
            None
        }
    }
}

fn run_builtin(
    builtin: Builtin,
    args: &[String],
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
    env: &Environment,
) {
    let mut subshell = env.subshell();
    if let Err(e) = builtin.run(args, stdout, stderr, &mut subshell) {
        debug!(builtin = builtin.name(), error = %e, "built-in pipeline stage could not write");
    }
}
