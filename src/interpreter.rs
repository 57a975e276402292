use crate::config::Config;
use crate::env::Environment;
use crate::external;
use crate::io_adapters::{LineSource, ReadOutcome};
use crate::pipeline;
use crate::plan::{self, Plan};
use std::io::{self, Write};
use tracing::debug;

/// A minimal shell-like interpreter for built-ins and external commands.
///
/// The interpreter owns the session [`Environment`] (working directory,
/// history, exit flag). Each line is planned with [`plan::build`] and either
/// handled in-process or handed to the launcher or the pipeline orchestrator;
/// both block until their children are reaped.
///
/// Example
/// ```no_run
/// use myshell::{Config, Interpreter};
/// let mut sh = Interpreter::new(Config::default());
/// sh.execute_line("mkdir build", &mut std::io::stdout(), &mut std::io::stderr()).unwrap();
/// ```
pub struct Interpreter {
    env: Environment,
    config: Config,
}

impl Interpreter {
    /// An interpreter bound to the process working directory.
    pub fn new(config: Config) -> Self {
        Self::with_environment(Environment::new(), config)
    }

    pub fn with_environment(env: Environment, config: Config) -> Self {
        Self { env, config }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Whether `exit` has been run.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Record `line` in the history and run it.
    ///
    /// Built-in output and diagnostics go to `stdout`/`stderr`; external
    /// programs inherit the process's own standard streams. Command failures
    /// are reported and swallowed. The only error returned is a failure to
    /// write to `stdout` or `stderr`.
    pub fn execute_line(
        &mut self,
        line: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> io::Result<()> {
        self.env.history.push(line);
        let plan = plan::build(line);
        debug!(?plan, "planned");

        match plan {
            Plan::Empty => {}
            Plan::Exit => self.env.should_exit = true,
            Plan::Builtin { builtin, args } => {
                builtin.run(&args, stdout, stderr, &mut self.env)?;
            }
            Plan::External { argv, output } => {
                stdout.flush()?;
                if let Err(e) = external::launch(&argv, output.as_deref(), &self.env) {
                    writeln!(stderr, "{:#}", anyhow::Error::from(e))?;
                }
            }
            Plan::Piped { left, right } => {
                stdout.flush()?;
                if let Err(e) = pipeline::launch_pipeline(&left, &right, &self.env, stdout, stderr)
                {
                    writeln!(stderr, "{:#}", anyhow::Error::from(e))?;
                }
            }
        }
        stdout.flush()
    }

    /// Read-eval loop: prompt, read, execute, until `exit` or end of input.
    pub fn repl(
        &mut self,
        source: &mut dyn LineSource,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> anyhow::Result<()> {
        while !self.env.should_exit {
            match source.read_line(&self.config.prompt)? {
                ReadOutcome::Line(line) => self.execute_line(&line, stdout, stderr)?,
                ReadOutcome::Interrupted => continue,
                ReadOutcome::Eof => {
                    debug!("end of input");
                    break;
                }
            }
        }
        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
