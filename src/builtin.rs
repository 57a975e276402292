use crate::env::Environment;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::fs::{self, DirBuilder};
use std::io::{self, Write};
use std::os::unix::fs::DirBuilderExt;

/// Conventional process exit code: 0 for success, anything else for failure.
pub type ExitCode = i32;

/// Erases the terminal and moves the cursor to the top-left corner.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in the interpreter's process, because they read or change session state.
/// Arguments are always positional; a built-in has no flags.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd".
    fn name() -> &'static str;

    /// Executes the command against the session.
    ///
    /// Missing arguments are reported on `stdout` with a non-zero code; OS failures
    /// are returned as errors and printed by the dispatcher.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

/// The built-in a command name refers to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Cd,
    History,
    Clear,
    Mkdir,
    Rmdir,
}

impl Builtin {
    pub const ALL: [Builtin; 6] = [
        Builtin::Exit,
        Builtin::Cd,
        Builtin::History,
        Builtin::Clear,
        Builtin::Mkdir,
        Builtin::Rmdir,
    ];

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Exit => Exit::name(),
            Builtin::Cd => Cd::name(),
            Builtin::History => History::name(),
            Builtin::Clear => Clear::name(),
            Builtin::Mkdir => Mkdir::name(),
            Builtin::Rmdir => Rmdir::name(),
        }
    }

    /// Parse `args` and run the built-in.
    ///
    /// Failures never escape as errors: usage problems and OS failures are
    /// written to `stderr` and turn into a non-zero code. Only a failure to
    /// write to the streams themselves is returned.
    pub fn run(
        self,
        args: &[String],
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> io::Result<ExitCode> {
        match self {
            Builtin::Exit => invoke::<Exit>(args, stdout, stderr, env),
            Builtin::Cd => invoke::<Cd>(args, stdout, stderr, env),
            Builtin::History => invoke::<History>(args, stdout, stderr, env),
            Builtin::Clear => invoke::<Clear>(args, stdout, stderr, env),
            Builtin::Mkdir => invoke::<Mkdir>(args, stdout, stderr, env),
            Builtin::Rmdir => invoke::<Rmdir>(args, stdout, stderr, env),
        }
    }
}

fn invoke<T: BuiltinCommand>(
    args: &[String],
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
    env: &mut Environment,
) -> io::Result<ExitCode> {
    // Every field is positional: a leading "--" keeps `help` and `-x` as names.
    let args: Vec<&str> = std::iter::once("--")
        .chain(args.iter().map(String::as_str))
        .collect();
    let command = match T::from_args(&[T::name()], &args) {
        Ok(command) => command,
        Err(EarlyExit { mut output, status }) => {
            if !output.ends_with('\n') {
                output.push('\n');
            }
            return match status {
                Ok(()) => stdout.write_all(output.as_bytes()).map(|_| 0),
                Err(()) => stderr.write_all(output.as_bytes()).map(|_| 1),
            };
        }
    };
    match command.execute(stdout, env) {
        Ok(code) => Ok(code),
        Err(e) => {
            writeln!(stderr, "{e:#}")?;
            Ok(1)
        }
    }
}

#[derive(FromArgs)]
/// Leave the shell.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
pub struct Cd {
    #[argh(positional, greedy)]
    /// directory to switch to, absolute or relative to the current directory; only the first one is used.
    pub args: Vec<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let Some(target) = self.args.first() else {
            writeln!(stdout, "cd: missing argument")?;
            return Ok(1);
        };
        env.change_dir(target).context("cd failed")?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Print every line entered in this session, numbered from 1.
pub struct History {
    #[argh(positional, greedy)]
    /// ignored.
    pub _args: Vec<String>,
}

impl BuiltinCommand for History {
    fn name() -> &'static str {
        "history"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        write!(stdout, "{}", env.history)?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Clear the terminal screen.
pub struct Clear {
    #[argh(positional, greedy)]
    /// ignored.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Clear {
    fn name() -> &'static str {
        "clear"
    }

    fn execute(self, stdout: &mut dyn Write, _env: &mut Environment) -> Result<ExitCode> {
        stdout.write_all(CLEAR_SCREEN.as_bytes())?;
        stdout.flush()?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Create a directory with mode 0755.
pub struct Mkdir {
    #[argh(positional, greedy)]
    /// directory to create; only the first one is used.
    pub args: Vec<String>,
}

impl BuiltinCommand for Mkdir {
    fn name() -> &'static str {
        "mkdir"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let Some(target) = self.args.first() else {
            writeln!(stdout, "mkdir: missing directory name")?;
            return Ok(1);
        };
        env.resolve(target)
            .and_then(|path| DirBuilder::new().mode(0o755).create(path))
            .context("mkdir failed")?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Remove an empty directory.
pub struct Rmdir {
    #[argh(positional, greedy)]
    /// directory to remove; only the first one is used.
    pub args: Vec<String>,
}

impl BuiltinCommand for Rmdir {
    fn name() -> &'static str {
        "rmdir"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let Some(target) = self.args.first() else {
            writeln!(stdout, "rmdir: missing directory name")?;
            return Ok(1);
        };
        env.resolve(target)
            .and_then(fs::remove_dir)
            .context("rmdir failed")?;
        Ok(0)
    }
}
