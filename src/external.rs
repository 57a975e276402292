use crate::env::Environment;
use crate::error::LaunchError;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use tracing::{debug, warn};

/// Search path used when `PATH` is not set.
const DEFAULT_SEARCH_PATH: &str = "/bin:/usr/bin";

/// A spawned child that is always reaped.
///
/// [`Reaper::wait`] blocks until the child exits. If the handle is dropped
/// without waiting (an early return, a failed sibling), `Drop` waits instead,
/// so no path leaves a zombie behind. The status is collected from the OS only
/// once; later waits return the cached value.
#[derive(Debug)]
pub struct Reaper {
    program: String,
    child: Child,
}

impl Reaper {
    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn wait(&mut self) -> io::Result<ExitStatus> {
        let status = self.child.wait()?;
        debug!(pid = self.child.id(), program = %self.program, %status, "child reaped");
        Ok(status)
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        if let Err(e) = self.child.wait() {
            warn!(pid = self.child.id(), program = %self.program, error = %e, "failed to reap child");
        }
    }
}

/// Start `argv[0]` with the remaining fields as its arguments.
///
/// The program sees `argv[0]` as its argument zero, inherits the process
/// environment and runs in the session working directory. The `Command` is
/// dropped before returning, so the parent keeps no copy of `stdin`/`stdout`.
pub fn spawn(
    argv: &[String],
    env: &Environment,
    stdin: Stdio,
    stdout: Stdio,
) -> Result<Reaper, LaunchError> {
    let Some((program, args)) = argv.split_first() else {
        return Err(LaunchError::NotFound(String::new()));
    };
    let search_paths = std::env::var_os("PATH");
    let search_paths = search_paths
        .as_deref()
        .unwrap_or(OsStr::new(DEFAULT_SEARCH_PATH));
    let executable = find_command_path(search_paths, &env.current_dir, Path::new(program))
        .ok_or_else(|| LaunchError::NotFound(program.clone()))?;

    let child = Command::new(&*executable)
        .arg0(program)
        .args(args)
        .current_dir(&env.current_dir)
        .stdin(stdin)
        .stdout(stdout)
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            program: program.clone(),
            source,
        })?;
    debug!(pid = child.id(), program = %program, "child spawned");

    Ok(Reaper {
        program: program.clone(),
        child,
    })
}

/// Run one external command to completion.
///
/// With `output` set, the child's standard output goes to that file (created or
/// truncated, mode 0644). The exit status is not propagated.
pub fn launch(
    argv: &[String],
    output: Option<&str>,
    env: &Environment,
) -> Result<(), LaunchError> {
    if argv.is_empty() {
        return Ok(());
    }
    let stdout = match output {
        Some(target) => Stdio::from(open_redirect(env, target)?),
        None => Stdio::inherit(),
    };
    let mut child = spawn(argv, env, Stdio::inherit(), stdout)?;
    child.wait().map_err(LaunchError::Wait)?;
    Ok(())
}

/// Open a redirect target for writing: create if absent, truncate if present.
pub fn open_redirect(env: &Environment, target: &str) -> Result<File, LaunchError> {
    let path = env.resolve(target).map_err(|source| LaunchError::Redirect {
        path: PathBuf::from(target),
        source,
    })?;
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o644)
        .open(&path)
        .map_err(|source| LaunchError::Redirect { path, source })
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it names an executable file.
/// - Any path containing a separator (`bin/sh`, `./foo`): resolved against `cwd`.
/// - Single path component: search each directory in `search_paths` (PATH)
///   and return the first executable match.
/// - Empty path: returns `None`.
pub fn find_command_path<'a>(
    search_paths: &OsStr,
    cwd: &Path,
    path: &'a Path,
) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(x), None) => find_in_path(search_paths, cwd, x.as_os_str()).map(Cow::Owned),
        _ => {
            let joined = cwd.join(path);
            find_by_path(&joined).map(|p| Cow::Owned(p.to_owned()))
        }
    }
}

fn find_in_path(search_paths: &OsStr, cwd: &Path, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| cwd.join(dir).join(cmd))
        .find(|path| find_by_path(path).is_some())
}

fn find_by_path(path: &Path) -> Option<&Path> {
    let metadata = path.metadata().ok()?;
    if metadata.is_file() && metadata.permissions().mode() & 0o111 != 0 {
        Some(path)
    } else {
        None
    }
}
