use crate::history::History;
use std::env as stdenv;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Session state shared by the interpreter and its built-ins.
///
/// The environment contains:
/// - `current_dir`: the working directory used for built-ins, redirect targets
///   and spawned programs.
/// - `history`: every line read in this session.
/// - `should_exit`: set by `exit`; the read loop stops once it is true.
///
/// An environment either owns the process working directory (the interactive
/// session) or is detached from it (pipeline subshells, tests). A detached
/// environment tracks `cd` in `current_dir` only.
#[derive(Debug, Clone)]
pub struct Environment {
    pub current_dir: PathBuf,
    pub history: History,
    pub should_exit: bool,
    owns_process_cwd: bool,
}

impl Environment {
    /// Capture the working directory of the current process.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            current_dir,
            history: History::new(),
            should_exit: false,
            owns_process_cwd: true,
        }
    }

    /// An environment rooted at `current_dir` that never touches the process
    /// working directory.
    pub fn detached(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            current_dir: current_dir.into(),
            history: History::new(),
            should_exit: false,
            owns_process_cwd: false,
        }
    }

    /// A throwaway copy for a built-in running as a pipeline stage.
    ///
    /// Changes made through the copy (`cd`, `exit`) are not seen by `self`.
    pub fn subshell(&self) -> Self {
        Self {
            current_dir: self.current_dir.clone(),
            history: self.history.clone(),
            should_exit: false,
            owns_process_cwd: false,
        }
    }

    /// Resolve a user-supplied path against `current_dir`.
    ///
    /// An empty path names nothing, like it does for the OS path calls.
    pub fn resolve(&self, target: &str) -> io::Result<PathBuf> {
        if target.is_empty() {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        Ok(self.current_dir.join(target))
    }

    /// Change the working directory to `target`.
    pub fn change_dir(&mut self, target: &str) -> io::Result<()> {
        let canonical = fs::canonicalize(self.resolve(target)?)?;
        if !canonical.is_dir() {
            return Err(io::Error::from(io::ErrorKind::NotADirectory));
        }
        if self.owns_process_cwd {
            stdenv::set_current_dir(&canonical)?;
        }
        self.current_dir = canonical;
        Ok(())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lock_current_dir;
    use tempfile::TempDir;

    #[test]
    fn test_detached_change_dir_leaves_process_cwd() {
        let _lock = lock_current_dir();
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        let before = stdenv::current_dir().unwrap();

        let mut env = Environment::detached(tmp.path());
        env.change_dir("sub").unwrap();

        assert_eq!(env.current_dir, fs::canonicalize(tmp.path().join("sub")).unwrap());
        assert_eq!(stdenv::current_dir().unwrap(), before);
    }

    #[test]
    fn test_change_dir_rejects_missing_and_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("file"), "x").unwrap();
        let mut env = Environment::detached(tmp.path());

        let missing = env.change_dir("nope").unwrap_err();
        assert_eq!(missing.kind(), io::ErrorKind::NotFound);
        let file = env.change_dir("file").unwrap_err();
        assert_eq!(file.kind(), io::ErrorKind::NotADirectory);
        assert_eq!(env.current_dir, tmp.path());
    }

    #[test]
    fn test_empty_target_is_not_found() {
        let env = Environment::detached("/");
        assert_eq!(env.resolve("").unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_subshell_is_detached_copy() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        let mut env = Environment::detached(tmp.path());
        env.history.push("ls");

        let mut sub = env.subshell();
        sub.change_dir("sub").unwrap();
        sub.should_exit = true;
        sub.history.push("cd sub");

        assert_eq!(env.current_dir, tmp.path());
        assert!(!env.should_exit);
        assert_eq!(env.history.len(), 1);
    }
}
