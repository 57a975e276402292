/// Prompt printed before every line.
pub const DEFAULT_PROMPT: &str = "myShell> ";

/// Environment variable holding the log filter, checked before `RUST_LOG`.
pub const LOG_ENV: &str = "MYSHELL_LOG";

/// Log filter used when nothing else is configured.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    /// Read lines through the `rustyline` editor rather than plain stdin.
    pub line_editing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            line_editing: true,
        }
    }
}

impl Config {
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_line_editing(mut self, enabled: bool) -> Self {
        self.line_editing = enabled;
        self
    }
}

/// Pick the log filter: explicit flag, then [`LOG_ENV`], then `RUST_LOG`,
/// then [`DEFAULT_LOG_FILTER`].
pub fn log_filter(flag: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> String {
    flag.map(str::to_owned)
        .or_else(|| lookup(LOG_ENV))
        .or_else(|| lookup("RUST_LOG"))
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}
