use anyhow::Result;
use argh::FromArgs;
use myshell::Interpreter;
use myshell::config::{self, Config};
use myshell::io_adapters::{EditorSource, PlainSource};
use std::env;
use std::io::{self, IsTerminal};
use tracing::debug;

#[derive(FromArgs)]
/// Interactive shell with built-ins, one two-stage pipe and output redirection.
struct Args {
    #[argh(option)]
    /// prompt printed before each line (default: "myShell> ").
    prompt: Option<String>,

    #[argh(switch)]
    /// read plain lines from standard input even when it is a terminal.
    plain: bool,

    #[argh(option)]
    /// log filter such as "debug"; overrides MYSHELL_LOG and RUST_LOG.
    log: Option<String>,
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();

    let filter = config::log_filter(args.log.as_deref(), |key| env::var(key).ok());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(io::stderr)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let mut config = Config::default().with_line_editing(!args.plain && io::stdin().is_terminal());
    if let Some(prompt) = args.prompt {
        config = config.with_prompt(prompt);
    }
    debug!(?config, "starting");

    let line_editing = config.line_editing;
    let mut shell = Interpreter::new(config);
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    if line_editing {
        let mut source = EditorSource::new()?;
        shell.repl(&mut source, &mut stdout, &mut stderr)?;
    } else {
        let mut source = PlainSource::new(io::stdin().lock(), io::stdout());
        shell.repl(&mut source, &mut stdout, &mut stderr)?;
    }
    Ok(())
}
