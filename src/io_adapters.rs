use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, BufRead, Write};
use tracing::warn;

/// What a single read from a [`LineSource`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// One line, without its line terminator.
    Line(String),
    /// The user interrupted the line (Ctrl-C at the prompt).
    Interrupted,
    /// No more input.
    Eof,
}

/// Where the read loop gets its lines from.
pub trait LineSource {
    /// Show `prompt` and read one line.
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome>;
}

/// Interactive terminal input with line editing and recall, via `rustyline`.
pub struct EditorSource {
    editor: DefaultEditor,
}

impl EditorSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        let outcome = editor_outcome(self.editor.readline(prompt))?;
        if let ReadOutcome::Line(line) = &outcome {
            self.editor.add_history_entry(line.as_str())?;
        }
        Ok(outcome)
    }
}

fn editor_outcome(read: rustyline::Result<String>) -> Result<ReadOutcome> {
    match read {
        Ok(line) => Ok(ReadOutcome::Line(line)),
        Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
        Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
        // The editor drops the whole line when a key sequence is not UTF-8.
        Err(ReadlineError::Io(err)) if err.kind() == io::ErrorKind::InvalidData => {
            warn!(error = %err, "discarding undecodable line");
            Ok(ReadOutcome::Interrupted)
        }
        Err(err) => Err(err.into()),
    }
}

/// Plain buffered input: prints the prompt to `prompt_sink`, reads up to a newline.
///
/// Used when standard input is not a terminal, and in tests.
pub struct PlainSource<R, W> {
    reader: R,
    prompt_sink: W,
}

impl<R: BufRead, W: Write> PlainSource<R, W> {
    pub fn new(reader: R, prompt_sink: W) -> Self {
        Self {
            reader,
            prompt_sink,
        }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.prompt_sink)
    }
}

impl<R: BufRead, W: Write> LineSource for PlainSource<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        self.prompt_sink.write_all(prompt.as_bytes())?;
        self.prompt_sink.flush()?;

        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(ReadOutcome::Eof);
        }
        if buf.ends_with(b"\n") {
            buf.pop();
        }
        // Invalid UTF-8 becomes U+FFFD.
        Ok(ReadOutcome::Line(String::from_utf8_lossy(&buf).into_owned()))
    }
}
