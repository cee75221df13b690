use std::io::{BufRead, Write};

use tracing::debug;

use crate::command::Command;
use crate::error::FsError;
use crate::fs::FileSystem;
use crate::snapshot::{load_state, save_state};

/// Result of executing one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading; print the text if there is any.
    Continue(Option<String>),
    Exit,
}

/// Line-oriented front end over a [`FileSystem`].
#[derive(Debug, Default)]
pub struct Shell {
    fs: FileSystem,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fs(fs: FileSystem) -> Self {
        Self { fs }
    }

    pub fn fs(&self) -> &FileSystem {
        &self.fs
    }

    /// Parse and run one line. Failures become printable text; they never
    /// stop the shell.
    pub fn execute(&mut self, line: &str) -> Outcome {
        match Command::parse(line).and_then(|command| self.dispatch(command)) {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(code = e.code(), "command failed: {}", e);
                Outcome::Continue(Some(e.to_string()))
            }
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<Outcome, FsError> {
        let output = match command {
            Command::Noop => None,
            Command::Exit => return Ok(Outcome::Exit),
            Command::Mkdir(path) => {
                self.fs.mkdir(&path)?;
                None
            }
            Command::Cd(path) => {
                self.fs.cd(&path)?;
                None
            }
            Command::Ls(path) => Some(self.fs.ls(path.as_deref())?),
            Command::Pwd => Some(self.fs.pwd()),
            Command::Grep { pattern, path } => {
                let found = self.fs.grep(&pattern, &path)?;
                let answer = if found { "True" } else { "False" };
                Some(answer.to_string())
            }
            Command::Cat(path) => Some(self.fs.cat(&path)?.to_string()),
            Command::Touch(path) => {
                self.fs.touch(&path)?;
                None
            }
            Command::Echo { content, path } => {
                self.fs.echo(&content, &path)?;
                None
            }
            Command::Mv {
                source,
                destination,
            } => {
                self.fs.mv(&source, &destination)?;
                None
            }
            Command::Cp {
                source,
                destination,
            } => {
                self.fs.cp(&source, &destination)?;
                None
            }
            Command::Rm(path) => {
                self.fs.rm(&path)?;
                None
            }
            Command::Save(path) => {
                save_state(&self.fs, &path)?;
                None
            }
            Command::Load(path) => {
                // Replaces the whole instance; no old node id survives.
                self.fs = load_state(&path)?;
                None
            }
        };
        Ok(Outcome::Continue(output.filter(|text| !text.is_empty())))
    }

    /// Read commands from `input` until `exit` or end of input, writing
    /// results to `output`. The prompt, if any, is written before each line.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        output: &mut W,
        prompt: Option<&str>,
    ) -> Result<(), FsError> {
        let mut line = String::new();
        loop {
            if let Some(prompt) = prompt {
                write!(output, "{}", prompt)?;
                output.flush()?;
            }
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            match self.execute(line.trim_end_matches(['\n', '\r'])) {
                Outcome::Exit => break,
                Outcome::Continue(Some(text)) => writeln!(output, "{}", text)?,
                Outcome::Continue(None) => {}
            }
        }
        output.flush()?;
        Ok(())
    }
}
