//! A line-protocol interpreter running as a child process.
//!
//! Every request is the expression followed by a sentinel command; the response
//! is everything printed up to the sentinel line. Whether a response is an
//! error is decided by the configured error pattern.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use regex::Regex;

use crate::config::InterpreterConfig;
use crate::errors::{ConfigError, EvalError, SessionError};
use crate::interpreter::Interpreter;

/// A persistent interpreter subprocess.
pub struct ProcessInterpreter {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    config: InterpreterConfig,
    error_pattern: Regex,
}

/// Failure to bring the interpreter up.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum StartError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Session(#[from] SessionError),
}

impl ProcessInterpreter {
    /// Spawns the interpreter and runs the preamble.
    pub fn spawn(config: InterpreterConfig) -> Result<Self, StartError> {
        let error_pattern = config.error_regex()?;
        tracing::debug!(command = %config.command, args = ?config.args, "spawning interpreter");
        let mut child = Command::new(&config.command)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SessionError::Spawn {
                command: config.command.clone(),
                source,
            })?;
        let stdin = child.stdin.take().ok_or(SessionError::MissingPipe("stdin"))?;
        let stdout = child
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or(SessionError::MissingPipe("stdout"))?;

        let mut interpreter = Self {
            child,
            stdin,
            stdout,
            config,
            error_pattern,
        };
        let preamble = interpreter.config.preamble.clone();
        for line in &preamble {
            writeln!(interpreter.stdin, "{}", line).map_err(SessionError::Io)?;
        }
        let output = interpreter.exchange(None)?.join("\n");
        if interpreter.is_error(&output) {
            return Err(SessionError::Preamble { output }.into());
        }
        Ok(interpreter)
    }

    /// Sends `request` (if any) and the sentinel command; returns the output lines.
    fn exchange(&mut self, request: Option<&str>) -> Result<Vec<String>, SessionError> {
        if let Some(request) = request {
            self.write_request(request)?;
        }
        writeln!(self.stdin, "{}", self.config.sentinel_command)?;
        self.stdin.flush()?;
        self.read_response()
    }

    fn write_request(&mut self, request: &str) -> Result<(), SessionError> {
        let block = match (&self.config.block_open, &self.config.block_close) {
            (Some(open), Some(close)) if request.contains('\n') => Some((open, close)),
            _ => None,
        };
        match block {
            Some((open, close)) => writeln!(self.stdin, "{}\n{}\n{}", open, request, close)?,
            None => writeln!(self.stdin, "{}", request)?,
        }
        Ok(())
    }

    fn read_response(&mut self) -> Result<Vec<String>, SessionError> {
        let sentinel = self.config.sentinel.as_str();
        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            if self.stdout.read_line(&mut line)? == 0 {
                return Err(SessionError::Closed);
            }
            let line = line.trim_end_matches(['\n', '\r']);
            if line == sentinel {
                return Ok(lines);
            }
            // Output without a trailing newline runs into the sentinel.
            if let Some(prefix) = line.strip_suffix(sentinel) {
                lines.push(prefix.to_string());
                return Ok(lines);
            }
            lines.push(line.to_string());
        }
    }

    fn is_error(&self, output: &str) -> bool {
        self.error_pattern.is_match(output)
    }
}

impl Interpreter for ProcessInterpreter {
    fn reload(&mut self) -> Result<(), SessionError> {
        tracing::debug!(command = %self.config.reload, "reloading session");
        let reload = self.config.reload.clone();
        let output = self.exchange(Some(&reload))?.join("\n");
        if self.is_error(&output) {
            return Err(SessionError::Reload { output });
        }
        Ok(())
    }

    fn evaluate(&mut self, expression: &str) -> Result<String, EvalError> {
        tracing::debug!(%expression, "evaluating");
        let output = self
            .exchange(Some(expression))
            .map_err(|e| EvalError::new(e.to_string()))?
            .join("\n");
        if self.is_error(&output) {
            Err(EvalError::new(output))
        } else {
            Ok(output)
        }
    }
}

impl Drop for ProcessInterpreter {
    fn drop(&mut self) {
        if let Err(e) = self.child.kill() {
            tracing::warn!(error = %e, "failed to stop interpreter");
        }
        let _ = self.child.wait();
    }
}
