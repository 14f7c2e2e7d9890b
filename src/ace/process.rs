//! Engine process lifecycle.

use crate::{AceOptions, Error, Result};
use std::ffi::OsString;
use std::io::{BufRead, BufReader, PipeReader, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};

/// How requests are answered: extra engine arguments and response framing.
pub trait Mode {
    type Response;

    /// Arguments placed after `-g <grammar>` and before the caller's own.
    const DEFAULT_ARGS: &'static [&'static str];

    /// Read exactly one response.
    fn receive<R: BufRead>(reader: &mut R) -> Result<Self::Response>;
}

/// A running engine.
///
/// Opened on construction and closed by [`close`](Self::close) or on drop.
/// Stdout and stderr share one pipe, so diagnostics arrive in order with the
/// results they belong to.
#[derive(Debug)]
pub struct AceProcess<M: Mode> {
    grammar: PathBuf,
    child: Child,
    stdin: Option<ChildStdin>,
    output: BufReader<PipeReader>,
    status: Option<ExitStatus>,
    _mode: PhantomData<M>,
}

impl<M: Mode> AceProcess<M> {
    /// Start `options.executable -g grammar [mode args] [options.cmdargs]`.
    ///
    /// The grammar must exist; nothing is spawned otherwise.
    pub fn open(grammar: impl AsRef<Path>, options: &AceOptions) -> Result<Self> {
        let grammar = grammar.as_ref();
        if !grammar.is_file() {
            return Err(Error::MissingGrammar(grammar.to_path_buf()));
        }

        let mut args: Vec<OsString> = vec!["-g".into(), grammar.as_os_str().to_owned()];
        args.extend(M::DEFAULT_ARGS.iter().map(OsString::from));
        args.extend(options.cmdargs.iter().map(OsString::from));
        tracing::debug!(program = %options.executable.display(), ?args, "starting engine");

        let (reader, writer) = std::io::pipe()?;
        let mut command = Command::new(&options.executable);
        command.args(&args).stdin(Stdio::piped()).stdout(writer.try_clone()?).stderr(writer);
        if let Some(env) = &options.env {
            command.env_clear().envs(env);
        }
        let mut child = command
            .spawn()
            .map_err(|source| Error::Spawn { program: options.executable.display().to_string(), source })?;
        // the command still owns our copies of the write end; EOF needs them gone
        drop(command);

        let stdin = child.stdin.take();
        Ok(AceProcess {
            grammar: grammar.to_path_buf(),
            child,
            stdin,
            output: BufReader::new(reader),
            status: None,
            _mode: PhantomData,
        })
    }

    pub fn grammar(&self) -> &Path {
        &self.grammar
    }

    pub fn is_open(&self) -> bool {
        self.status.is_none() && self.stdin.is_some()
    }

    /// Write one request line (trailing whitespace trimmed).
    pub fn send(&mut self, datum: &str) -> Result<()> {
        let stdin = self.stdin.as_mut().ok_or_else(|| Error::Process("engine input is already closed".into()))?;
        let datum = datum.trim_end();
        tracing::debug!(datum, "sending to engine");
        writeln!(stdin, "{datum}")?;
        stdin.flush()?;
        Ok(())
    }

    pub fn receive(&mut self) -> Result<M::Response> {
        M::receive(&mut self.output)
    }

    pub fn interact(&mut self, datum: &str) -> Result<M::Response> {
        self.send(datum)?;
        self.receive()
    }

    /// Close stdin, log whatever the engine still prints, and wait for it.
    ///
    /// Returns the exit code. Once the engine has exited, calling again
    /// reports the same outcome without touching the process.
    pub fn close(&mut self) -> Result<i32> {
        if let Some(status) = self.status {
            return exit_code(status);
        }
        drop(self.stdin.take());

        let mut line = Vec::new();
        while self.output.read_until(b'\n', &mut line)? > 0 {
            tracing::debug!(line = %String::from_utf8_lossy(&line).trim_end(), "engine cleanup");
            line.clear();
        }

        let status = self.child.wait()?;
        self.status = Some(status);
        exit_code(status)
    }
}

fn exit_code(status: ExitStatus) -> Result<i32> {
    status.code().ok_or_else(|| Error::Process(format!("engine terminated by a signal ({status})")))
}

impl<M: Mode> Drop for AceProcess<M> {
    fn drop(&mut self) {
        if self.status.is_none() {
            if let Err(err) = self.close() {
                tracing::warn!(grammar = %self.grammar.display(), error = %err, "failed to close engine");
            }
        }
    }
}
