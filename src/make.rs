//! Introspect make's database: variable values and known target names.
//!
//! `make -pRrq` prints the fully evaluated database without running any
//! recipe. Two line shapes are picked out of it:
//!
//! - `NAME := value`: a variable, split into words ([`split_value`])
//! - `name:`: a target definition

use crate::error::Error;
use crate::lines::lines;
use crate::targets::Targets;
use crate::vars::{split_value, Variables};
use regex::Regex;
use std::fmt;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::LazyLock;
use tracing::debug;

/// Flags asking make to print its database without executing anything.
const DATABASE_FLAGS: &str = "-pRrq";

static RE_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:#=\s]+)\s*:=\s*(.*)$").unwrap());

static RE_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^.:\s][^:\s]*):").unwrap());

/// The part of make's database this tool cares about.
#[derive(Debug, Default)]
pub struct Makefile {
    pub variables: Variables,
    pub targets: Targets,
}

/// How to invoke the build tool.
#[derive(Debug, Clone)]
pub struct MakeCommand {
    pub program: String,
    /// Forwarded as `-C DIR`.
    pub directory: Option<PathBuf>,
    /// Forwarded as `-f FILE`.
    pub file: Option<PathBuf>,
}

impl MakeCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            directory: None,
            file: None,
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.arg(DATABASE_FLAGS);
        if let Some(dir) = &self.directory {
            command.arg("-C").arg(dir);
        }
        if let Some(file) = &self.file {
            command.arg("-f").arg(file);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        command
    }
}

impl fmt::Display for MakeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.program, DATABASE_FLAGS)?;
        if let Some(dir) = &self.directory {
            write!(f, " -C {}", dir.display())?;
        }
        if let Some(file) = &self.file {
            write!(f, " -f {}", file.display())?;
        }
        Ok(())
    }
}

/// Run the build tool and parse its database dump.
///
/// The whole of stdout is consumed before returning. A non-zero exit status
/// is not an error: `-q` exits 1 whenever something is out of date, and the
/// dump is complete either way.
pub fn load(make: &MakeCommand) -> Result<Makefile, Error> {
    let command_line = make.to_string();
    debug!(command = %command_line, "introspecting build tool");

    let mut child = make.command().spawn().map_err(|source| Error::Launch {
        command: command_line.clone(),
        source,
    })?;

    let Some(stdout) = child.stdout.take() else {
        let _ = child.kill();
        let _ = child.wait();
        return Err(Error::Launch {
            command: command_line,
            source: std::io::Error::other("stdout was not captured"),
        });
    };

    let parsed = parse(BufReader::new(stdout), &format!("output of '{command_line}'"));
    if parsed.is_err() {
        let _ = child.kill();
    }

    match child.wait() {
        Ok(status) if !status.success() => debug!(%status, "ignoring build tool exit status"),
        Ok(_) => {}
        Err(err) => debug!(error = %err, "could not wait for build tool"),
    }

    let makefile = parsed?;
    debug!(
        targets = makefile.targets.len(),
        "parsed build tool database"
    );
    Ok(makefile)
}

/// Parse a database dump. `source` names the stream in read errors.
pub fn parse<R: BufRead>(reader: R, source: &str) -> Result<Makefile, Error> {
    let mut makefile = Makefile::default();

    for line in lines(reader) {
        let line = line.map_err(|err| Error::Read {
            what: source.to_string(),
            source: err,
        })?;

        // Both shapes are checked: they feed separate collections.
        if let Some(caps) = RE_VARIABLE.captures(&line) {
            makefile
                .variables
                .insert(&caps[1], split_value(&caps[2]));
        }

        if let Some(name) = target_name(&line) {
            makefile.targets.insert(name);
        }
    }

    Ok(makefile)
}

/// Name of the target defined on `line`, if it is a target definition.
pub fn target_name(line: &str) -> Option<&str> {
    RE_TARGET
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
