//! Errors raised while introspecting make and reading makefiles.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The build tool could not be started.
    #[error("failed to start command '{command}'")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    /// A stream (the build tool's stdout or a makefile) failed mid-read.
    #[error("failed to read {what}")]
    Read {
        what: String,
        #[source]
        source: io::Error,
    },

    /// A makefile could not be opened.
    #[error("failed to open {}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
