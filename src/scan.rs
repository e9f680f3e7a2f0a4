//! Help annotation scanner — line-by-line state machine over one makefile.
//!
//! ```make
//! ## @category Build
//! ## Build the binary for every $(ARCHS)
//! build-$(ARCHS): deps
//! ```
//!
//! `##` lines accumulate usage text, `## @category` sets the group, and the
//! next target definition consumes both. Anything else discards them.

use crate::error::Error;
use crate::lines::lines;
use crate::make::{target_name, Makefile};
use crate::trim::trim_leading_spaces;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

const CATEGORY_MARKER: &str = "## @category";
const USAGE_MARKER: &str = "##";
const PHONY_MARKER: &str = ".PHONY";

/// A documented target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    /// Empty when no `## @category` preceded the block.
    pub group: String,
    /// Usage lines joined with `\n`.
    pub usage: String,
}

/// Annotations collected since the last reset.
#[derive(Debug, Default)]
struct Pending {
    group: String,
    usage: Vec<String>,
}

impl Pending {
    fn reset(&mut self) {
        self.group.clear();
        self.usage.clear();
    }

    /// Attach the pending block to every known expansion of `name`.
    fn resolve(&mut self, name: &str, makefile: &Makefile) -> Vec<Target> {
        trim_leading_spaces(&mut self.usage);
        let usage = self.usage.join("\n");

        makefile
            .variables
            .expand(name)
            .into_iter()
            .filter(|candidate| makefile.targets.contains(candidate))
            .map(|name| Target {
                name,
                group: self.group.clone(),
                usage: usage.clone(),
            })
            .collect()
    }
}

/// Scan the makefile at `path`.
pub fn scan_file(path: &Path, makefile: &Makefile) -> Result<Vec<Target>, Error> {
    let file = File::open(path).map_err(|source| Error::File {
        path: path.to_path_buf(),
        source,
    })?;

    let found = scan(BufReader::new(file), &path.display().to_string(), makefile)?;
    debug!(path = %path.display(), documented = found.len(), "scanned makefile");
    Ok(found)
}

/// Scan makefile text from `reader`. `source` names the stream in read errors.
pub fn scan<R: BufRead>(
    reader: R,
    source: &str,
    makefile: &Makefile,
) -> Result<Vec<Target>, Error> {
    let mut pending = Pending::default();
    let mut found = Vec::new();

    for line in lines(reader) {
        let line = line.map_err(|err| Error::Read {
            what: source.to_string(),
            source: err,
        })?;

        if let Some(rest) = line.strip_prefix(CATEGORY_MARKER) {
            pending.group = rest.trim().to_string();
            continue;
        }

        if let Some(rest) = line.strip_prefix(USAGE_MARKER) {
            pending.usage.push(rest.to_string());
            continue;
        }

        if line.starts_with(PHONY_MARKER) {
            continue;
        }

        if let Some(name) = target_name(&line) {
            if !pending.usage.is_empty() {
                found.extend(pending.resolve(name, makefile));
            }
        }

        pending.reset();
    }

    Ok(found)
}
