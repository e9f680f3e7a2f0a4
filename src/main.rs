//! makehelp — list documented make targets, grouped by category.
//!
//! Intended to back a `help` target:
//!
//! ```make
//! ## Show this help
//! ## @category General
//! help:
//! 	@makehelp
//! ```
//!
//! make itself is asked for its database (`make -pRrq`), which gives the
//! evaluated variables and the set of real targets. Every makefile named in
//! `MAKEFILE_LIST` is then scanned for `##` blocks above target definitions.

mod error;
mod lines;
mod logging;
mod make;
mod report;
mod scan;
mod table;
mod targets;
mod trim;
mod vars;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use make::{MakeCommand, Makefile};
use scan::Target;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Parser)]
#[command(
    name = "makehelp",
    about = "List documented make targets, grouped by category"
)]
struct Cli {
    /// Build tool to introspect
    #[arg(long, env = "MAKE", default_value = "make")]
    make: String,

    /// Run make in this directory; makefile paths are resolved against it
    #[arg(short = 'C', long)]
    directory: Option<PathBuf>,

    /// Makefile to pass to make with -f
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// Variable listing the makefiles to scan
    #[arg(long, default_value = "MAKEFILE_LIST")]
    list_variable: String,

    /// Do not print the usage header
    #[arg(long)]
    no_header: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let command = MakeCommand {
        directory: cli.directory.clone(),
        file: cli.file.clone(),
        ..MakeCommand::new(cli.make.as_str())
    };
    let makefile = make::load(&command).context("failed to read the make database")?;

    let targets = collect_targets(&makefile, &cli.list_variable, cli.directory.as_deref())?;
    debug!(documented = targets.len(), "collected targets");
    let groups = report::group(targets.into_values());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !cli.no_header {
        out.write_all(report::HEADER.as_bytes())
            .context("failed to write to stdout")?;
    }
    report::render(&mut out, &groups, &makefile.variables).context("failed to write to stdout")?;

    Ok(())
}

/// Scan every makefile listed in `list_variable`, keyed by target name.
/// A target documented again in a later file replaces the earlier entry.
fn collect_targets(
    makefile: &Makefile,
    list_variable: &str,
    directory: Option<&Path>,
) -> Result<BTreeMap<String, Target>> {
    let mut targets = BTreeMap::new();

    let Some(files) = makefile.variables.get(list_variable) else {
        warn!(variable = list_variable, "variable is not defined, no makefiles to scan");
        return Ok(targets);
    };

    for file in files {
        let path = match directory {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        };
        let found = scan::scan_file(&path, makefile)
            .with_context(|| format!("failed to scan {}", path.display()))?;
        for target in found {
            targets.insert(target.name.clone(), target);
        }
    }

    Ok(targets)
}
