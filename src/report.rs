//! Group documented targets and render the help listing.

use crate::scan::Target;
use crate::table::{Color, ColorTableWriter};
use crate::vars::Variables;
use std::collections::BTreeMap;
use std::io::{self, Write};

pub const HEADER: &str = "\
Usage: make [targets]

For more information on make see https://www.gnu.org/software/make/manual/make.html

Available targets are listed below:

";

/// Minimum table width. Only the first row of a group fills every column,
/// so the listing is indented by one empty column.
const COLUMNS: usize = 4;

/// Group targets by category. Groups and the targets within each group are
/// sorted by name; the empty group sorts first.
pub fn group(targets: impl IntoIterator<Item = Target>) -> BTreeMap<String, Vec<Target>> {
    let mut groups: BTreeMap<String, Vec<Target>> = BTreeMap::new();
    for target in targets {
        groups.entry(target.group.clone()).or_default().push(target);
    }
    for targets in groups.values_mut() {
        targets.sort_by(|a, b| a.name.cmp(&b.name));
    }
    groups
}

/// Render the grouped targets as a table, one blank row after each group.
/// Variable references in usage text show the variable's first value.
pub fn render<W: Write>(
    out: W,
    groups: &BTreeMap<String, Vec<Target>>,
    variables: &Variables,
) -> io::Result<()> {
    let mut w = ColorTableWriter::new(out, COLUMNS);

    for (group, targets) in groups {
        w.add_cell(Color::LightBlue, group);
        for target in targets {
            w.add_cell(Color::Green, &target.name);
            w.add_cell(Color::None, &variables.replace(&target.usage));
            w.flush_row();
        }

        w.flush_row();
    }

    w.flush_table()
}
