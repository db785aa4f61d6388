//! Table renderers. All four formats share the cell rule in the parent
//! module; only layout differs.

use super::{cell_value, ArchTableConfig, ComponentMap, TableFormat, ARCH_COLUMNS};

const NAME_HEADER: &str = "Component Image";

pub(super) fn render_csv(components: &ComponentMap, config: &ArchTableConfig) -> String {
    let mut lines = vec![format!("{},{}", NAME_HEADER, ARCH_COLUMNS.join(","))];

    for (name, archs) in components {
        let mut row = vec![name.clone()];
        for arch in ARCH_COLUMNS {
            let cell = cell_value(name, arch, archs, config, TableFormat::Csv);
            // Formula cells must be quoted, with internal quotes doubled
            if cell.starts_with('=') {
                row.push(format!("\"{}\"", cell.replace('"', "\"\"")));
            } else {
                row.push(cell);
            }
        }
        lines.push(row.join(","));
    }

    lines.join("\n")
}

pub(super) fn render_jira(components: &ComponentMap, config: &ArchTableConfig) -> String {
    let mut lines = vec![format!(
        "|| {} || {} ||",
        NAME_HEADER,
        ARCH_COLUMNS.join(" || ")
    )];

    for (name, archs) in components {
        let mut row = vec![name.clone()];
        for arch in ARCH_COLUMNS {
            row.push(cell_value(name, arch, archs, config, TableFormat::Jira));
        }
        lines.push(format!("| {} |", row.join(" | ")));
    }

    lines.join("\n")
}

pub(super) fn render_markdown(components: &ComponentMap, config: &ArchTableConfig) -> String {
    let name_width = name_column_width(components);
    let arch_widths = arch_column_widths(components, config, TableFormat::Markdown);

    let mut header = vec![format!("{:<width$}", NAME_HEADER, width = name_width)];
    for (arch, width) in ARCH_COLUMNS.iter().zip(&arch_widths) {
        header.push(format!("{:^width$}", arch, width = width));
    }

    let mut separator = vec!["-".repeat(name_width)];
    separator.extend(arch_widths.iter().map(|w| "-".repeat(*w)));

    let mut lines = vec![
        format!("| {} |", header.join(" | ")),
        format!("|{}|", separator.iter().map(|s| format!(" {} ", s)).collect::<Vec<_>>().join("|")),
    ];

    for (name, archs) in components {
        let mut row = vec![format!("{:<width$}", name, width = name_width)];
        for (arch, width) in ARCH_COLUMNS.iter().zip(&arch_widths) {
            let cell = cell_value(name, arch, archs, config, TableFormat::Markdown);
            row.push(format!("{:^width$}", cell, width = width));
        }
        lines.push(format!("| {} |", row.join(" | ")));
    }

    lines.join("\n")
}

pub(super) fn render_text(components: &ComponentMap, config: &ArchTableConfig) -> String {
    let name_width = name_column_width(components);
    let arch_widths = arch_column_widths(components, config, TableFormat::Text);

    let mut header = vec![format!("{:<width$}", NAME_HEADER, width = name_width)];
    for (arch, width) in ARCH_COLUMNS.iter().zip(&arch_widths) {
        header.push(format!("{:^width$}", arch, width = width));
    }
    let header = header.join("  ");

    let mut lines = vec!["-".repeat(header.len())];
    lines.insert(0, header);

    for (name, archs) in components {
        let mut row = vec![format!("{:<width$}", name, width = name_width)];
        for (arch, width) in ARCH_COLUMNS.iter().zip(&arch_widths) {
            let cell = cell_value(name, arch, archs, config, TableFormat::Text);
            row.push(format!("{:^width$}", cell, width = width));
        }
        lines.push(row.join("  "));
    }

    lines.join("\n")
}

fn name_column_width(components: &ComponentMap) -> usize {
    components
        .keys()
        .map(String::len)
        .max()
        .unwrap_or(10)
        .max(NAME_HEADER.len())
}

fn arch_column_widths(
    components: &ComponentMap,
    config: &ArchTableConfig,
    format: TableFormat,
) -> Vec<usize> {
    ARCH_COLUMNS
        .iter()
        .map(|arch| {
            let mut width = arch.len();
            for (name, archs) in components {
                let cell = cell_value(name, arch, archs, config, format);
                width = width.max(display_width(&cell, format));
            }
            width
        })
        .collect()
}

/// Markdown links render as their text, so only the link text counts
/// toward the column width.
fn display_width(cell: &str, format: TableFormat) -> usize {
    if format == TableFormat::Markdown && cell.starts_with('[') && cell.contains("](") {
        if let Some(text) = cell.split(']').next() {
            return text.len().saturating_sub(1);
        }
    }
    cell.len()
}
