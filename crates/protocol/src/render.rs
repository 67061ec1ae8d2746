use std::fmt::Write as _;

use unicode_width::UnicodeWidthStr;

use crate::types::{Argument, Description, Entry, Enum, Event, Interface, Protocol, Request};

/// Gap between table columns.
const COLUMN_GAP: usize = 6;

/// Flat-text detail page for one protocol.
pub fn render_protocol(protocol: &Protocol) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}\n", protocol.name);
    render_description(&mut out, &protocol.description);

    for iface in &protocol.interfaces {
        render_interface(&mut out, iface);
    }

    out.push_str("copyright:\n");
    out.push_str(&dedent(&protocol.copyright));
    out.push('\n');
    out
}

fn render_interface(out: &mut String, iface: &Interface) {
    let _ = writeln!(out, "\ninterface: {} version: {}", iface.name, iface.version);
    render_description(out, &iface.description);

    for request in &iface.requests {
        render_request(out, &iface.name, request);
    }
    for event in &iface.events {
        render_event(out, &iface.name, event);
    }
    for enum_ in &iface.enums {
        render_enum(out, &iface.name, enum_);
    }
}

fn render_request(out: &mut String, iface: &str, request: &Request) {
    let _ = write!(out, "\nrequest: {iface}.{}", request.name);
    if !request.kind.is_empty() {
        let _ = write!(out, " type: {}", request.kind);
    }
    if !request.since.is_empty() {
        let _ = write!(out, " since: version {}", request.since);
    }
    out.push('\n');

    render_arguments(out, &request.arguments);
    render_description(out, &request.description);
}

fn render_event(out: &mut String, iface: &str, event: &Event) {
    let _ = write!(out, "\nevent: {iface}.{}", event.name);
    if !event.kind.is_empty() {
        let _ = write!(out, " type: {}", event.kind);
    }
    if !event.since.is_empty() {
        let _ = write!(out, " since: version {}", event.since);
    }
    if !event.deprecated_since.is_empty() {
        let _ = write!(out, " deprecated-since: version {}", event.deprecated_since);
    }
    out.push('\n');

    render_arguments(out, &event.arguments);
    render_description(out, &event.description);
}

fn render_enum(out: &mut String, iface: &str, enum_: &Enum) {
    let _ = write!(out, "\nenum: {iface}.{}", enum_.name);
    if enum_.bitfield {
        out.push_str(" (bitfield)");
    }
    if !enum_.since.is_empty() {
        let _ = write!(out, " (since version: {})", enum_.since);
    }
    out.push('\n');

    if !enum_.entries.is_empty() {
        let rows = enum_.entries.iter().map(entry_row).collect::<Vec<_>>();
        render_table(out, ["[name]", "[value]"], rows, &enum_.entries, |entry| {
            (&entry.summary, &entry.description)
        });
    }
    render_description(out, &enum_.description);
}

fn render_arguments(out: &mut String, args: &[Argument]) {
    if args.is_empty() {
        return;
    }

    let signature = args.iter().map(signature_part).collect::<Vec<_>>().join(", ");
    let _ = writeln!(out, "({signature})");

    let rows = args.iter().map(argument_row).collect::<Vec<_>>();
    render_table(out, ["[name]", "[type]"], rows, args, |arg| {
        (&arg.summary, &arg.description)
    });
}

fn signature_part(arg: &Argument) -> String {
    let nullable = if arg.nullable { "?" } else { "" };
    match arg.reference() {
        Some(target) => format!("{}: {nullable}{}<{target}>", arg.name, arg.kind),
        None => format!("{}: {nullable}{}", arg.name, arg.kind),
    }
}

fn argument_row(arg: &Argument) -> [String; 2] {
    let mut name = arg.name.clone();
    if !arg.since.is_empty() {
        let _ = write!(name, " (since version: {})", arg.since);
    }

    let mut kind = arg.kind.clone();
    if let Some(target) = arg.reference() {
        let _ = write!(kind, "<{target}>");
    }
    if arg.nullable {
        kind.push_str(" (nullable)");
    }

    [name, kind]
}

fn entry_row(entry: &Entry) -> [String; 2] {
    let mut name = entry.name.clone();
    if !entry.since.is_empty() {
        let _ = write!(name, " (since version: {})", entry.since);
    }
    [name, entry.value.clone()]
}

/// Aligned table: two fixed columns plus the optional summary/description columns that at least
/// one record fills in.
fn render_table<T>(
    out: &mut String,
    head: [&str; 2],
    fixed: Vec<[String; 2]>,
    records: &[T],
    extra: impl Fn(&T) -> (&String, &Description),
) {
    let has_summary = records.iter().any(|r| !extra(r).0.is_empty());
    let has_desc_summary = records.iter().any(|r| !extra(r).1.summary.is_empty());
    let has_desc_content = records.iter().any(|r| !extra(r).1.content.trim().is_empty());

    let mut header: Vec<String> = head.iter().map(|h| (*h).to_string()).collect();
    if has_summary {
        header.push("[summary]".to_string());
    }
    if has_desc_summary {
        header.push("[description summary]".to_string());
    }
    if has_desc_content {
        header.push("[description]".to_string());
    }

    let mut rows = vec![header];
    for (cells, record) in fixed.into_iter().zip(records) {
        let (summary, description) = extra(record);
        let mut row: Vec<String> = cells.into_iter().collect();
        if has_summary {
            row.push(quoted(summary));
        }
        if has_desc_summary {
            row.push(quoted(&description.summary));
        }
        if has_desc_content {
            row.push(quoted(&collapse(&description.content)));
        }
        rows.push(row);
    }

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.width())
                .max()
                .unwrap_or(0)
        })
        .collect();

    out.push('\n');
    for row in rows {
        let mut line = String::new();
        for (cell, width) in row.iter().zip(&widths) {
            line.push_str(cell);
            line.push_str(&" ".repeat(width - cell.width() + COLUMN_GAP));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push('\n');
}

fn quoted(text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("'{text}'")
    }
}

fn render_description(out: &mut String, description: &Description) {
    if !description.summary.is_empty() {
        let _ = writeln!(out, "{}", description.summary);
    }
    let content = dedent(&description.content);
    if !content.is_empty() {
        let _ = writeln!(out, "{content}");
    }
}

/// Strip the XML indentation from every line and drop blank edges.
fn dedent(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
    lines[start..end].join("\n")
}

/// Fold multi-line text into a single table cell.
fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
