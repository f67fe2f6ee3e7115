//! Plain text and JSON rendering of traversal results

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use logscope_logs::{Group, LogRecord};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How records are printed
#[derive(Clone, Copy, Debug, Default)]
pub struct OutputOptions {
    pub group_by_timestamp: bool,
    pub json: bool,
}

/// A log group as shown in list mode
#[derive(Debug, Serialize)]
struct GroupRow<'a> {
    name: &'a str,
    created_at: String,
    retention: String,
    stored_bytes: i64,
}

impl<'a> From<&'a Group> for GroupRow<'a> {
    fn from(group: &'a Group) -> Self {
        Self {
            name: &group.name,
            created_at: group
                .created_at()
                .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default(),
            retention: group.retention_label(),
            stored_bytes: group.stored_bytes,
        }
    }
}

/// Records sharing one timestamp
#[derive(Debug, Serialize)]
struct TimestampGroup<'a> {
    timestamp: i64,
    messages: Vec<&'a str>,
}

fn format_timestamp(record: &LogRecord) -> String {
    record
        .datetime()
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| record.timestamp.to_string())
}

/// Strip the trailing newline CloudWatch keeps on most messages
fn trim_message(message: &str) -> &str {
    message.trim_end_matches(['\n', '\r'])
}

/// Split records into runs that share a timestamp, preserving order
fn by_timestamp(records: &[LogRecord]) -> Vec<TimestampGroup<'_>> {
    let mut groups: Vec<TimestampGroup<'_>> = Vec::new();

    for record in records {
        let message = trim_message(&record.message);
        match groups.last_mut() {
            Some(last) if last.timestamp == record.timestamp => last.messages.push(message),
            _ => groups.push(TimestampGroup {
                timestamp: record.timestamp,
                messages: vec![message],
            }),
        }
    }

    groups
}

pub fn write_groups<W: Write>(out: &mut W, groups: &[Group], options: OutputOptions) -> Result<()> {
    let rows: Vec<GroupRow<'_>> = groups.iter().map(GroupRow::from).collect();

    if options.json {
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)?;
        return Ok(());
    }

    let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    for row in &rows {
        writeln!(
            out,
            "{:<width$}  {}  {:>9}  {:>12}",
            row.name,
            row.created_at,
            row.retention,
            row.stored_bytes,
            width = width
        )?;
    }

    Ok(())
}

pub fn write_records<W: Write>(
    out: &mut W,
    records: &[LogRecord],
    options: OutputOptions,
) -> Result<()> {
    if options.json {
        if options.group_by_timestamp {
            serde_json::to_writer_pretty(&mut *out, &by_timestamp(records))?;
        } else {
            serde_json::to_writer_pretty(&mut *out, records)?;
        }
        writeln!(out)?;
        return Ok(());
    }

    if options.group_by_timestamp {
        for group in by_timestamp(records) {
            let header = LogRecord::new(group.timestamp, "");
            writeln!(out, "{}", format_timestamp(&header))?;
            for message in group.messages {
                for line in message.lines() {
                    writeln!(out, "  {}", line)?;
                }
            }
        }
        return Ok(());
    }

    for record in records {
        writeln!(
            out,
            "{} {}",
            format_timestamp(record),
            trim_message(&record.message)
        )?;
    }

    Ok(())
}
