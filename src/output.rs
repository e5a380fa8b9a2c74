//! Output formatting for comment threads: JSON, YAML, tables and plain text.

use crate::error::OutputError;
use crate::models::CommentThread;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines (default)
    #[default]
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Box-drawn table
    Table,
    /// No output
    Silent,
}

/// Writes `value` as pretty-printed JSON, optionally filtered by a JSON path.
pub fn print_json<T: Serialize + ?Sized>(
    value: &T,
    json_path: Option<&str>,
    writer: &mut dyn Write,
) -> Result<(), OutputError> {
    let value = select(value, json_path)?;
    serde_json::to_writer_pretty(&mut *writer, &value)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes `value` as YAML, optionally filtered by a JSON path.
pub fn print_yaml<T: Serialize + ?Sized>(
    value: &T,
    json_path: Option<&str>,
    writer: &mut dyn Write,
) -> Result<(), OutputError> {
    let value = select(value, json_path)?;
    let yaml = serde_yaml::to_string(&value)?;
    writer.write_all(yaml.as_bytes())?;
    Ok(())
}

fn select<T: Serialize + ?Sized>(value: &T, json_path: Option<&str>) -> Result<Value, OutputError> {
    let value = serde_json::to_value(value)?;
    match json_path.map(str::trim).filter(|p| !p.is_empty()) {
        None => Ok(value),
        Some(path) => {
            let segments = parse_path(path)?;
            let matches = apply_path(&value, &segments);
            Ok(Value::Array(matches.into_iter().cloned().collect()))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Key(String),
    Index(usize),
    Wildcard,
}

fn invalid_path(path: &str, reason: impl Into<String>) -> OutputError {
    OutputError::InvalidPath {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn is_name_char(c: char) -> bool {
    !matches!(c, '.' | '[' | ']' | '\'' | '"')
}

/// Parses the supported JSON path subset: `$`, `.name`, `.*`, `[n]`, `[*]`, `['name']`.
fn parse_path(path: &str) -> Result<Vec<Segment>, OutputError> {
    let chars: Vec<char> = path.chars().collect();
    let mut segments = Vec::new();
    let mut i = 0;

    if chars.first() == Some(&'$') {
        i = 1;
    } else if chars.first().is_some_and(|c| is_name_char(*c)) {
        // Bare leading name, as in `items[0].id`.
        let start = i;
        while i < chars.len() && is_name_char(chars[i]) {
            i += 1;
        }
        segments.push(Segment::Key(chars[start..i].iter().collect()));
    }

    while i < chars.len() {
        match chars[i] {
            '.' => {
                i += 1;
                if chars.get(i) == Some(&'*') {
                    segments.push(Segment::Wildcard);
                    i += 1;
                    continue;
                }
                let start = i;
                while i < chars.len() && is_name_char(chars[i]) {
                    i += 1;
                }
                if start == i {
                    return Err(invalid_path(path, format!("expected a name at offset {start}")));
                }
                segments.push(Segment::Key(chars[start..i].iter().collect()));
            }
            '[' => {
                i += 1;
                let close = chars[i..]
                    .iter()
                    .position(|c| *c == ']')
                    .map(|p| p + i)
                    .ok_or_else(|| invalid_path(path, "unclosed bracket"))?;
                let inner: String = chars[i..close].iter().collect();
                let inner = inner.trim();
                let segment = if inner == "*" {
                    Segment::Wildcard
                } else if let Some(name) = strip_quotes(inner) {
                    Segment::Key(name.to_string())
                } else {
                    let index = inner
                        .parse::<usize>()
                        .map_err(|_| invalid_path(path, format!("invalid index {inner:?}")))?;
                    Segment::Index(index)
                };
                segments.push(segment);
                i = close + 1;
            }
            c => return Err(invalid_path(path, format!("unexpected character {c:?}"))),
        }
    }

    Ok(segments)
}

fn strip_quotes(s: &str) -> Option<&str> {
    s.strip_prefix('\'')
        .and_then(|r| r.strip_suffix('\''))
        .or_else(|| s.strip_prefix('"').and_then(|r| r.strip_suffix('"')))
}

fn apply_path<'a>(root: &'a Value, segments: &[Segment]) -> Vec<&'a Value> {
    let mut current = vec![root];
    for segment in segments {
        current = current
            .into_iter()
            .flat_map(|value| -> Vec<&'a Value> {
                match (segment, value) {
                    (Segment::Key(key), Value::Object(map)) => map.get(key).into_iter().collect(),
                    (Segment::Index(index), Value::Array(items)) => {
                        items.get(*index).into_iter().collect()
                    }
                    (Segment::Wildcard, Value::Array(items)) => items.iter().collect(),
                    (Segment::Wildcard, Value::Object(map)) => map.values().collect(),
                    _ => Vec::new(),
                }
            })
            .collect();
    }
    current
}

/// A light box-drawn table with an automatic row-number column.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn grid(&self) -> Vec<Vec<String>> {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);

        let mut header = vec![String::new()];
        header.extend(
            (0..columns).map(|i| self.headers.get(i).map(|h| h.to_uppercase()).unwrap_or_default()),
        );

        let mut grid = vec![header];
        for (n, row) in self.rows.iter().enumerate() {
            let mut line = vec![(n + 1).to_string()];
            line.extend((0..columns).map(|i| {
                row.get(i)
                    .map(|cell| flatten(cell))
                    .unwrap_or_default()
            }));
            grid.push(line);
        }
        grid
    }

    pub fn render(&self, writer: &mut dyn Write) -> io::Result<()> {
        let grid = self.grid();
        let widths: Vec<usize> = (0..grid[0].len())
            .map(|col| {
                grid.iter()
                    .map(|row| UnicodeWidthStr::width(row[col].as_str()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let border = |left: &str, mid: &str, right: &str| {
            let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{left}{}{right}\n", inner.join(mid))
        };
        let line = |row: &[String]| {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| {
                    let pad = width - UnicodeWidthStr::width(cell.as_str());
                    format!(" {cell}{} ", " ".repeat(pad))
                })
                .collect();
            format!("│{}│\n", cells.join("│"))
        };

        let mut out = border("┌", "┬", "┐");
        out.push_str(&line(&grid[0]));
        out.push_str(&border("├", "┼", "┤"));
        for row in &grid[1..] {
            out.push_str(&line(row));
        }
        out.push_str(&border("└", "┴", "┘"));
        writer.write_all(out.as_bytes())
    }
}

fn flatten(cell: &str) -> String {
    cell.split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders one row per thread: id, author, video id, display text.
pub fn render_threads_table(
    threads: &[CommentThread],
    writer: &mut dyn Write,
) -> Result<(), OutputError> {
    let mut table = Table::new(["ID", "Author", "Video ID", "Text Display"]);
    for thread in threads {
        table.push_row([
            thread.id.as_str(),
            thread.author_display_name(),
            thread.video_id(),
            thread.text_display(),
        ]);
    }
    table.render(writer)?;
    Ok(())
}

/// Writes one `{id}  {author}: {text}` line per thread.
pub fn write_threads_text(
    threads: &[CommentThread],
    writer: &mut dyn Write,
) -> Result<(), OutputError> {
    if threads.is_empty() {
        writeln!(writer, "No comment threads found.")?;
        return Ok(());
    }
    for thread in threads {
        writeln!(
            writer,
            "{}  {}: {}",
            thread.id,
            thread.author_display_name(),
            flatten(thread.text_display())
        )?;
    }
    Ok(())
}
