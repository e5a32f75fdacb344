//! The place where the CLI flags and the command line grammar are parsed.
//!
//! The REPL grammar is tiny, so it is split by hand:
//! - [`tokenize`] splits on whitespace outside single or double quotes
//! - [`split_values`] splits an `insert` value list on commas and whitespace
//! - [`parse_condition`] reads a single `<col>=<value>` pair

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use indexmap::IndexMap;

use crate::persistence::{DbError, Result, strip_quotes};

#[derive(Parser)]
#[command(name = "primitive_db")]
#[command(about = "A file-backed record store with a command line", long_about = None)]
pub struct CliParser {
    /// Directory holding `db_meta.json` and the `data/` folder.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Answer every confirmation prompt with yes.
    #[arg(short, long)]
    pub yes: bool,

    /// Lowest log level printed; `RUST_LOG` still takes precedence.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Skip the banner on startup.
    #[arg(long)]
    pub no_splash: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

pub fn tokenize(line: &str) -> Result<Vec<String>> {
    //! Split a command line on whitespace, keeping quoted runs together.
    //!
    //! Both kinds of quotes stay in the token here. [`split_values`] and
    //! [`parse_condition`] drop the single quotes, double quotes are left for
    //! the `str` coercion to strip. An unterminated quote is an error.

    split_quoted(line, char::is_whitespace, false)
}

pub fn split_values(list: &str) -> Result<Vec<String>> {
    //! Split the inside of `values (...)` into raw values.
    //!
    //! Commas and whitespace both separate values unless they sit inside
    //! quotes. Single quotes are removed, double quotes are kept.

    split_quoted(list, |ch| ch == ',' || ch.is_whitespace(), true)
}

pub fn parse_condition(expr: &str) -> Result<(String, String)> {
    //! Parse a `where` condition `<col>=<value>`, split at the first `=`.
    //!
    //! Both sides are trimmed, single quotes are removed and one layer of
    //! double quotes is stripped from the value.

    let (column, value) = split_pair(expr)?;
    let value = strip_quotes(&value).to_string();
    Ok((column, value))
}

pub fn parse_assignments(expr: &str) -> Result<IndexMap<String, String>> {
    //! Parse one or more comma separated `<col>=<value>` pairs of a `set` part.
    //!
    //! Double quotes stay on the values, the `str` coercion strips them.

    let mut assignments = IndexMap::new();

    for part in split_outside_quotes(expr, ',') {
        let (column, value) = split_pair(part)?;
        assignments.insert(column, value);
    }

    Ok(assignments)
}

fn split_pair(expr: &str) -> Result<(String, String)> {
    let (column, value) = expr
        .split_once('=')
        .ok_or_else(|| DbError::InvalidCommand(format!("expected <column>=<value>, got '{}'", expr)))?;

    let column = column.trim();
    if column.is_empty() {
        return Err(DbError::InvalidCommand(format!(
            "missing column name in '{}'",
            expr
        )));
    }

    let value = split_quoted(value.trim(), |_| false, true)?
        .pop()
        .unwrap_or_default();

    Ok((column.to_string(), value))
}

fn split_quoted(
    text: &str,
    is_separator: impl Fn(char) -> bool,
    drop_single_quotes: bool,
) -> Result<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut started = false;

    for ch in text.chars() {
        match (quote, ch) {
            (None, '"' | '\'') => {
                quote = Some(ch);
                started = true;
                if !(drop_single_quotes && ch == '\'') {
                    current.push(ch);
                }
            }
            (Some(open), ch) if ch == open => {
                quote = None;
                if !(drop_single_quotes && ch == '\'') {
                    current.push(ch);
                }
            }
            (None, ch) if is_separator(ch) => {
                if started {
                    parts.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            (_, ch) => {
                current.push(ch);
                started = true;
            }
        }
    }

    if quote.is_some() {
        return Err(DbError::InvalidCommand("unterminated quote".to_string()));
    }
    if started {
        parts.push(current);
    }

    Ok(parts)
}

fn split_outside_quotes(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;

    for (index, ch) in text.char_indices() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => {}
            None if ch == '"' || ch == '\'' => quote = Some(ch),
            None if ch == separator => {
                parts.push(&text[start..index]);
                start = index + ch.len_utf8();
            }
            None => {}
        }
    }
    parts.push(&text[start..]);

    parts
}
