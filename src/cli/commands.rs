//! This module where all the commands are stored.
//!
//! Once the user is inside the REPL, every line is one command. Keywords are
//! case-insensitive, names and values are not.
//!
//! - create_table <table> <col:type> ...
//! - drop_table <table>
//! - list_tables
//! - insert into <table> values (<value>, ...)
//! - select from <table> [where <col>=<value>]
//! - update <table> set <col>=<value>[, ...] where <col>=<value>
//! - delete from <table> where <col>=<value>
//! - info <table>
//!
//! Here `...` means more than one such value. Types are `int`, `str` and `bool`.

use std::sync::{Arc, RwLock};

use indexmap::IndexMap;

use crate::cli::decorators::{confirm_action, log_time};
use crate::cli::messages::highlight_argument;
use crate::cli::parsers::{parse_assignments, parse_condition, split_values, tokenize};
use crate::persistence::{DbError, Predicate, Result, SelectResult, TableDescription};
use crate::sessions::session::Session;

pub const COMMANDS_LIST: [(&str, &str); 12] = [
    ("create_table <table> <col:type> ...", "create a table"),
    ("drop_table <table>", "drop a table and its records"),
    ("list_tables", "list all tables"),
    ("insert into <table> values (<values>)", "insert a record"),
    ("select from <table> [where <col>=<value>]", "read records"),
    (
        "update <table> set <col>=<value> where <col>=<value>",
        "update records",
    ),
    ("delete from <table> where <col>=<value>", "delete records"),
    ("info <table>", "describe a table"),
    ("history", "list command history for this session"),
    ("!", "execute the last command, add more to go further back"),
    ("help", "list all available commands"),
    ("exit", "leave the program"),
];

/// One parsed line of input.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    CreateTable {
        name: String,
        columns: Vec<String>,
    },
    DropTable {
        name: String,
    },
    ListTables,
    Insert {
        table: String,
        values: Vec<String>,
    },
    Select {
        table: String,
        predicate: Option<Predicate>,
    },
    Update {
        table: String,
        set_clause: IndexMap<String, String>,
        predicate: Predicate,
    },
    Delete {
        table: String,
        predicate: Predicate,
    },
    Info {
        table: String,
    },
    History,
    Help,
    Exit,
}

/// What a command hands back to the REPL for display.
pub enum CommandResult {
    Message(String),
    Records(SelectResult),
    Tables(Vec<String>),
    Description(TableDescription),
    Cancelled,
    Nothing,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command> {
        let tokens = tokenize(line)?;
        let Some(keyword) = tokens.first() else {
            return Err(invalid("empty command"));
        };

        match keyword.to_lowercase().as_str() {
            "create_table" => {
                let name = table_name(&tokens, 1)?;
                Ok(Command::CreateTable {
                    name,
                    columns: tokens[2..].to_vec(),
                })
            }
            "drop_table" => {
                expect_len(&tokens, 2, "drop_table <table>")?;
                Ok(Command::DropTable {
                    name: tokens[1].clone(),
                })
            }
            "list_tables" => {
                expect_len(&tokens, 1, "list_tables")?;
                Ok(Command::ListTables)
            }
            "insert" => {
                expect_keyword(&tokens, 1, "into")?;
                let table = table_name(&tokens, 2)?;
                expect_keyword(&tokens, 3, "values")?;

                let list = tokens[4..].join(" ");
                let inner = list
                    .strip_prefix('(')
                    .and_then(|list| list.strip_suffix(')'))
                    .ok_or_else(|| invalid("values must be wrapped in parentheses"))?;

                Ok(Command::Insert {
                    table,
                    values: split_values(inner)?,
                })
            }
            "select" => {
                expect_keyword(&tokens, 1, "from")?;
                let table = table_name(&tokens, 2)?;

                let predicate = match tokens.get(3) {
                    None => None,
                    Some(_) => {
                        expect_keyword(&tokens, 3, "where")?;
                        Some(parse_predicate(&tokens[4..])?)
                    }
                };

                Ok(Command::Select { table, predicate })
            }
            "update" => {
                let table = table_name(&tokens, 1)?;
                expect_keyword(&tokens, 2, "set")?;

                let where_index = position_of(&tokens[3..], "where")
                    .map(|index| index + 3)
                    .ok_or_else(|| invalid("update needs a where clause"))?;
                let set_clause = parse_assignments(&tokens[3..where_index].join(" "))?;

                Ok(Command::Update {
                    table,
                    set_clause,
                    predicate: parse_predicate(&tokens[where_index + 1..])?,
                })
            }
            "delete" => {
                expect_keyword(&tokens, 1, "from")?;
                let table = table_name(&tokens, 2)?;
                expect_keyword(&tokens, 3, "where")?;

                Ok(Command::Delete {
                    table,
                    predicate: parse_predicate(&tokens[4..])?,
                })
            }
            "info" => {
                expect_len(&tokens, 2, "info <table>")?;
                Ok(Command::Info {
                    table: tokens[1].clone(),
                })
            }
            "history" => Ok(Command::History),
            "help" => Ok(Command::Help),
            "exit" => Ok(Command::Exit),
            other => Err(invalid(&format!(
                "unknown command '{}', try {}",
                other,
                highlight_argument("help")
            ))),
        }
    }
}

/// Runs a single [`Command`] against the session.
///
/// Drop and delete ask for confirmation first. Insert and select are timed.
/// History, help and exit are REPL concerns and come back as
/// [`CommandResult::Nothing`].
pub struct CommandExecutor {
    command: Command,
    session: Arc<RwLock<Session>>,
}

impl CommandExecutor {
    pub fn new(command: Command, session: &Arc<RwLock<Session>>) -> CommandExecutor {
        CommandExecutor {
            command,
            session: Arc::clone(session),
        }
    }

    pub fn execute(&self) -> Result<CommandResult> {
        let mut session = self
            .session
            .write()
            .map_err(|_| invalid("session lock poisoned"))?;
        let assume_yes = session.config().assume_yes;

        match &self.command {
            Command::CreateTable { name, columns } => {
                let schema = session.create_table(name, columns)?;
                Ok(CommandResult::Message(format!(
                    "Table {} was created with columns: {}.",
                    highlight_argument(name),
                    schema
                )))
            }
            Command::DropTable { name } => {
                if !confirm_action("drop the table", assume_yes) {
                    return Ok(CommandResult::Cancelled);
                }

                session.drop_table(name)?;
                Ok(CommandResult::Message(format!(
                    "Table {} was dropped.",
                    highlight_argument(name)
                )))
            }
            Command::ListTables => Ok(CommandResult::Tables(session.list_tables()?)),
            Command::Insert { table, values } => {
                let id = log_time("insert", || session.insert(table, values))?;
                Ok(CommandResult::Message(format!(
                    "Record with ID={} was added to table {}.",
                    id,
                    highlight_argument(table)
                )))
            }
            Command::Select { table, predicate } => {
                let records = log_time("select", || session.select(table, predicate.as_ref()))?;
                Ok(CommandResult::Records(records))
            }
            Command::Update {
                table,
                set_clause,
                predicate,
            } => {
                let n_updated = session.update(table, set_clause, predicate)?;
                Ok(CommandResult::Message(format!(
                    "{} record(s) in table {} were updated.",
                    n_updated,
                    highlight_argument(table)
                )))
            }
            Command::Delete { table, predicate } => {
                if !confirm_action("delete the records", assume_yes) {
                    return Ok(CommandResult::Cancelled);
                }

                let n_deleted = session.delete(table, predicate)?;
                Ok(CommandResult::Message(format!(
                    "{} record(s) were deleted from table {}.",
                    n_deleted,
                    highlight_argument(table)
                )))
            }
            Command::Info { table } => Ok(CommandResult::Description(session.describe(table)?)),
            Command::History | Command::Help | Command::Exit => Ok(CommandResult::Nothing),
        }
    }
}

fn invalid(message: &str) -> DbError {
    DbError::InvalidCommand(message.to_string())
}

fn table_name(tokens: &[String], index: usize) -> Result<String> {
    tokens
        .get(index)
        .cloned()
        .ok_or_else(|| invalid("missing table name"))
}

fn expect_keyword(tokens: &[String], index: usize, keyword: &str) -> Result<()> {
    match tokens.get(index) {
        Some(token) if token.eq_ignore_ascii_case(keyword) => Ok(()),
        _ => Err(invalid(&format!("expected '{}'", keyword))),
    }
}

fn expect_len(tokens: &[String], len: usize, usage: &str) -> Result<()> {
    if tokens.len() == len {
        Ok(())
    } else {
        Err(invalid(&format!("usage: {}", usage)))
    }
}

fn position_of(tokens: &[String], keyword: &str) -> Option<usize> {
    tokens
        .iter()
        .position(|token| token.eq_ignore_ascii_case(keyword))
}

fn parse_predicate(tokens: &[String]) -> Result<Predicate> {
    let (column, value) = parse_condition(&tokens.join(" "))?;
    Ok(Predicate::new(column, value))
}
