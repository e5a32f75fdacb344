//! Cross-cutting wrappers around the session calls of the REPL.
//!
//! - [`handle_db_errors`] prints a failed result and turns it into `None`
//! - [`confirm_action`] asks the user before destructive commands
//! - [`log_time`] reports how long a call took

use std::io::{self, BufRead, Write};
use std::time::Instant;

use crate::cli::messages::{highlight_argument, system_message, warning_message};
use crate::persistence::{DbError, Result};

pub fn handle_db_errors<T>(result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            println!("{}", describe_error(&error));
            None
        }
    }
}

pub fn describe_error(error: &DbError) -> String {
    //! Format an error the way the REPL shows it, labelled by the kind of
    //! failure.

    let source = match error {
        DbError::DuplicateTable(_) | DbError::TableNotFound(_) | DbError::ColumnNotFound(_) => {
            "error"
        }
        DbError::InvalidSpec(_)
        | DbError::ReservedName(_)
        | DbError::ColumnCountMismatch { .. }
        | DbError::InvalidValue { .. }
        | DbError::IdExhausted(_) => "value",
        DbError::InvalidCommand(_) => "parser",
        DbError::Io(error) if error.kind() == io::ErrorKind::NotFound => "file",
        DbError::Io(_) | DbError::Json(_) => "storage",
    };

    system_message(source, error.to_string())
}

pub fn confirm_action(action_name: &str, assume_yes: bool) -> bool {
    //! Ask whether `action_name` should go ahead, on stdin/stdout.
    //!
    //! With `assume_yes` the question is skipped. A failed read counts as no.

    if assume_yes {
        return true;
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    confirm_with(action_name, &mut stdin.lock(), &mut stdout).unwrap_or(false)
}

pub fn confirm_with<R: BufRead, W: Write>(
    action_name: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    //! Only an answer of `y` (any case) confirms the action.

    write!(
        output,
        "Are you sure you want to {}? [y/n]: ",
        highlight_argument(action_name)
    )?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    let confirmed = answer.trim().eq_ignore_ascii_case("y");
    if !confirmed {
        writeln!(
            output,
            "{}",
            warning_message("system", "Operation cancelled by the user.".to_string())
        )?;
    }

    Ok(confirmed)
}

pub fn log_time<T, F>(name: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    log::info!(
        "{} finished in {:.3} seconds",
        name,
        start.elapsed().as_secs_f64()
    );
    result
}
