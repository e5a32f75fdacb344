//! General message formatting functions for prettifying the CLI.
//! Includes basic utility functions such as:
//!
//! - Highlight Text (paint the text in the primary color, not bold)
//! - System message formatting functions that produce the same
//! format messages.

use colored::Colorize;

use crate::cli::colors::{PRIMARY_BLUE, WARNING_AMBER};

pub fn highlight_argument(argument: &str) -> String {
    //! Highlight a piece of text in the primary color to make it obvious.
    //!
    //! Returns a formatted string.

    format!("{}", argument.color(PRIMARY_BLUE))
}

pub fn system_message(source_name: &str, message: String) -> String {
    //! Format a message on the command line according to the theme.
    //!
    //! Takes in a source name (like 'system') and the message as a
    //! formatted text; output of [`format!`].

    let source_formatted = format!("{:6}", source_name.color(PRIMARY_BLUE).bold());

    format!("[{}] {}", source_formatted, message)
}

pub fn warning_message(source_name: &str, message: String) -> String {
    let source_formatted = format!("{:6}", source_name.color(WARNING_AMBER).bold());

    format!("[{}] {}", source_formatted, message)
}
