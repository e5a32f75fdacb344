//! The colors of the command line theme live here as constants, so every
//! message is painted the same way.
//!
//! - PRIMARY_BLUE: Main Color
//! - WARNING_AMBER: Prompts and cancellations

use colored::Color;

pub(crate) const PRIMARY_BLUE: Color = Color::TrueColor {
    r: 86,
    g: 156,
    b: 214,
};

pub(crate) const WARNING_AMBER: Color = Color::TrueColor {
    r: 229,
    g: 170,
    b: 60,
};
