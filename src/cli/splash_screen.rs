//! The banner shown when the client starts:
//! - Title
//! - Short Description
//! - Version Information

use colored::*;

use crate::cli::colors::PRIMARY_BLUE;

pub fn splash_screen() {
    show_splash_screen();
    show_version_info();
}

fn show_splash_screen() {
    print!(
        r#"
    {}
        "#,
        r"
    ┌─┐┬─┐┬┌┬┐┬┌┬┐┬┬  ┬┌─┐  ┌┬┐┌┐
    ├─┘├┬┘│││││ │ │└┐┌┘├┤    ││├┴┐
    ┴  ┴└─┴┴ ┴┴ ┴ ┴ └┘ └─┘  ─┴┘└─┘
        "
        .color(PRIMARY_BLUE)
    )
}

fn show_version_info() {
    println!(
        r"
    {}

    Version {}
        ",
        env!("CARGO_PKG_DESCRIPTION").color(PRIMARY_BLUE),
        env!("CARGO_PKG_VERSION").color(PRIMARY_BLUE).italic(),
    )
}
