use std::{
    io::{self, Write},
    sync::{Arc, RwLock},
};

use colored::Colorize;

use crate::{
    cli::{
        colors::PRIMARY_BLUE,
        commands::{COMMANDS_LIST, Command, CommandExecutor, CommandResult},
        decorators::handle_db_errors,
        messages::{highlight_argument, system_message},
        render::render_records,
    },
    config::Config,
    sessions::session::Session,
};

mod colors;
pub mod commands;
pub mod decorators;
mod messages;
pub mod parsers;
pub mod render;
mod splash_screen;

const DEFAULT_LAST_COMMAND_DELIMITER: &str = "!";

pub fn run_client(config: Config) {
    if config.splash {
        splash_screen::splash_screen();
    }

    println!(
        "{}",
        system_message(
            "info",
            format!(
                "Tables are stored in '{}'.",
                highlight_argument(&config.data_dir.display().to_string())
            )
        )
    );

    let session = Arc::new(RwLock::new(Session::client(config)));
    start_repl(session);
}

pub fn show_help() {
    println!();
    println!("{:56} {}", "COMMAND".color(PRIMARY_BLUE), "DETAILS");
    for (command, details) in COMMANDS_LIST {
        println!("{:56} {}", command.color(PRIMARY_BLUE), details)
    }
}

fn read_line() -> Option<String> {
    //! Read one line from stdin; `None` on end of input or a read error.

    let mut buffer = String::new();
    match io::stdin().read_line(&mut buffer) {
        Ok(0) => None,
        Ok(_) => Some(buffer),
        Err(error) => {
            log::error!("failed reading stdin: {}", error);
            None
        }
    }
}

fn start_repl(client_session: Arc<RwLock<Session>>) {
    println!(
        "{}",
        system_message(
            "system",
            format!(
                "Use '{}' to quit and '{}' to know all commands available.",
                highlight_argument("exit"),
                highlight_argument("help"),
            ),
        )
    );

    if let Ok(session) = client_session.read() {
        println!(
            "{}",
            system_message(
                "system",
                format!(
                    "New session initiated at '{}'.",
                    highlight_argument(&session.start_time_string())
                ),
            )
        );
    }

    loop {
        println!();
        print!("{:6} > ", "db".color(PRIMARY_BLUE).bold());
        if io::stdout().flush().is_err() {
            break;
        }

        let Some(mut buffer) = read_line() else {
            break;
        };

        if buffer.trim().is_empty() {
            continue;
        }

        if buffer.starts_with(DEFAULT_LAST_COMMAND_DELIMITER) {
            let last = buffer.matches(DEFAULT_LAST_COMMAND_DELIMITER).count();
            let last_command = client_session
                .read()
                .ok()
                .and_then(|session| session.get_last_command(last).map(str::to_string));

            match last_command {
                Some(command) => buffer = command,
                None => {
                    println!(
                        "{}",
                        system_message(
                            "system",
                            format!(
                                "No command {} steps back.",
                                highlight_argument(&last.to_string())
                            ),
                        )
                    );
                    continue;
                }
            }
        }

        if let Ok(mut session) = client_session.write() {
            session.add_to_command_history(buffer.trim());
        }

        let Some(command) = handle_db_errors(Command::parse(buffer.trim())) else {
            continue;
        };

        match command {
            Command::Exit => break,
            Command::Help => show_help(),
            Command::History => {
                if let Ok(session) = client_session.read() {
                    for line in session.command_history_lines(None) {
                        println!("{}", line);
                    }
                }
            }
            command => {
                let executor = CommandExecutor::new(command, &client_session);
                if let Some(result) = handle_db_errors(executor.execute()) {
                    show_result(result);
                }
            }
        }
    }

    println!("Goodbye!")
}

fn show_result(result: CommandResult) {
    match result {
        CommandResult::Message(message) => println!("{}", system_message("db", message)),
        CommandResult::Records(records) => println!("{}", render_records(&records)),
        CommandResult::Tables(tables) => {
            if tables.is_empty() {
                println!("There are no tables yet.");
            } else {
                for table_name in tables {
                    println!("- {}", table_name);
                }
            }
        }
        CommandResult::Description(description) => println!("{}", description),
        CommandResult::Cancelled | CommandResult::Nothing => {}
    }
}
