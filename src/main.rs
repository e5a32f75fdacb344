use clap::Parser;
use primitive_db::cli::{self, parsers::CliParser};
use primitive_db::config::Config;

fn main() {
    let config = Config::load(CliParser::parse());

    env_logger::Builder::new()
        .filter_level(config.log_level)
        .parse_default_env()
        .init();

    log::debug!("starting with {:?}", config);

    cli::run_client(config);
}
