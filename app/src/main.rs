mod cli;
mod dispatch;
mod driver;
mod error;
mod genesis;
mod logging;

use clap::Parser;

fn main() {
    logging::init_logger();

    let cli = cli::Cli::parse();
    let wall_clock = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock is before the unix epoch")
        .as_secs() as i64;

    if let Err(err) = cli::run(&cli, wall_clock) {
        log::error!("{err}");
        std::process::exit(1);
    }
}
