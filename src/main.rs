use clap::Parser;

use tarbak::backup;
use tarbak::cli::Cli;
use tarbak::config::{Config, Settings};

fn main() {
    let cli = Cli::parse();
    let settings = Settings::load();

    let config = match Config::from_args(&cli, &settings) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(e.exit_code());
        }
    };

    match backup::run(&config) {
        Ok(_) => {
            println!("Backup ended at {}", chrono::Local::now().format("%d/%m/%Y, %H:%M:%S"));
            println!("------");
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(e.exit_code());
        }
    }
}
