use clap::Parser;
use log::debug;
use std::process::ExitCode;

use forksh::shell::Shell;
use forksh::utils::config::Config;
use forksh::utils::log::init_logger;

#[derive(Parser)]
#[command(name = "forksh", version, about = "A small shell with builtins, redirection and pipes")]
struct Cli {
    /// Run one command line and exit with its status
    #[arg(short = 'c', value_name = "COMMAND")]
    command: Option<String>,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::new()?;
    init_logger(&config)?;
    debug!("config loaded from {}", config.config_dir.display());

    let mut shell = Shell::new(&config)?;
    match cli.command {
        Some(line) => {
            let status = shell.handle_input(&line)?;
            Ok(exit_code(status.code()))
        }
        None => {
            shell.run()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
