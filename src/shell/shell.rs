use log::{debug, error, info, warn};
use std::error::Error;
use std::io::{self, IsTerminal, Write};

use crate::shell::executor::{Executor, Status};
use crate::shell::parser::Parser;
use crate::shell::readline::{ReadlineError, ReadlineManager};
use crate::utils::config::Config;
use crate::utils::path;
use crate::utils::theme::Theme;

pub struct Shell<'a> {
    theme: Theme,
    readline: ReadlineManager<'a>,
    executor: Executor,
}

impl<'a> Shell<'a> {
    pub fn new(config: &'a Config) -> Result<Self, ReadlineError> {
        Ok(Self {
            theme: Theme::new(io::stdout().is_terminal()),
            readline: ReadlineManager::new(config)?,
            executor: Executor::new(),
        })
    }

    /// Reads and runs lines until `exit` or end of input.
    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        debug!("starting forksh");
        self.readline.load_history();

        self.run_loop()?;
        self.readline.save_history();

        debug!("leaving forksh");
        Ok(())
    }

    fn run_loop(&mut self) -> Result<(), Box<dyn Error>> {
        loop {
            io::stdout().flush()?;
            let prompt = self.theme.prompt(&path::current_dir());

            match self.readline.readline(&prompt) {
                Ok(line) => {
                    if let Status::Terminate = self.handle_input(&line)? {
                        debug!("exit builtin, leaving the loop");
                        if self.readline.is_interactive() {
                            let message = self.theme.get_message("exit");
                            println!("{}", (self.theme.success_style)(message));
                        }
                        break;
                    }
                }
                Err(err) => match err {
                    ReadlineError::Eof => {
                        info!("end of input, leaving forksh");
                        break;
                    }
                    ReadlineError::Interrupted => {
                        warn!("interrupted");
                        println!(
                            "{}",
                            (self.theme.warning_style)(self.theme.get_message("interrupt_signal"))
                        );
                    }
                    err => {
                        error!("readline failed: {}", err);
                        return Err(err.into());
                    }
                },
            }
        }
        Ok(())
    }

    /// Parses and runs one line. Errors are reported here, not returned.
    pub fn handle_input(&mut self, line: &str) -> Result<Status, Box<dyn Error>> {
        if line.trim().is_empty() {
            return Ok(Status::SUCCESS);
        }
        self.readline.add_history(line)?;

        let node = match Parser::new(line).parse_command() {
            Ok(Some(node)) => node,
            Ok(None) => return Ok(Status::SUCCESS),
            Err(e) => {
                warn!("parse error in {:?}: {}", line, e);
                self.print_error(&format!("{}: {}", self.theme.get_message("parse_error"), e));
                return Ok(Status::Exited(2));
            }
        };

        match self.executor.execute(&node) {
            Ok(status) => {
                if let Status::Exited(code) = status {
                    if code != 0 {
                        info!("{} finished with exit code {}", node, code);
                    }
                }
                Ok(status)
            }
            Err(e) => {
                self.print_error(&e.to_string());
                Ok(self.executor.last_status())
            }
        }
    }

    pub fn last_status(&self) -> Status {
        self.executor.last_status()
    }

    fn print_error(&self, message: &str) {
        eprintln!(
            "{} {}",
            (self.theme.error_style)(self.theme.get_message("error_symbol")),
            (self.theme.error_style)(message.to_string())
        );
    }
}
