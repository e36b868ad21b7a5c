use crate::utils::config::Config;
use log::{debug, error, warn};
pub use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::Editor;
use rustyline::{CompletionType, Config as RLConfig};
use std::io::{self, BufRead, IsTerminal};

enum Input {
    Editor(Box<Editor<(), FileHistory>>),
    /// stdin is not a terminal: no prompt, no history.
    Plain(io::StdinLock<'static>),
}

pub struct ReadlineManager<'a> {
    config: &'a Config,
    input: Input,
}

impl<'a> ReadlineManager<'a> {
    pub fn new(config: &'a Config) -> Result<Self, ReadlineError> {
        if !io::stdin().is_terminal() {
            debug!("stdin is not a terminal, reading lines without an editor");
            return Ok(Self {
                config,
                input: Input::Plain(io::stdin().lock()),
            });
        }

        let rl_config = RLConfig::builder()
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .edit_mode(config.get_edit_mode())
            .build();

        let editor = Editor::with_config(rl_config).inspect_err(|err| {
            error!("cannot initialise readline: {}", err);
        })?;
        Ok(Self {
            config,
            input: Input::Editor(Box::new(editor)),
        })
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self.input, Input::Editor(_))
    }

    pub fn load_history(&mut self) {
        let Input::Editor(editor) = &mut self.input else {
            return;
        };
        if let Err(err) = editor.load_history(&self.config.history_file) {
            warn!(
                "cannot load history {}: {}",
                self.config.history_file.display(),
                err
            );
        } else {
            debug!("history loaded");
        }
    }

    pub fn readline(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        match &mut self.input {
            Input::Editor(editor) => editor.readline(prompt),
            Input::Plain(stdin) => {
                let mut line = String::new();
                if stdin.read_line(&mut line)? == 0 {
                    return Err(ReadlineError::Eof);
                }
                Ok(line.trim_end_matches(['\n', '\r']).to_string())
            }
        }
    }

    pub fn add_history(&mut self, line: &str) -> Result<bool, ReadlineError> {
        match &mut self.input {
            Input::Editor(editor) => editor.add_history_entry(line),
            Input::Plain(_) => Ok(false),
        }
    }

    pub fn save_history(&mut self) {
        let Input::Editor(editor) = &mut self.input else {
            return;
        };
        if let Err(err) = editor.save_history(&self.config.history_file) {
            error!("saving history failed: {}", err);
        } else {
            debug!("history saved");
        }
    }
}
