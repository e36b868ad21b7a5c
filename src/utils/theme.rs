use colored::Colorize;

type Style = Box<dyn Fn(String) -> String>;

pub struct Theme {
    pub prompt_style: Style,
    pub error_style: Style,
    pub success_style: Style,
    pub warning_style: Style,
}

impl Theme {
    /// Colored styles, or plain pass-through when `color` is false.
    pub fn new(color: bool) -> Self {
        if !color {
            return Theme {
                prompt_style: Box::new(|s| s),
                error_style: Box::new(|s| s),
                success_style: Box::new(|s| s),
                warning_style: Box::new(|s| s),
            };
        }
        Theme {
            prompt_style: Box::new(|s| s.bright_cyan().to_string()),
            error_style: Box::new(|s| s.bright_red().to_string()),
            success_style: Box::new(|s| s.bright_magenta().to_string()),
            warning_style: Box::new(|s| s.yellow().to_string()),
        }
    }

    pub fn get_message(&self, key: &str) -> String {
        match key {
            "error_symbol" => "✗",
            "exit" => "bye",
            "interrupt_signal" => "interrupted",
            "parse_error" => "parse error",
            _ => "",
        }
        .to_string()
    }

    pub fn prompt(&self, cwd: &str) -> String {
        format!("{}> ", (self.prompt_style)(cwd.to_string()))
    }
}
