use dotenv::dotenv;
use rustyline::EditMode;
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub name: String,
    pub config_dir: PathBuf,
    pub history_file: PathBuf,
    pub editor_mode: String,
    pub logger_level: String,
    pub logger_dir: PathBuf,
    pub logger_echo: bool,
}

impl Config {
    fn get_config_dir() -> PathBuf {
        if let Ok(home) = env::var("HOME") {
            PathBuf::from(home).join(".config/forksh")
        } else {
            env::temp_dir().join("forksh")
        }
    }

    fn default() -> Self {
        let config_dir = Self::get_config_dir();
        Config {
            name: String::from("forksh"),
            history_file: config_dir.join(".forksh_history"),
            editor_mode: String::from("vi"),
            logger_level: String::from("info"),
            logger_dir: config_dir.join("logs"),
            logger_echo: false,
            config_dir,
        }
    }

    pub fn new() -> io::Result<Self> {
        // .env files first, then the process environment
        if cfg!(debug_assertions) {
            dotenv::from_filename(".env.development").ok();
        } else {
            dotenv().ok();
        }

        let config = Self::from_lookup(|key| env::var(key).ok());

        // the history file needs its directory
        if let Some(parent) = config.history_file.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(config)
    }

    /// Defaults overridden by whatever `lookup` finds for the FORKSH_* keys.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(editor) = lookup("FORKSH_EDITOR") {
            config.editor_mode = editor;
        }

        if let Some(history) = lookup("FORKSH_HISTORY") {
            config.history_file = PathBuf::from(history);
        }

        if let Some(level) = lookup("FORKSH_LOG_LEVEL") {
            config.logger_level = level;
        }

        if let Some(dir) = lookup("FORKSH_LOG_DIR") {
            config.logger_dir = PathBuf::from(dir);
        }

        config.logger_echo = lookup("FORKSH_LOG_ECHO").is_some();

        config
    }

    pub fn get_edit_mode(&self) -> EditMode {
        match self.editor_mode.to_lowercase().as_str() {
            "emacs" => EditMode::Emacs,
            _ => EditMode::Vi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.name, "forksh");
        assert_eq!(config.logger_level, "info");
        assert!(!config.logger_echo);
        assert!(config.history_file.ends_with(".forksh_history"));
        assert!(matches!(config.get_edit_mode(), EditMode::Vi));
    }

    #[test]
    fn test_environment_overrides() {
        let vars: HashMap<&str, &str> = [
            ("FORKSH_EDITOR", "Emacs"),
            ("FORKSH_HISTORY", "/tmp/forksh/history"),
            ("FORKSH_LOG_LEVEL", "debug"),
            ("FORKSH_LOG_DIR", "/tmp/forksh/logs"),
            ("FORKSH_LOG_ECHO", "1"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert!(matches!(config.get_edit_mode(), EditMode::Emacs));
        assert_eq!(config.history_file, PathBuf::from("/tmp/forksh/history"));
        assert_eq!(config.logger_level, "debug");
        assert_eq!(config.logger_dir, PathBuf::from("/tmp/forksh/logs"));
        assert!(config.logger_echo);
    }
}
