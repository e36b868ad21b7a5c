use std::env;

use log::error;

/// Working directory for the prompt; empty when it cannot be read.
pub fn current_dir() -> String {
    let _current_dir = match env::current_dir() {
        Ok(x) => x,
        Err(e) => {
            error!("forksh: PROMPT: env current_dir error: {}", e);
            return String::new();
        }
    };
    let current_dir = match _current_dir.to_str() {
        Some(x) => x,
        None => {
            error!("forksh: PROMPT: to_str error");
            return String::new();
        }
    };

    current_dir.to_string()
}
