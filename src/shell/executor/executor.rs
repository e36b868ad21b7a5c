use log::debug;

use super::error::ExecError;
use super::pipeline;
use super::simple;
use super::status::Status;
use crate::shell::parser::ast::{CommandNode, SimpleCommand};

/// Entry points the shell loop uses to run parsed command lines.
pub struct Executor {
    last_status: Status,
}

impl Executor {
    pub fn new() -> Self {
        Self {
            last_status: Status::SUCCESS,
        }
    }

    /// Runs `node`, picking the simple or the pipeline path by its shape.
    pub fn execute(&mut self, node: &CommandNode) -> Result<Status, ExecError> {
        match node {
            CommandNode::Leaf(command) => self.execute_simple(command),
            CommandNode::Pipe { .. } => self.execute_complex(node),
        }
    }

    pub fn execute_simple(&mut self, command: &SimpleCommand) -> Result<Status, ExecError> {
        debug!("running command {:?}", command.tokens);
        self.record(simple::execute_simple(command))
    }

    pub fn execute_complex(&mut self, node: &CommandNode) -> Result<Status, ExecError> {
        debug!("running pipeline {}", node);
        self.record(pipeline::execute_complex(node))
    }

    /// Status of the most recent command; failures to run count as 1.
    pub fn last_status(&self) -> Status {
        self.last_status
    }

    fn record(&mut self, result: Result<Status, ExecError>) -> Result<Status, ExecError> {
        self.last_status = match &result {
            Ok(status) => *status,
            Err(_) => Status::FAILURE,
        };
        result
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}
