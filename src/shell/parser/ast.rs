use std::fmt;
use std::path::PathBuf;

/// Which builtin, if any, a leaf command names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Builtin {
    #[default]
    None,
    ChangeDirectory,
    Exit,
}

impl Builtin {
    pub fn from_program(program: &str) -> Self {
        match program {
            "cd" => Builtin::ChangeDirectory,
            "exit" => Builtin::Exit,
            _ => Builtin::None,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, Builtin::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimpleCommand {
    /// Program name followed by its arguments.
    pub tokens: Vec<String>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub error: Option<PathBuf>,
    pub builtin: Builtin,
}

impl SimpleCommand {
    /// Builds a command from its words, tagging `cd` and `exit`.
    pub fn new(tokens: Vec<String>) -> Self {
        let builtin = tokens
            .first()
            .map(|program| Builtin::from_program(program))
            .unwrap_or_default();
        Self {
            tokens,
            builtin,
            ..Default::default()
        }
    }

    pub fn program(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }
}

/// Separator between two subtrees. Only `|` can be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Pipe,
    Unsupported(String),
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "|" => Operator::Pipe,
            other => Operator::Unsupported(other.to_string()),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Pipe => write!(f, "|"),
            Operator::Unsupported(symbol) => write!(f, "{}", symbol),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandNode {
    Leaf(SimpleCommand),
    Pipe {
        operator: Operator,
        left: Box<CommandNode>,
        right: Box<CommandNode>,
    },
}

impl CommandNode {
    pub fn pipe(operator: Operator, left: CommandNode, right: CommandNode) -> Self {
        CommandNode::Pipe {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// The leaf command when this tree has no separators at all.
    pub fn as_simple(&self) -> Option<&SimpleCommand> {
        match self {
            CommandNode::Leaf(command) => Some(command),
            CommandNode::Pipe { .. } => None,
        }
    }
}

impl fmt::Display for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandNode::Leaf(command) => write!(f, "{}", command.tokens.join(" ")),
            CommandNode::Pipe {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
        }
    }
}
