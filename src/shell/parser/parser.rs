use std::fmt;
use std::path::PathBuf;

use super::ast::{CommandNode, Operator, SimpleCommand};
use super::lexer::{Lexer, RedirectOp, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    ExpectedCommand,
    ExpectedFilename(String),
    DanglingOperator(String),
    UnterminatedQuote(char),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::ExpectedCommand => write!(f, "expected command name"),
            ParseError::ExpectedFilename(op) => {
                write!(f, "expected filename after redirection operator {}", op)
            }
            ParseError::DanglingOperator(op) => write!(f, "missing command after {}", op),
            ParseError::UnterminatedQuote(quote) => write!(f, "unterminated {} quote", quote),
        }
    }
}

impl std::error::Error for ParseError {}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token();
        Parser {
            lexer,
            current_token,
        }
    }

    fn next_token(&mut self) {
        self.current_token = self.lexer.next_token();
    }

    /// Parses a whole line. Blank input yields `Ok(None)`.
    ///
    /// Separators bind to the left, so `a | b | c` becomes `(a | b) | c`.
    pub fn parse_command(&mut self) -> Result<Option<CommandNode>, ParseError> {
        if self.current_token == Token::EOF {
            return Ok(None);
        }

        let mut node = CommandNode::Leaf(self.parse_simple_command()?);

        while let Some(symbol) = self.current_token.separator() {
            self.next_token();
            if self.current_token == Token::EOF {
                // a trailing `;` or `&` is harmless, a trailing `|` is not
                if matches!(symbol, ";" | "&") {
                    break;
                }
                return Err(ParseError::DanglingOperator(symbol.to_string()));
            }
            let right = CommandNode::Leaf(self.parse_simple_command()?);
            node = CommandNode::pipe(Operator::from_symbol(symbol), node, right);
        }

        Ok(Some(node))
    }

    fn parse_simple_command(&mut self) -> Result<SimpleCommand, ParseError> {
        let mut words = Vec::new();
        let mut input = None;
        let mut output = None;
        let mut error = None;

        loop {
            match &self.current_token {
                Token::Word(word) => {
                    words.push(word.clone());
                    self.next_token();
                }
                Token::Redirect(op) => {
                    let op = op.clone();
                    let filename = self.parse_redirection(&op)?;
                    match op {
                        RedirectOp::Input => input = Some(filename),
                        RedirectOp::Output | RedirectOp::Append => output = Some(filename),
                        RedirectOp::Error | RedirectOp::ErrorAppend => error = Some(filename),
                    }
                }
                Token::Unterminated(quote) => return Err(ParseError::UnterminatedQuote(*quote)),
                _ => break,
            }
        }

        if words.is_empty() {
            return Err(ParseError::ExpectedCommand);
        }

        Ok(SimpleCommand {
            input,
            output,
            error,
            ..SimpleCommand::new(words)
        })
    }

    fn parse_redirection(&mut self, operator: &RedirectOp) -> Result<PathBuf, ParseError> {
        self.next_token(); // skip the operator

        match &self.current_token {
            Token::Word(filename) => {
                let path = PathBuf::from(filename);
                self.next_token();
                Ok(path)
            }
            Token::Unterminated(quote) => Err(ParseError::UnterminatedQuote(*quote)),
            _ => Err(ParseError::ExpectedFilename(symbol_of(operator).to_string())),
        }
    }
}

fn symbol_of(op: &RedirectOp) -> &'static str {
    match op {
        RedirectOp::Input => "<",
        RedirectOp::Output => ">",
        RedirectOp::Append => ">>",
        RedirectOp::Error => "2>",
        RedirectOp::ErrorAppend => "2>>",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::parser::ast::Builtin;

    fn parse(line: &str) -> CommandNode {
        match Parser::new(line).parse_command() {
            Ok(Some(node)) => node,
            other => panic!("unexpected parse result for {:?}: {:?}", line, other),
        }
    }

    #[test]
    fn test_simple_command() {
        let node = parse("ls -l");

        match node {
            CommandNode::Leaf(cmd) => {
                assert_eq!(cmd.tokens, vec!["ls", "-l"]);
                assert!(cmd.input.is_none());
                assert!(cmd.output.is_none());
                assert!(cmd.error.is_none());
                assert_eq!(cmd.builtin, Builtin::None);
            }
            _ => panic!("Expected simple command"),
        }
    }

    #[test]
    fn test_pipeline() {
        let node = parse("ls -l | grep foo");

        match node {
            CommandNode::Pipe {
                operator,
                left,
                right,
            } => {
                assert_eq!(operator, Operator::Pipe);
                let left = left.as_simple().map(|c| c.tokens.clone());
                assert_eq!(left, Some(vec!["ls".to_string(), "-l".to_string()]));
                assert_eq!(right.as_simple().and_then(|c| c.program()), Some("grep"));
            }
            _ => panic!("Expected pipeline"),
        }
    }

    #[test]
    fn test_pipeline_is_left_associative() {
        assert_eq!(parse("a | b | c").to_string(), "((a | b) | c)");
    }

    #[test]
    fn test_redirection() {
        let node = parse("sort < in.txt > out.txt 2>> err.txt");
        let cmd = node.as_simple().cloned().unwrap_or_default();

        assert_eq!(cmd.tokens, vec!["sort"]);
        assert_eq!(cmd.input, Some(PathBuf::from("in.txt")));
        assert_eq!(cmd.output, Some(PathBuf::from("out.txt")));
        assert_eq!(cmd.error, Some(PathBuf::from("err.txt")));
    }

    #[test]
    fn test_redirection_before_words() {
        let cmd = parse("> out.txt echo hi").as_simple().cloned().unwrap_or_default();
        assert_eq!(cmd.tokens, vec!["echo", "hi"]);
        assert_eq!(cmd.output, Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn test_builtins_are_tagged() {
        let cd = parse("cd /tmp");
        assert_eq!(cd.as_simple().map(|c| c.builtin), Some(Builtin::ChangeDirectory));
        let exit = parse("exit");
        assert_eq!(exit.as_simple().map(|c| c.builtin), Some(Builtin::Exit));
    }

    #[test]
    fn test_other_separators_parse_as_unsupported() {
        match parse("true && false") {
            CommandNode::Pipe { operator, .. } => {
                assert_eq!(operator, Operator::Unsupported("&&".to_string()))
            }
            _ => panic!("Expected operator node"),
        }
    }

    #[test]
    fn test_trailing_background_is_dropped() {
        assert!(parse("sleep 1 &").as_simple().is_some());
    }

    #[test]
    fn test_errors() {
        assert_eq!(Parser::new("   ").parse_command(), Ok(None));
        assert_eq!(
            Parser::new("ls |").parse_command(),
            Err(ParseError::DanglingOperator("|".to_string()))
        );
        assert_eq!(
            Parser::new("| ls").parse_command(),
            Err(ParseError::ExpectedCommand)
        );
        assert_eq!(
            Parser::new("echo >").parse_command(),
            Err(ParseError::ExpectedFilename(">".to_string()))
        );
    }

    #[test]
    fn test_quoted_segments_form_one_argument() {
        let cmd = parse(r#"ls foo"bar" > "out file".txt"#)
            .as_simple()
            .cloned()
            .unwrap_or_default();
        assert_eq!(cmd.tokens, vec!["ls", "foobar"]);
        assert_eq!(cmd.output, Some(PathBuf::from("out file.txt")));
    }

    #[test]
    fn test_unterminated_quote_is_an_error() {
        assert_eq!(
            Parser::new(r#"echo "abc"#).parse_command(),
            Err(ParseError::UnterminatedQuote('"'))
        );
        assert_eq!(
            Parser::new("cat < 'in").parse_command(),
            Err(ParseError::UnterminatedQuote('\''))
        );
        assert_eq!(
            Parser::new(r#"ls | grep "x"#).parse_command(),
            Err(ParseError::UnterminatedQuote('"'))
        );
        assert_eq!(
            ParseError::UnterminatedQuote('"').to_string(),
            "unterminated \" quote"
        );
    }
}
