use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Word(String),
    Pipe,
    Redirect(RedirectOp),
    Background,
    Semi,
    And,
    Or,
    /// Input ended inside a quote opened with this character.
    Unterminated(char),
    EOF,
}

impl Token {
    /// Separator symbol for tokens that join two commands.
    pub fn separator(&self) -> Option<&'static str> {
        match self {
            Token::Pipe => Some("|"),
            Token::Semi => Some(";"),
            Token::Background => Some("&"),
            Token::And => Some("&&"),
            Token::Or => Some("||"),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum RedirectOp {
    Input,       // <
    Output,      // >
    Append,      // >>
    Error,       // 2>
    ErrorAppend, // 2>>
}

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.chars().peekable(),
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        match self.peek_char() {
            None => Token::EOF,
            Some(c) => match c {
                '|' => {
                    self.read_char();
                    if self.peek_char() == Some('|') {
                        self.read_char();
                        Token::Or
                    } else {
                        Token::Pipe
                    }
                }
                ';' => {
                    self.read_char();
                    Token::Semi
                }
                '&' => {
                    self.read_char();
                    if self.peek_char() == Some('&') {
                        self.read_char();
                        Token::And
                    } else {
                        Token::Background
                    }
                }
                '<' => {
                    self.read_char();
                    Token::Redirect(RedirectOp::Input)
                }
                '>' => {
                    self.read_char();
                    if self.peek_char() == Some('>') {
                        self.read_char();
                        Token::Redirect(RedirectOp::Append)
                    } else {
                        Token::Redirect(RedirectOp::Output)
                    }
                }
                _ => self.read_word(),
            },
        }
    }

    fn read_char(&mut self) -> Option<char> {
        self.input.next()
    }

    fn peek_char(&mut self) -> Option<char> {
        self.input.peek().copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if !c.is_whitespace() {
                break;
            }
            self.read_char();
        }
    }

    fn read_word(&mut self) -> Token {
        let mut word = String::new();
        let mut quoted = false;
        let tilde = self.peek_char() == Some('~');

        while let Some(c) = self.peek_char() {
            if c.is_whitespace() || ";<>|&".contains(c) {
                break;
            }
            if c == '"' || c == '\'' {
                quoted = true;
                if let Err(quote) = self.read_quoted(&mut word) {
                    return Token::Unterminated(quote);
                }
                continue;
            }
            if let Some(c) = self.read_char() {
                word.push(c);
            }
        }

        // `2>` and `2>>` only when the 2 stands alone before the arrow
        if !quoted && word == "2" && self.peek_char() == Some('>') {
            self.read_char();
            if self.peek_char() == Some('>') {
                self.read_char();
                return Token::Redirect(RedirectOp::ErrorAppend);
            }
            return Token::Redirect(RedirectOp::Error);
        }

        if tilde {
            word = shellexpand::tilde(&word).into_owned();
        }
        Token::Word(word)
    }

    /// Appends one quoted segment to `word`. Returns the quote character if
    /// the input ends before the closing quote.
    fn read_quoted(&mut self, word: &mut String) -> Result<(), char> {
        let quote = self.read_char().unwrap_or_default();
        let mut escaped = false;

        while let Some(c) = self.read_char() {
            match (escaped, c) {
                (true, c) => {
                    // inside double quotes only these lose their backslash
                    if !"\"\\$`".contains(c) {
                        word.push('\\');
                    }
                    word.push(c);
                    escaped = false;
                }
                (false, '\\') if quote == '"' => escaped = true,
                (false, c) if c == quote => return Ok(()),
                (false, c) => word.push(c),
            }
        }

        Err(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_command() {
        let mut lexer = Lexer::new("ls -l");
        assert_eq!(lexer.next_token(), Token::Word("ls".to_string()));
        assert_eq!(lexer.next_token(), Token::Word("-l".to_string()));
        assert_eq!(lexer.next_token(), Token::EOF);
    }

    #[test]
    fn test_pipe() {
        let mut lexer = Lexer::new("ls | grep foo");
        assert_eq!(lexer.next_token(), Token::Word("ls".to_string()));
        assert_eq!(lexer.next_token(), Token::Pipe);
        assert_eq!(lexer.next_token(), Token::Word("grep".to_string()));
        assert_eq!(lexer.next_token(), Token::Word("foo".to_string()));
        assert_eq!(lexer.next_token(), Token::EOF);
    }

    #[test]
    fn test_redirections() {
        let mut lexer = Lexer::new("sort < in.txt >> out.txt 2> err.txt");
        assert_eq!(lexer.next_token(), Token::Word("sort".to_string()));
        assert_eq!(lexer.next_token(), Token::Redirect(RedirectOp::Input));
        assert_eq!(lexer.next_token(), Token::Word("in.txt".to_string()));
        assert_eq!(lexer.next_token(), Token::Redirect(RedirectOp::Append));
        assert_eq!(lexer.next_token(), Token::Word("out.txt".to_string()));
        assert_eq!(lexer.next_token(), Token::Redirect(RedirectOp::Error));
        assert_eq!(lexer.next_token(), Token::Word("err.txt".to_string()));
        assert_eq!(lexer.next_token(), Token::EOF);
    }

    #[test]
    fn test_two_is_a_word_unless_followed_by_arrow() {
        let mut lexer = Lexer::new("head -n 2 2>>log");
        assert_eq!(lexer.next_token(), Token::Word("head".to_string()));
        assert_eq!(lexer.next_token(), Token::Word("-n".to_string()));
        assert_eq!(lexer.next_token(), Token::Word("2".to_string()));
        assert_eq!(lexer.next_token(), Token::Redirect(RedirectOp::ErrorAppend));
        assert_eq!(lexer.next_token(), Token::Word("log".to_string()));
    }

    #[test]
    fn test_separators() {
        let mut lexer = Lexer::new("a && b || c ; d &");
        let mut separators = Vec::new();
        loop {
            let token = lexer.next_token();
            if token == Token::EOF {
                break;
            }
            if let Some(symbol) = token.separator() {
                separators.push(symbol);
            }
        }
        assert_eq!(separators, vec!["&&", "||", ";", "&"]);
    }

    #[test]
    fn test_quoted_strings() {
        let mut lexer = Lexer::new(r#"printf "b\na \"q\"" 'foo \bar'"#);
        assert_eq!(lexer.next_token(), Token::Word("printf".to_string()));
        assert_eq!(lexer.next_token(), Token::Word(r#"b\na "q""#.to_string()));
        assert_eq!(lexer.next_token(), Token::Word(r"foo \bar".to_string()));
        assert_eq!(lexer.next_token(), Token::EOF);
    }

    #[test]
    fn test_tilde_expands_in_bare_words_only() {
        let mut lexer = Lexer::new("ls '~'");
        lexer.next_token();
        assert_eq!(lexer.next_token(), Token::Word("~".to_string()));
    }

    #[test]
    fn test_quotes_inside_a_word_are_joined() {
        let mut lexer = Lexer::new(r#"ls foo"bar" a'b c'd "x"y"#);
        assert_eq!(lexer.next_token(), Token::Word("ls".to_string()));
        assert_eq!(lexer.next_token(), Token::Word("foobar".to_string()));
        assert_eq!(lexer.next_token(), Token::Word("ab cd".to_string()));
        assert_eq!(lexer.next_token(), Token::Word("xy".to_string()));
        assert_eq!(lexer.next_token(), Token::EOF);
    }

    #[test]
    fn test_quoted_two_is_not_a_redirection() {
        let mut lexer = Lexer::new(r#"echo "2">out"#);
        lexer.next_token();
        assert_eq!(lexer.next_token(), Token::Word("2".to_string()));
        assert_eq!(lexer.next_token(), Token::Redirect(RedirectOp::Output));
    }

    #[test]
    fn test_unterminated_quote() {
        let mut lexer = Lexer::new(r#"echo "abc"#);
        lexer.next_token();
        assert_eq!(lexer.next_token(), Token::Unterminated('"'));

        let mut lexer = Lexer::new("echo ab'c d");
        lexer.next_token();
        assert_eq!(lexer.next_token(), Token::Unterminated('\''));
    }
}
