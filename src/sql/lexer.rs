/// SQL Lexer - converts SQL string into tokens

use super::token::{Token, TokenType};
use crate::error::{DbError, Result};

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole input. The last token is always `Eof`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = token.token_type == TokenType::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let column = self.column;

        if self.is_eof() {
            return Ok(Token::new(TokenType::Eof, "", line, column));
        }

        let ch = self.current_char();

        let token = match ch {
            '\'' => {
                let value = self.read_string(line, column)?;
                Token::new(TokenType::StringLiteral, value, line, column)
            }
            '0'..='9' => Token::new(TokenType::IntegerLiteral, self.read_number(), line, column),
            'a'..='z' | 'A'..='Z' | '_' => self.read_identifier(line, column),
            '=' | '!' | '<' | '>' => self.read_operator(line, column),
            _ => {
                self.advance();
                let token_type = match ch {
                    ';' => TokenType::Semicolon,
                    ',' => TokenType::Comma,
                    '(' => TokenType::LParen,
                    ')' => TokenType::RParen,
                    '*' => TokenType::Star,
                    // Not an error here; the parser reports it in context
                    _ => TokenType::Unknown,
                };
                Token::new(token_type, ch.to_string(), line, column)
            }
        };

        Ok(token)
    }

    fn current_char(&self) -> char {
        if self.is_eof() {
            '\0'
        } else {
            self.input[self.position]
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        if !self.is_eof() {
            if self.input[self.position] == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.position += 1;
        }
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while !self.is_eof() && self.current_char().is_whitespace() {
                self.advance();
            }

            if self.current_char() == '-' && self.peek_char() == Some('-') {
                while !self.is_eof() && self.current_char() != '\n' {
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_string(&mut self, line: usize, column: usize) -> Result<String> {
        self.advance(); // skip opening quote
        let mut value = String::new();

        while !self.is_eof() && self.current_char() != '\'' {
            if self.current_char() == '\\' {
                self.advance();
                if self.is_eof() {
                    break;
                }
                let escaped = match self.current_char() {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '\\' => '\\',
                    '\'' => '\'',
                    c => c,
                };
                value.push(escaped);
            } else {
                value.push(self.current_char());
            }
            self.advance();
        }

        if self.is_eof() {
            return Err(DbError::LexError(format!(
                "Unterminated string literal starting at line {} column {}",
                line, column
            )));
        }

        self.advance(); // skip closing quote
        Ok(value)
    }

    fn read_number(&mut self) -> String {
        let mut value = String::new();
        while !self.is_eof() && self.current_char().is_ascii_digit() {
            value.push(self.current_char());
            self.advance();
        }
        value
    }

    fn read_identifier(&mut self, line: usize, column: usize) -> Token {
        let mut value = String::new();

        while !self.is_eof() {
            let ch = self.current_char();
            if ch.is_ascii_alphanumeric() || ch == '_' {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let upper = value.to_ascii_uppercase();
        match TokenType::from_keyword(&upper) {
            Some(token_type) => Token::new(token_type, upper, line, column),
            None => Token::new(TokenType::Identifier, value, line, column),
        }
    }

    /// Longest match over `= != <> < > <= >=`
    fn read_operator(&mut self, line: usize, column: usize) -> Token {
        let first = self.current_char();
        self.advance();
        let next = self.current_char();

        let (token_type, text) = match (first, next) {
            ('!', '=') => (TokenType::Ne, "!="),
            ('<', '=') => (TokenType::Le, "<="),
            ('<', '>') => (TokenType::Ne, "<>"),
            ('>', '=') => (TokenType::Ge, ">="),
            ('=', _) => return Token::new(TokenType::Eq, "=", line, column),
            ('<', _) => return Token::new(TokenType::Lt, "<", line, column),
            ('>', _) => return Token::new(TokenType::Gt, ">", line, column),
            _ => return Token::new(TokenType::Unknown, first.to_string(), line, column),
        };

        self.advance();
        Token::new(token_type, text, line, column)
    }
}

/// Tokenize `input` in one call
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).tokenize()
}
