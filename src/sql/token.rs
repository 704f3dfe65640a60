/// Token types for SQL lexer
use phf::phf_map;
use std::fmt;

// Keys are uppercase; the lexer uppercases a word before lookup.
static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "CREATE" => TokenType::Create,
    "DROP" => TokenType::Drop,
    "TABLE" => TokenType::Table,
    "INSERT" => TokenType::Insert,
    "INTO" => TokenType::Into,
    "SELECT" => TokenType::Select,
    "FROM" => TokenType::From,
    "WHERE" => TokenType::Where,
    "VALUES" => TokenType::Values,
    "INTEGER" => TokenType::Integer,
    "VARCHAR" => TokenType::Varchar,
    "BOOLEAN" => TokenType::Boolean,
    "PRIMARY" => TokenType::Primary,
    "KEY" => TokenType::Key,
    "NOT" => TokenType::Not,
    "NULL" => TokenType::Null,
    "TRUE" => TokenType::BooleanLiteral,
    "FALSE" => TokenType::BooleanLiteral,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Literals
    Identifier,
    IntegerLiteral,
    StringLiteral,
    BooleanLiteral, // TRUE / FALSE

    // Keywords
    Create,
    Drop,
    Table,
    Insert,
    Into,
    Select,
    From,
    Where,
    Values,

    // Data types
    Integer,
    Varchar,
    Boolean,

    // Constraints
    Primary,
    Key,
    Not,
    Null,

    // Operators
    Eq, // =
    Ne, // != or <>
    Lt, // <
    Gt, // >
    Le, // <=
    Ge, // >=

    // Punctuation
    Semicolon,
    Comma,
    LParen,
    RParen,
    Star,

    // Special
    Eof,
    Unknown,
}

impl TokenType {
    /// Keyword lookup on an already-uppercased word
    pub fn from_keyword(upper: &str) -> Option<Self> {
        KEYWORDS.get(upper).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            TokenType::Identifier => "IDENTIFIER",
            TokenType::IntegerLiteral => "INTEGER_LITERAL",
            TokenType::StringLiteral => "STRING_LITERAL",
            TokenType::BooleanLiteral => "BOOLEAN_LITERAL",
            TokenType::Create => "CREATE",
            TokenType::Drop => "DROP",
            TokenType::Table => "TABLE",
            TokenType::Insert => "INSERT",
            TokenType::Into => "INTO",
            TokenType::Select => "SELECT",
            TokenType::From => "FROM",
            TokenType::Where => "WHERE",
            TokenType::Values => "VALUES",
            TokenType::Integer => "INTEGER",
            TokenType::Varchar => "VARCHAR",
            TokenType::Boolean => "BOOLEAN",
            TokenType::Primary => "PRIMARY",
            TokenType::Key => "KEY",
            TokenType::Not => "NOT",
            TokenType::Null => "NULL",
            TokenType::Eq => "EQUALS",
            TokenType::Ne => "NOT_EQUALS",
            TokenType::Lt => "LESS_THAN",
            TokenType::Gt => "GREATER_THAN",
            TokenType::Le => "LESS_EQUAL",
            TokenType::Ge => "GREATER_EQUAL",
            TokenType::Semicolon => "SEMICOLON",
            TokenType::Comma => "COMMA",
            TokenType::LParen => "LEFT_PAREN",
            TokenType::RParen => "RIGHT_PAREN",
            TokenType::Star => "ASTERISK",
            TokenType::Eof => "END_OF_FILE",
            TokenType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    /// Source text: uppercased for keywords, unescaped for string literals,
    /// verbatim otherwise
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(token_type: TokenType, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            token_type,
            text: text.into(),
            line,
            column,
        }
    }
}
