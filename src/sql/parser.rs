/// SQL Parser - converts tokens into AST
use super::ast::*;
use super::token::{Token, TokenType};
use crate::error::{DbError, Result};
use crate::types::{ColumnDef, ColumnType, Value};

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        // current() relies on a trailing EOF
        let needs_eof = tokens
            .last()
            .map_or(true, |t| t.token_type != TokenType::Eof);
        if needs_eof {
            let (line, column) = tokens.last().map_or((1, 1), |t| (t.line, t.column));
            tokens.push(Token::new(TokenType::Eof, "", line, column));
        }
        Self { tokens, position: 0 }
    }

    /// Parse exactly one statement. A trailing `;` is accepted but not required.
    pub fn parse(&mut self) -> Result<Statement> {
        let stmt = match self.current().token_type {
            TokenType::Create => Statement::CreateTable(self.parse_create_table()?),
            TokenType::Drop => Statement::DropTable(self.parse_drop_table()?),
            TokenType::Insert => Statement::Insert(self.parse_insert()?),
            TokenType::Select => Statement::Select(self.parse_select()?),
            _ => return Err(self.error("Expected CREATE, DROP, INSERT or SELECT")),
        };

        self.match_token(TokenType::Semicolon);
        if self.current().token_type != TokenType::Eof {
            return Err(self.error("Expected end of statement"));
        }

        Ok(stmt)
    }

    /// CREATE TABLE <id> ( <columnDef> (, <columnDef>)* )
    fn parse_create_table(&mut self) -> Result<CreateTableStmt> {
        self.expect(TokenType::Create, "Expected CREATE")?;
        self.expect(TokenType::Table, "Expected TABLE")?;
        let table = self.expect_identifier("Expected table name")?;
        self.expect(TokenType::LParen, "Expected '('")?;

        // An empty list parses; the catalog rejects it
        let mut columns = Vec::new();
        if self.current().token_type != TokenType::RParen {
            loop {
                columns.push(self.parse_column_def()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenType::RParen, "Expected ')'")?;
        Ok(CreateTableStmt { table, columns })
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef> {
        let name = self.expect_identifier("Expected column name")?;
        let col_type = self.parse_data_type()?;
        let mut column = ColumnDef::new(name, col_type);

        // Constraints in any order; repeats are harmless
        loop {
            if self.match_token(TokenType::Primary) {
                self.expect(TokenType::Key, "Expected KEY after PRIMARY")?;
                column.primary_key = true;
            } else if self.match_token(TokenType::Not) {
                self.expect(TokenType::Null, "Expected NULL after NOT")?;
                column.not_null = true;
            } else {
                break;
            }
        }

        Ok(column)
    }

    fn parse_data_type(&mut self) -> Result<ColumnType> {
        if self.match_token(TokenType::Integer) {
            Ok(ColumnType::Integer)
        } else if self.match_token(TokenType::Boolean) {
            Ok(ColumnType::Boolean)
        } else if self.match_token(TokenType::Varchar) {
            self.expect(TokenType::LParen, "Expected '(' after VARCHAR")?;
            if self.current().token_type != TokenType::IntegerLiteral {
                return Err(self.error("Expected VARCHAR length"));
            }
            let len = self.current().text.parse::<usize>().map_err(|_| {
                self.error(&format!("VARCHAR length out of range: {}", self.current().text))
            })?;
            self.advance();
            self.expect(TokenType::RParen, "Expected ')' after VARCHAR length")?;
            Ok(ColumnType::Varchar(len))
        } else {
            Err(self.error("Expected data type"))
        }
    }

    /// DROP TABLE <id>
    fn parse_drop_table(&mut self) -> Result<DropTableStmt> {
        self.expect(TokenType::Drop, "Expected DROP")?;
        self.expect(TokenType::Table, "Expected TABLE")?;
        let table = self.expect_identifier("Expected table name")?;
        Ok(DropTableStmt { table })
    }

    /// INSERT INTO <id> VALUES ( <value> (, <value>)* )
    fn parse_insert(&mut self) -> Result<InsertStmt> {
        self.expect(TokenType::Insert, "Expected INSERT")?;
        self.expect(TokenType::Into, "Expected INTO")?;
        let table = self.expect_identifier("Expected table name")?;
        self.expect(TokenType::Values, "Expected VALUES")?;
        self.expect(TokenType::LParen, "Expected '('")?;

        let mut values = Vec::new();
        if self.current().token_type != TokenType::RParen {
            loop {
                values.push(self.parse_value()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenType::RParen, "Expected ')'")?;
        Ok(InsertStmt { table, values })
    }

    /// SELECT * FROM <id> [ WHERE <id> <op> <value> ]
    fn parse_select(&mut self) -> Result<SelectStmt> {
        self.expect(TokenType::Select, "Expected SELECT")?;
        if !self.match_token(TokenType::Star) {
            return Err(self.error("Only SELECT * is currently supported"));
        }
        self.expect(TokenType::From, "Expected FROM")?;
        let table = self.expect_identifier("Expected table name")?;

        let where_clause = if self.match_token(TokenType::Where) {
            Some(self.parse_where_condition()?)
        } else {
            None
        };

        Ok(SelectStmt {
            table,
            select_all: true,
            where_clause,
        })
    }

    fn parse_where_condition(&mut self) -> Result<WhereCondition> {
        let column = self.expect_identifier("Expected column name in WHERE clause")?;

        let op = match self.current().token_type {
            TokenType::Eq => CompareOp::Eq,
            TokenType::Ne => CompareOp::Ne,
            TokenType::Lt => CompareOp::Lt,
            TokenType::Gt => CompareOp::Gt,
            TokenType::Le => CompareOp::Le,
            TokenType::Ge => CompareOp::Ge,
            _ => return Err(self.error("Expected comparison operator in WHERE clause")),
        };
        self.advance();

        let value = self.parse_value()?;
        Ok(WhereCondition { column, op, value })
    }

    fn parse_value(&mut self) -> Result<Value> {
        let token = self.current();
        let value = match token.token_type {
            TokenType::IntegerLiteral => {
                let n = token.text.parse::<i32>().map_err(|_| {
                    self.error(&format!("Integer literal out of range: {}", token.text))
                })?;
                Value::Integer(n)
            }
            TokenType::StringLiteral => Value::Text(token.text.clone()),
            TokenType::BooleanLiteral => Value::Bool(token.text.eq_ignore_ascii_case("TRUE")),
            _ => return Err(self.error("Expected value")),
        };
        self.advance();
        Ok(value)
    }

    // Helper methods

    fn expect_identifier(&mut self, msg: &str) -> Result<String> {
        if self.current().token_type == TokenType::Identifier {
            let name = self.current().text.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error(msg))
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn match_token(&mut self, token_type: TokenType) -> bool {
        if self.current().token_type == token_type {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token_type: TokenType, msg: &str) -> Result<()> {
        if self.match_token(token_type) {
            Ok(())
        } else {
            Err(self.error(msg))
        }
    }

    fn error(&self, msg: &str) -> DbError {
        let token = self.current();
        DbError::ParseError(format!(
            "{}, got {} at line {} column {}",
            msg, token.token_type, token.line, token.column
        ))
    }
}

/// Parse a token sequence into one statement
pub fn parse(tokens: Vec<Token>) -> Result<Statement> {
    Parser::new(tokens).parse()
}
