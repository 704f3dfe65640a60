/// flatdb SQL engine
///
/// Architecture:
/// - Lexer: Tokenizes SQL strings
/// - Parser: Builds a `Statement` from tokens
/// - Executor: Runs statements against the catalog and row store

pub mod token;
pub mod lexer;
pub mod ast;
pub mod parser;
pub mod executor;

pub use token::{Token, TokenType};
pub use lexer::Lexer;
pub use ast::{CompareOp, CreateTableStmt, DropTableStmt, InsertStmt, SelectStmt, Statement, WhereCondition};
pub use parser::Parser;
pub use executor::{QueryExecutor, QueryResult};

use crate::error::Result;

/// Parse and execute a SQL statement.
///
/// Lex and parse failures are returned as `Err`; execution failures are
/// rendered into the returned text as `Error: <message>`.
pub fn execute_sql(executor: &mut QueryExecutor, sql: &str) -> Result<String> {
    let mut lexer = Lexer::new(sql);
    let tokens = lexer.tokenize()?;
    let mut parser = Parser::new(tokens);
    let statement = parser.parse()?;
    Ok(executor.execute(statement))
}
