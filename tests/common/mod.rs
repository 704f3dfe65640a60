//! Shared setup for end-to-end SQL tests

use flatdb::{execute_sql, DBConfig, QueryExecutor, Result};
use std::path::Path;
use tempfile::TempDir;

pub struct TestContext {
    pub dir: TempDir,
    pub executor: QueryExecutor,
}

impl TestContext {
    /// Run one statement, panicking on lex/parse failure
    pub fn exec(&mut self, sql: &str) -> String {
        execute_sql(&mut self.executor, sql)
            .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", sql, e))
    }

    /// Run one statement, returning lex/parse failures
    pub fn try_exec(&mut self, sql: &str) -> Result<String> {
        execute_sql(&mut self.executor, sql)
    }

    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Drop the executor (flushing the catalog) and reopen the same directory
    pub fn reopen(self) -> TestContext {
        let TestContext { dir, executor } = self;
        drop(executor);
        let executor = QueryExecutor::new(DBConfig::for_testing(dir.path())).unwrap();
        TestContext { dir, executor }
    }
}

pub fn setup_test() -> TestContext {
    let dir = tempfile::tempdir().unwrap();
    let executor = QueryExecutor::new(DBConfig::for_testing(dir.path())).unwrap();
    TestContext { dir, executor }
}
