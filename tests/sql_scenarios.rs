//! End-to-end statement scenarios through lexer, parser and executor

mod common;

use common::setup_test;
use flatdb::DbError;
use std::fs;
use std::io::Write;

const CREATE_USERS: &str =
    "CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR(50), active BOOLEAN);";

#[test]
fn test_create_table_registers_schema() {
    let mut ctx = setup_test();

    assert_eq!(ctx.exec(CREATE_USERS), "Table 'users' created successfully.");

    let schema = ctx.executor.registry().get_table("users").unwrap();
    assert_eq!(schema.column_count(), 3);
    assert_eq!(schema.primary_key().map(|c| c.name.as_str()), Some("id"));
    assert!(ctx.data_dir().join("metadata.db").exists());
}

#[test]
fn test_insert_writes_pipe_delimited_line() {
    let mut ctx = setup_test();
    ctx.exec(CREATE_USERS);

    assert_eq!(
        ctx.exec("INSERT INTO users VALUES (1, 'Alice', true);"),
        "1 row inserted into 'users'."
    );

    let text = fs::read_to_string(ctx.data_dir().join("users.tbl")).unwrap();
    assert_eq!(text, "# Table data for users\n1|Alice|1\n");
}

#[test]
fn test_select_where_returns_one_row() {
    let mut ctx = setup_test();
    ctx.exec(CREATE_USERS);
    ctx.exec("INSERT INTO users VALUES (1, 'Alice', true);");
    ctx.exec("INSERT INTO users VALUES (2, 'Bob', false);");

    let output = ctx.exec("SELECT * FROM users WHERE id = 1;");
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "| id         | name       | active     |");
    assert_eq!(lines[2], "| 1          | Alice      | true       |");
    assert_eq!(lines[3], "1 rows returned.");
}

#[test]
fn test_insert_arity_mismatch() {
    let mut ctx = setup_test();
    ctx.exec(CREATE_USERS);

    assert_eq!(
        ctx.exec("INSERT INTO users VALUES (1, 'Bob');"),
        "Error: INSERT has 2 values, expected 3"
    );
    assert!(ctx.exec("SELECT * FROM users").ends_with("0 rows returned."));
}

#[test]
fn test_select_after_drop_fails() {
    let mut ctx = setup_test();
    ctx.exec(CREATE_USERS);
    ctx.exec("INSERT INTO users VALUES (1, 'Alice', true);");

    assert_eq!(ctx.exec("DROP TABLE users;"), "Table 'users' dropped successfully.");
    assert_eq!(
        ctx.exec("SELECT * FROM users;"),
        "Error: Table 'users' does not exist"
    );
    assert!(!ctx.data_dir().join("users.tbl").exists());
}

#[test]
fn test_special_characters_survive_storage() {
    let mut ctx = setup_test();
    ctx.exec("CREATE TABLE notes (id INTEGER, body VARCHAR(20))");

    ctx.exec(r"INSERT INTO notes VALUES (1, 'a|b\\c')");
    ctx.exec(r"INSERT INTO notes VALUES (2, '#hashtag')");
    ctx.exec(r"INSERT INTO notes VALUES (3, 'two\nlines')");

    let result = ctx
        .executor
        .execute_statement(flatdb::sql::parser::parse(
            flatdb::sql::lexer::tokenize("SELECT * FROM notes").unwrap(),
        )
        .unwrap())
        .unwrap();
    let (_, rows) = result.select_rows().unwrap();
    let bodies: Vec<String> = rows.iter().map(|r| r[1].to_string()).collect();
    assert_eq!(bodies, ["a|b\\c", "#hashtag", "two\nlines"]);
}

#[test]
fn test_schema_invariants() {
    let mut ctx = setup_test();

    assert_eq!(
        ctx.exec("CREATE TABLE t (a INTEGER PRIMARY KEY, b INTEGER PRIMARY KEY)"),
        "Error: Table can have at most one primary key"
    );
    assert_eq!(
        ctx.exec("CREATE TABLE t (a INTEGER, a BOOLEAN)"),
        "Error: Duplicate column name: a"
    );
    assert_eq!(
        ctx.exec("CREATE TABLE t (a VARCHAR(0))"),
        "Error: VARCHAR length must be positive for column: a"
    );
    assert!(ctx.executor.registry().table_names().is_empty());
}

#[test]
fn test_insert_type_and_length_checks() {
    let mut ctx = setup_test();
    ctx.exec("CREATE TABLE t (n INTEGER, s VARCHAR(3))");

    assert_eq!(
        ctx.exec("INSERT INTO t VALUES ('x', 'abc')"),
        "Error: Type mismatch for column 'n'"
    );
    assert_eq!(
        ctx.exec("INSERT INTO t VALUES (1, 'abcd')"),
        "Error: String too long for column 's', max length is 3"
    );
    assert_eq!(ctx.exec("INSERT INTO t VALUES (1, 'abc')"), "1 row inserted into 't'.");
}

#[test]
fn test_where_type_mismatch_fails_before_scan() {
    let mut ctx = setup_test();
    ctx.exec(CREATE_USERS);
    ctx.exec("INSERT INTO users VALUES (1, 'Alice', true);");

    // Any scan would now fail: the data file is a directory
    fs::remove_file(ctx.data_dir().join("users.tbl")).unwrap();
    fs::create_dir(ctx.data_dir().join("users.tbl")).unwrap();

    assert_eq!(
        ctx.exec("SELECT * FROM users WHERE active = 'yes'"),
        "Error: Type mismatch for column 'active'"
    );
    assert_eq!(
        ctx.exec("SELECT * FROM users WHERE age = 1"),
        "Error: Column 'age' does not exist in table 'users'"
    );
}

#[test]
fn test_keywords_are_case_insensitive() {
    let mut ctx = setup_test();
    ctx.exec("create table Items (ID integer, Flag boolean)");
    ctx.exec("InSeRt InTo Items VaLuEs (7, TRUE)");

    let output = ctx.exec("sElEcT * fRoM Items wHeRe Flag = true");
    assert!(output.contains("| 7 "));
    assert!(output.ends_with("1 rows returned."));
}

#[test]
fn test_parse_and_lex_failures_are_returned() {
    let mut ctx = setup_test();

    let err = ctx.try_exec("SELECT name FROM users").unwrap_err();
    assert!(matches!(err, DbError::ParseError(_)));
    assert!(err.is_parse_failure());

    let err = ctx.try_exec("INSERT INTO users VALUES (1, 'oops)").unwrap_err();
    assert!(matches!(err, DbError::LexError(_)));
}

#[test]
fn test_catalog_reload_is_identical() {
    let mut ctx = setup_test();
    ctx.exec(CREATE_USERS);
    ctx.exec("CREATE TABLE audit (seq INTEGER NOT NULL, note VARCHAR(200))");
    ctx.exec("INSERT INTO users VALUES (1, 'Alice', true)");

    let before: Vec<_> = ctx
        .executor
        .registry()
        .table_names()
        .into_iter()
        .map(|name| ctx.executor.registry().get_table(&name).cloned().unwrap())
        .collect();
    let listing = ctx.executor.list_tables();

    let mut ctx = ctx.reopen();
    let after: Vec<_> = ctx
        .executor
        .registry()
        .table_names()
        .into_iter()
        .map(|name| ctx.executor.registry().get_table(&name).cloned().unwrap())
        .collect();

    assert_eq!(before, after);
    assert_eq!(ctx.executor.list_tables(), listing);
    assert!(ctx.exec("SELECT * FROM users").contains("Alice"));
}

#[test]
fn test_torn_trailing_line_is_skipped() {
    let mut ctx = setup_test();
    ctx.exec(CREATE_USERS);
    ctx.exec("INSERT INTO users VALUES (1, 'Alice', true)");

    {
        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(ctx.data_dir().join("users.tbl"))
            .unwrap();
        file.write_all(b"2|Bo").unwrap();
    }

    let output = ctx.exec("SELECT * FROM users");
    assert!(output.ends_with("1 rows returned."));
}

#[test]
fn test_lone_empty_string_row_is_rejected() {
    let mut ctx = setup_test();
    ctx.exec("CREATE TABLE t (s VARCHAR(5))");

    assert_eq!(
        ctx.exec("INSERT INTO t VALUES ('')"),
        "Error: Cannot store a row whose only value is an empty string"
    );
    assert_eq!(ctx.exec("INSERT INTO t VALUES ('x')"), "1 row inserted into 't'.");
    assert!(ctx.exec("SELECT * FROM t").ends_with("1 rows returned."));
}

#[test]
fn test_recreated_table_starts_empty() {
    let mut ctx = setup_test();
    ctx.exec("CREATE TABLE t (n INTEGER)");
    ctx.exec("INSERT INTO t VALUES (1)");
    ctx.exec("DROP TABLE t");

    // Rows left behind by an interrupted drop
    fs::write(ctx.data_dir().join("t.tbl"), "# Table data for t\n1\n2\n").unwrap();

    ctx.exec("CREATE TABLE t (n INTEGER)");
    assert!(ctx.exec("SELECT * FROM t").ends_with("0 rows returned."));
}
