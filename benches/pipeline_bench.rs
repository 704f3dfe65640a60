//! SQL pipeline benchmarks.
//!
//! Measures:
//! - Lexing + parsing of each statement kind
//! - Row append through the executor
//! - Full-table and filtered scans over a populated table
//!
//! Run with: `cargo bench --bench pipeline_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flatdb::sql::{lexer, parser};
use flatdb::{execute_sql, DBConfig, QueryExecutor};

const STATEMENTS: &[(&str, &str)] = &[
    (
        "create",
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR(50), active BOOLEAN NOT NULL)",
    ),
    ("insert", "INSERT INTO users VALUES (42, 'Alice \\'the admin\\'', true)"),
    ("select", "SELECT * FROM users WHERE name >= 'M'"),
    ("drop", "DROP TABLE users"),
];

fn bench_lex_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("lex_parse");

    for (name, sql) in STATEMENTS {
        group.throughput(Throughput::Bytes(sql.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), sql, |b, sql| {
            b.iter(|| {
                let tokens = lexer::tokenize(black_box(sql)).unwrap();
                parser::parse(tokens).unwrap()
            })
        });
    }

    group.finish();
}

fn setup(rows: usize) -> (tempfile::TempDir, QueryExecutor) {
    let dir = tempfile::tempdir().unwrap();
    let mut executor = QueryExecutor::new(DBConfig::for_testing(dir.path())).unwrap();
    execute_sql(
        &mut executor,
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR(50), active BOOLEAN)",
    )
    .unwrap();
    for i in 0..rows {
        let sql = format!(
            "INSERT INTO users VALUES ({}, 'user|{}', {})",
            i,
            i,
            i % 2 == 0
        );
        execute_sql(&mut executor, &sql).unwrap();
    }
    (dir, executor)
}

fn bench_insert(c: &mut Criterion) {
    let (_dir, mut executor) = setup(0);
    let mut next_id = 0;

    let mut group = c.benchmark_group("insert");
    group.throughput(Throughput::Elements(1));
    group.bench_function("single_row", |b| {
        b.iter(|| {
            next_id += 1;
            let sql = format!("INSERT INTO users VALUES ({}, 'bench', true)", next_id);
            execute_sql(&mut executor, &sql).unwrap()
        })
    });
    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");

    for rows in [100usize, 1_000, 10_000] {
        let (_dir, mut executor) = setup(rows);
        group.throughput(Throughput::Elements(rows as u64));

        group.bench_with_input(BenchmarkId::new("all", rows), &rows, |b, _| {
            b.iter(|| execute_sql(&mut executor, "SELECT * FROM users").unwrap())
        });
        group.bench_with_input(BenchmarkId::new("where", rows), &rows, |b, _| {
            b.iter(|| execute_sql(&mut executor, "SELECT * FROM users WHERE id < 50").unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lex_parse, bench_insert, bench_select);
criterion_main!(benches);
