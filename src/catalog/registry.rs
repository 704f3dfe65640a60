/// Table registry: the schema catalog for one data directory
use crate::config::DBConfig;
use crate::error::{DbError, Result};
use crate::sql::ast::WhereCondition;
use crate::types::{ColumnDef, ColumnType, TableSchema, Value};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const METADATA_HEADER: &str = "# flatdb metadata\n\
# Format: TABLE:name:column_count followed by column definitions\n\
# COLUMN:name:type:varchar_len:primary_key:not_null\n\n";

/// Table registry for managing table schemas
///
/// Loaded once from the metadata file and rewritten in full after every
/// create/drop and once more when dropped. Assumes exclusive access to the
/// data directory; concurrent processes are not coordinated.
pub struct TableRegistry {
    /// Table name -> schema, kept sorted for listing
    tables: BTreeMap<String, TableSchema>,
    config: DBConfig,
}

impl TableRegistry {
    /// Open the registry for `data_dir` with default settings
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        Self::open(DBConfig::default().with_data_dir(data_dir.as_ref()))
    }

    /// Open the registry described by `config`, creating the data directory
    /// if needed
    pub fn open(config: DBConfig) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.data_dir).map_err(|e| {
            DbError::Storage(format!(
                "Failed to create data directory {}: {}",
                config.data_dir.display(),
                e
            ))
        })?;

        let metadata_path = config.metadata_path();
        let tables = match fs::read_to_string(&metadata_path) {
            Ok(text) => parse_metadata(&text)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(DbError::Io(e)),
        };

        tracing::debug!(
            path = %metadata_path.display(),
            tables = tables.len(),
            durability = config.durability_level.description(),
            "catalog loaded"
        );

        Ok(Self { tables, config })
    }

    pub fn config(&self) -> &DBConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    pub fn table_exists(&self, table_name: &str) -> bool {
        self.tables.contains_key(table_name)
    }

    /// Validate and register a new table, then persist the catalog
    pub fn create_table(&mut self, table_name: &str, columns: Vec<ColumnDef>) -> Result<()> {
        if self.table_exists(table_name) {
            return Err(DbError::Validation(format!(
                "Table '{}' already exists",
                table_name
            )));
        }
        validate_definition(table_name, &columns)?;

        // A new table starts empty even if an orphaned data file is left over
        self.remove_table_file(table_name)?;

        self.tables
            .insert(table_name.to_string(), TableSchema::new(table_name, columns));
        if let Err(e) = self.persist() {
            self.tables.remove(table_name);
            return Err(e);
        }

        tracing::debug!(table = table_name, "table created");
        Ok(())
    }

    /// Remove a table, persist the catalog and delete its data file
    pub fn drop_table(&mut self, table_name: &str) -> Result<()> {
        let Some(schema) = self.tables.remove(table_name) else {
            return Err(DbError::TableNotFound(table_name.to_string()));
        };
        if let Err(e) = self.persist() {
            self.tables.insert(table_name.to_string(), schema);
            return Err(e);
        }

        if let Err(e) = self.remove_table_file(table_name) {
            tracing::warn!(table = table_name, error = %e, "failed to delete table file");
        }

        tracing::debug!(table = table_name, "table dropped");
        Ok(())
    }

    /// Delete a table's data file; a missing file is fine
    fn remove_table_file(&self, table_name: &str) -> Result<()> {
        let path = self.table_file_path(table_name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DbError::Storage(format!(
                "Cannot remove table file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Get table schema
    pub fn get_table(&self, table_name: &str) -> Option<&TableSchema> {
        self.tables.get(table_name)
    }

    /// Sorted table names
    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn get_columns(&self, table_name: &str) -> Result<&[ColumnDef]> {
        self.schema(table_name).map(|s| s.columns.as_slice())
    }

    pub fn get_column_index(&self, table_name: &str, column_name: &str) -> Option<usize> {
        self.get_table(table_name)?.get_column_position(column_name)
    }

    pub fn get_column(&self, table_name: &str, column_name: &str) -> Option<&ColumnDef> {
        self.get_table(table_name)?.get_column(column_name)
    }

    pub fn validate_table_name(&self, table_name: &str) -> Result<()> {
        self.schema(table_name).map(|_| ())
    }

    /// Arity, type and VARCHAR length checks for one INSERT row
    pub fn validate_insert_values(&self, table_name: &str, values: &[Value]) -> Result<()> {
        self.schema(table_name)?.validate_row(values)
    }

    /// The column must exist and the literal must match its type
    pub fn validate_where_condition(
        &self,
        table_name: &str,
        condition: &WhereCondition,
    ) -> Result<()> {
        let column = self
            .schema(table_name)?
            .get_column(&condition.column)
            .ok_or_else(|| DbError::ColumnNotFound {
                table: table_name.to_string(),
                column: condition.column.clone(),
            })?;

        if !condition.value.matches_type(&column.col_type) {
            return Err(DbError::TypeMismatch(format!(
                "Type mismatch for column '{}'",
                condition.column
            )));
        }

        Ok(())
    }

    pub fn table_file_path(&self, table_name: &str) -> PathBuf {
        self.config.table_file_path(table_name)
    }

    /// Rewrite the metadata file from the in-memory registry.
    ///
    /// Writes `<metadata>.tmp` and renames it over the old file.
    pub fn persist(&self) -> Result<()> {
        let metadata_path = self.config.metadata_path();
        let temp_path = self.config.metadata_temp_path();
        let text = render_metadata(&self.tables);

        {
            let mut file = fs::File::create(&temp_path).map_err(|e| {
                DbError::Storage(format!(
                    "Cannot open metadata file for writing {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
            file.write_all(text.as_bytes())?;
            file.flush()?;
            if self.config.durability_level.requires_immediate_sync() {
                file.sync_all()?;
            }
        }
        fs::rename(&temp_path, &metadata_path)?;

        tracing::debug!(path = %metadata_path.display(), tables = self.tables.len(), "catalog persisted");
        Ok(())
    }

    fn schema(&self, table_name: &str) -> Result<&TableSchema> {
        self.tables
            .get(table_name)
            .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))
    }
}

impl Drop for TableRegistry {
    fn drop(&mut self) {
        if let Err(e) = self.persist() {
            tracing::warn!(error = %e, "failed to flush catalog at shutdown");
        }
    }
}

fn validate_definition(table_name: &str, columns: &[ColumnDef]) -> Result<()> {
    if table_name.is_empty() {
        return Err(DbError::Validation("Table name cannot be empty".to_string()));
    }
    if columns.is_empty() {
        return Err(DbError::Validation(
            "Table must have at least one column".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut primary_keys = 0;
    for column in columns {
        if column.name.is_empty() {
            return Err(DbError::Validation("Column name cannot be empty".to_string()));
        }
        if !seen.insert(column.name.as_str()) {
            return Err(DbError::Validation(format!(
                "Duplicate column name: {}",
                column.name
            )));
        }
        if column.primary_key {
            primary_keys += 1;
        }
        if let ColumnType::Varchar(0) = column.col_type {
            return Err(DbError::Validation(format!(
                "VARCHAR length must be positive for column: {}",
                column.name
            )));
        }
    }

    if primary_keys > 1 {
        return Err(DbError::Validation(
            "Table can have at most one primary key".to_string(),
        ));
    }

    Ok(())
}

fn render_metadata(tables: &BTreeMap<String, TableSchema>) -> String {
    let mut out = String::from(METADATA_HEADER);
    for (name, schema) in tables {
        out.push_str(&format!("TABLE:{}:{}\n", name, schema.column_count()));
        for column in &schema.columns {
            out.push_str(&format!(
                "COLUMN:{}:{}:{}:{}:{}\n",
                column.name,
                column.col_type.keyword(),
                column.col_type.varchar_len(),
                u8::from(column.primary_key),
                u8::from(column.not_null),
            ));
        }
        out.push('\n');
    }
    out
}

fn parse_metadata(text: &str) -> Result<BTreeMap<String, TableSchema>> {
    let mut tables = BTreeMap::new();
    let mut lines = text
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.is_empty() && !l.starts_with('#'));

    while let Some(line) = lines.next() {
        let Some(rest) = line.strip_prefix("TABLE:") else {
            tracing::warn!(line, "ignoring unrecognized metadata line");
            continue;
        };

        let (name, count) = rest
            .rsplit_once(':')
            .ok_or_else(|| DbError::Corruption(format!("Malformed table line: {}", line)))?;
        let count: usize = count
            .trim()
            .parse()
            .map_err(|_| DbError::Corruption(format!("Bad column count in: {}", line)))?;

        let mut columns = Vec::with_capacity(count);
        for _ in 0..count {
            let column_line = lines.next().ok_or_else(|| {
                DbError::Corruption(format!("Incomplete table definition for '{}'", name))
            })?;
            columns.push(parse_column(column_line)?);
        }

        tables.insert(name.to_string(), TableSchema::new(name, columns));
    }

    Ok(tables)
}

fn parse_column(line: &str) -> Result<ColumnDef> {
    let corrupt = || DbError::Corruption(format!("Malformed column line: {}", line));

    let fields: Vec<&str> = line.split(':').collect();
    let [tag, name, type_name, len, pk, not_null] = fields.as_slice() else {
        return Err(corrupt());
    };
    if *tag != "COLUMN" {
        return Err(corrupt());
    }

    let col_type = match *type_name {
        "INTEGER" => ColumnType::Integer,
        "BOOLEAN" => ColumnType::Boolean,
        "VARCHAR" => ColumnType::Varchar(len.parse().map_err(|_| corrupt())?),
        other => {
            return Err(DbError::Corruption(format!("Unknown data type: {}", other)));
        }
    };

    Ok(ColumnDef {
        name: name.to_string(),
        col_type,
        primary_key: *pk == "1",
        not_null: *not_null == "1",
    })
}
