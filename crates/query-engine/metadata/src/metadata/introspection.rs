//! Derive table metadata from the `CREATE TABLE` statements SQLite stores in `sqlite_schema`.

use sqlparser::ast::{ColumnOption, CreateTable, Statement, TableConstraint};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

use super::database::{ColumnInfo, ScalarType, TableInfo};

/// A row of `SELECT name, sql FROM sqlite_schema WHERE type = 'table'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub name: String,
    pub sql: Option<String>,
}

/// Which tables a schema request wants to see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFilter {
    /// Only these tables, when present. Meta tables named here are included.
    pub tables: Option<Vec<String>>,
    /// Include SQLite internal tables.
    pub meta: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("table '{table}' has no stored definition")]
    MissingDefinition { table: String },
    #[error("could not parse the definition of table '{table}': {message}")]
    UnparseableDefinition { table: String, message: String },
    #[error("the definition of table '{table}' is not a CREATE TABLE statement")]
    NotCreateTable { table: String },
}

/// SQLite's own bookkeeping tables, and the foreign key indexes some tools create.
pub fn is_meta_table(name: &str) -> bool {
    name.starts_with("sqlite_") || name.starts_with("IFK_")
}

impl TableFilter {
    pub fn includes(&self, name: &str) -> bool {
        match &self.tables {
            Some(tables) => tables.iter().any(|table| table == name),
            None => self.meta || !is_meta_table(name),
        }
    }
}

/// Build table metadata for every entry the filter admits, in the order given.
pub fn introspect_tables(
    entries: Vec<SchemaEntry>,
    filter: &TableFilter,
) -> Result<Vec<TableInfo>, Error> {
    entries
        .into_iter()
        .filter(|entry| filter.includes(&entry.name))
        .map(|entry| match entry.sql {
            Some(sql) => table_info_from_ddl(&entry.name, &sql),
            None => Err(Error::MissingDefinition { table: entry.name }),
        })
        .collect()
}

/// Parse one `CREATE TABLE` statement. The table is named after `name` rather than the
/// statement, since that is how queries refer to it. The statement text is kept as the
/// table's description.
pub fn table_info_from_ddl(name: &str, sql: &str) -> Result<TableInfo, Error> {
    let statements = Parser::parse_sql(&SQLiteDialect {}, sql).map_err(|err| {
        Error::UnparseableDefinition {
            table: name.to_string(),
            message: err.to_string(),
        }
    })?;

    let Some(Statement::CreateTable(CreateTable {
        columns,
        constraints,
        ..
    })) = statements.into_iter().next()
    else {
        return Err(Error::NotCreateTable {
            table: name.to_string(),
        });
    };

    let mut primary_key = Vec::new();
    let mut column_infos = Vec::with_capacity(columns.len());

    for column in columns {
        let mut nullable = true;
        for option in &column.options {
            match &option.option {
                ColumnOption::NotNull => nullable = false,
                ColumnOption::Unique {
                    is_primary: true, ..
                } => primary_key.push(column.name.value.clone()),
                _ => {}
            }
        }

        column_infos.push(ColumnInfo {
            r#type: column_type(name, &column.name.value, &column.data_type.to_string()),
            name: column.name.value,
            nullable,
        });
    }

    for constraint in constraints {
        if let TableConstraint::PrimaryKey { columns, .. } = constraint {
            primary_key.extend(columns.into_iter().map(|ident| ident.value));
        }
    }

    Ok(TableInfo {
        name: name.to_string(),
        primary_key,
        description: Some(sql.to_string()),
        columns: column_infos,
    })
}

fn column_type(table: &str, column: &str, declared: &str) -> ScalarType {
    ScalarType::from_declared_type(declared).unwrap_or_else(|| {
        tracing::warn!(
            table,
            column,
            declared_type = declared,
            "unrecognised column type, reporting it as string"
        );
        ScalarType::String
    })
}
