//! Helpers for processing the QueryRequest and building SQL.

use dc_api_types::{Relationship, TableRelationships};
use ndc_sqlite_configuration::QuerySettings;
use query_engine_sql::sql;

use super::error::Error;

/// Static information from the query and the connector settings.
#[derive(Debug)]
pub struct Env<'request> {
    relationships: &'request [TableRelationships],
    settings: &'request QuerySettings,
}

/// Stateful information changed throughout the translation process.
#[derive(Debug, Default)]
pub struct State {
    next_alias_index: u64,
}

/// For a table in the query, we'd like to track its name (so we can resolve relationships
/// declared on it) and the reference we use to address it in the statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNameAndReference {
    /// Table name for relationship lookup
    pub name: String,
    /// Table alias to query from
    pub reference: sql::ast::TableReference,
}

impl<'request> Env<'request> {
    /// Create a new Env by supplying the request's relationships and the query settings.
    pub fn new(
        relationships: &'request [TableRelationships],
        settings: &'request QuerySettings,
    ) -> Env<'request> {
        Env {
            relationships,
            settings,
        }
    }

    pub fn settings(&self) -> &QuerySettings {
        self.settings
    }

    /// Find a relationship declared on a source table. Source tables are assumed to be
    /// unique in a request, so only the first entry for `source_table` is consulted.
    pub fn lookup_relationship(
        &self,
        source_table: &str,
        relationship: &str,
    ) -> Result<&'request Relationship, Error> {
        self.relationships
            .iter()
            .find(|table_relationships| table_relationships.source_table == source_table)
            .and_then(|table_relationships| table_relationships.relationships.get(relationship))
            .ok_or_else(|| Error::UnknownRelationship {
                source_table: source_table.to_string(),
                relationship: relationship.to_string(),
            })
    }

    /// Mark an expression with the name of the rule that produced it, when debug tags are on.
    pub fn tag(&self, tag: &'static str, expression: sql::ast::Expression) -> sql::ast::Expression {
        if self.settings.debug_tags {
            sql::ast::Expression::Tagged {
                tag,
                expression: Box::new(expression),
            }
        } else {
            expression
        }
    }
}

impl State {
    /// Build a new state.
    pub fn new() -> State {
        State::default()
    }

    /// Create a table alias that is unique within the statement.
    pub fn make_table_alias(&mut self, name: String) -> sql::ast::TableAlias {
        let index = self.next_alias_index;
        self.next_alias_index += 1;
        sql::helpers::make_table_alias(index, name)
    }
}

impl TableNameAndReference {
    /// A table addressed through an alias.
    pub fn aliased(name: String, alias: sql::ast::TableAlias) -> TableNameAndReference {
        TableNameAndReference {
            name,
            reference: sql::ast::TableReference::AliasedTable(alias),
        }
    }

    /// A column of this table.
    pub fn column(&self, name: &str) -> sql::ast::Expression {
        sql::helpers::make_column(self.reference.clone(), name.to_string())
    }
}
