//! The query request tree.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub type TableName = String;
pub type ColumnName = String;
pub type FieldName = String;
pub type RelationshipName = String;

/// Root of one compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QueryRequest {
    pub table: TableName,
    #[serde(default)]
    pub table_relationships: Vec<TableRelationships>,
    pub query: Query,
}

/// The relationships available from one source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TableRelationships {
    pub source_table: TableName,
    pub relationships: IndexMap<RelationshipName, Relationship>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Relationship {
    pub target_table: TableName,
    pub relationship_type: RelationshipType,
    /// Source column to target column. Every pair is one equality of the join condition.
    pub column_mapping: IndexMap<ColumnName, ColumnName>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Object,
    Array,
}

/// A query against one table, used both at the root and for every relationship field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Query {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<IndexMap<FieldName, Field>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregates: Option<IndexMap<FieldName, Aggregate>>,
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub predicate: Option<Expression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<Vec<OrderBy>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Field {
    Column {
        column: ColumnName,
    },
    Relationship {
        relationship: RelationshipName,
        query: Box<Query>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Aggregate {
    StarCount,
    ColumnCount {
        column: ColumnName,
        #[serde(default)]
        distinct: bool,
    },
    SingleColumn {
        column: ColumnName,
        function: SingleColumnAggregateFunction,
    },
}

/// Name of an aggregate function applied to a single column, e.g. `avg`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SingleColumnAggregateFunction(pub String);

/// A boolean filter over the rows of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    And {
        expressions: Vec<Expression>,
    },
    Or {
        expressions: Vec<Expression>,
    },
    Not {
        expression: Box<Expression>,
    },
    UnaryOp {
        operator: UnaryComparisonOperator,
        column: ComparisonColumn,
    },
    BinaryOp {
        operator: BinaryComparisonOperator,
        column: ComparisonColumn,
        value: ComparisonValue,
    },
    BinaryArrOp {
        operator: BinaryArrayComparisonOperator,
        column: ComparisonColumn,
        values: Vec<serde_json::Value>,
    },
}

/// A column, reached by traversing `path` from the table being filtered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComparisonColumn {
    #[serde(default)]
    pub path: Vec<RelationshipName>,
    pub name: ColumnName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComparisonValue {
    Column { column: ComparisonColumn },
    Scalar { value: serde_json::Value },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct UnaryComparisonOperator(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct BinaryComparisonOperator(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct BinaryArrayComparisonOperator(pub String);

macro_rules! operator_from_str {
    ($($name:ident),*) => {
        $(
            impl From<&str> for $name {
                fn from(value: &str) -> Self {
                    Self(value.to_string())
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

operator_from_str!(
    UnaryComparisonOperator,
    BinaryComparisonOperator,
    BinaryArrayComparisonOperator,
    SingleColumnAggregateFunction
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OrderBy {
    pub column: ColumnName,
    /// Older clients send this as `ordering`.
    #[serde(alias = "ordering")]
    pub direction: OrderDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl ComparisonColumn {
    /// A column of the table being filtered.
    pub fn local(name: impl Into<ColumnName>) -> Self {
        ComparisonColumn {
            path: vec![],
            name: name.into(),
        }
    }
}
