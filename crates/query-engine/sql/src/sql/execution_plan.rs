//! Describe the SQL execution plan.

use super::ast;
use super::string;

/// Definition of an execution plan to be run against the database.
#[derive(Debug)]
pub struct ExecutionPlan<Query> {
    /// The table the request was rooted at, for logging.
    pub root_table: String,
    pub query: Query,
}

/// A statement whose single row holds the whole response as JSON text.
#[derive(Debug)]
pub struct Query {
    pub query: ast::Select,
    /// The name of the result column holding the response.
    pub result_column: ast::ColumnAlias,
}

impl Query {
    /// Extract the query component as SQL.
    pub fn query_sql(&self) -> string::SQL {
        select_to_sql(&self.query)
    }
    pub fn explain_query_sql(&self) -> string::SQL {
        explain_to_sql(&ast::Explain::Select(&self.query))
    }
}

/// Build a plan around a translated select.
pub fn simple_query_execution_plan(
    root_table: String,
    query: ast::Select,
    result_column: ast::ColumnAlias,
) -> ExecutionPlan<Query> {
    ExecutionPlan {
        root_table,
        query: Query {
            query,
            result_column,
        },
    }
}

/// Convert a select AST to SQL text and parameters.
pub fn select_to_sql(select: &ast::Select) -> string::SQL {
    let mut sql = string::SQL::new();
    select.to_sql(&mut sql);
    sql
}

/// Convert an explain AST to SQL text and parameters.
pub fn explain_to_sql(explain: &ast::Explain) -> string::SQL {
    let mut sql = string::SQL::new();
    explain.to_sql(&mut sql);
    sql
}
