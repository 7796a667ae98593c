//! Helpers for building sql::ast types in certain shapes and patterns.

use super::ast::*;

// Empty clauses //

/// An empty `WHERE` clause.
pub fn empty_where() -> Expression {
    Expression::Value(Value::Bool(true))
}

/// An empty `ORDER BY` clause.
pub fn empty_order_by() -> OrderBy {
    OrderBy { elements: vec![] }
}

/// Empty `LIMIT` and `OFFSET` clauses.
pub fn empty_limit() -> Limit {
    Limit {
        limit: None,
        offset: None,
    }
}

/// A `true` expression.
pub fn true_expr() -> Expression {
    Expression::Value(Value::Bool(true))
}

/// A `false` expression.
pub fn false_expr() -> Expression {
    Expression::Value(Value::Bool(false))
}

/// Conjunction of two expressions, dropping a `true` operand.
pub fn and(left: Expression, right: Expression) -> Expression {
    if left == true_expr() {
        right
    } else if right == true_expr() {
        left
    } else {
        Expression::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

// Aliasing //

/// Generate a column expression refering to a specific table.
pub fn make_column(table: TableReference, name: String) -> Expression {
    Expression::ColumnReference(ColumnReference::TableColumn {
        table,
        name: ColumnName(name),
    })
}

/// Create column aliases using this function so we build everything in one place.
pub fn make_column_alias(name: String) -> ColumnAlias {
    ColumnAlias { name }
}

/// Create a table alias using this function so we build everything in one place.
/// Callers supply an index that is unique within the statement.
pub fn make_table_alias(unique_index: u64, name: String) -> TableAlias {
    TableAlias { unique_index, name }
}

// SELECTs //

/// Build a simple select with a select list and the rest are empty.
pub fn simple_select(select_list: Vec<(ColumnAlias, Expression)>) -> Select {
    Select {
        select_list: SelectList::SelectList(select_list),
        from: None,
        joins: vec![],
        where_: Where(empty_where()),
        order_by: empty_order_by(),
        limit: empty_limit(),
    }
}

/// Build a simple select *
pub fn star_select(from: From) -> Select {
    Select {
        select_list: SelectList::SelectStar,
        from: Some(from),
        joins: vec![],
        where_: Where(empty_where()),
        order_by: empty_order_by(),
        limit: empty_limit(),
    }
}

/// Build a `SELECT 1 FROM ...`, the body of an EXISTS clause.
pub fn select_one(from: From, joins: Vec<Join>, where_: Expression) -> Select {
    Select {
        select_list: SelectList::Select1,
        from: Some(from),
        joins,
        where_: Where(where_),
        order_by: empty_order_by(),
        limit: empty_limit(),
    }
}

/// A function call with the given arguments.
pub fn call(function: Function, args: Vec<Expression>) -> Expression {
    Expression::FunctionCall { function, args }
}

/// Re-parse a JSON text value with `JSON(...)`.
///
/// SQLite drops the JSON subtype of a value when it crosses a subquery boundary,
/// after which JSON functions would embed it as a string.
pub fn json(expression: Expression) -> Expression {
    call(Function::Json, vec![expression])
}
