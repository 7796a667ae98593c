//! Type definitions of a low-level SQL string representation.
//!
//! Nothing enters the SQL text except through `append_syntax` (static keywords and
//! punctuation), `append_identifier`, `append_string_literal` or `append_param`.

/// A SQL statement under construction, with the values bound to its parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SQL {
    pub sql: String,
    pub params: Vec<Param>,
}

/// A parameter for a parameterized query.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// A literal string
    String(String),
    Integer(i64),
    Float(f64),
}

impl SQL {
    pub fn new() -> SQL {
        SQL::default()
    }
    pub fn append_syntax(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }
    pub fn append_identifier(&mut self, identifier: &str) {
        self.sql.push_str(&quote_identifier(identifier));
    }
    pub fn append_string_literal(&mut self, value: &str) {
        self.sql.push_str(&quote_literal(value));
    }
    /// Bind a value to the next numbered parameter (`?1`, `?2`, ...).
    pub fn append_param(&mut self, param: Param) {
        self.params.push(param);
        self.sql.push_str(&format!("?{}", self.params.len()));
    }
}

/// Wrap a table or column name in double quotes. Embedded double quotes are doubled;
/// SQLite gives no other character a special meaning inside a quoted identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Render a string as a single-quoted SQL literal, doubling embedded single quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
