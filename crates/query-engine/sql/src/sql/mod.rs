//! SQL AST, its rendering to SQLite text, and execution plans.

pub mod ast;
pub mod convert;
pub mod execution_plan;
pub mod helpers;
pub mod string;
