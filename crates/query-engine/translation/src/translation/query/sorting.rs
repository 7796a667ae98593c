//! Handle ORDER BY translation.

use dc_api_types::{OrderBy, OrderDirection};
use query_engine_sql::sql;

use crate::translation::helpers::TableNameAndReference;

/// Convert the order by elements of a query to a SQL ORDER BY clause, in request order.
pub fn translate_order_by(table: &TableNameAndReference, order_by: &[OrderBy]) -> sql::ast::OrderBy {
    sql::ast::OrderBy {
        elements: order_by
            .iter()
            .map(|element| sql::ast::OrderByElement {
                target: table.column(&element.column),
                direction: match element.direction {
                    OrderDirection::Asc => sql::ast::OrderByDirection::Asc,
                    OrderDirection::Desc => sql::ast::OrderByDirection::Desc,
                },
            })
            .collect(),
    }
}
