//! Criteria rows to `WHERE` expressions.

use super::Table;
use crate::{Error, Result, Row, Value};

use tabula_sql::{
    codec,
    stmt::{BinaryOp, Expr},
};

const OPERATORS: &[&str] = &["between", "lt", "gt", "lte", "gte", "neq", "like"];

/// Compile `criteria` into a conjunction, or `None` when it is empty.
///
/// Each entry is one of:
///
/// * a scalar, compared for equality (`IS NULL` when null),
/// * a list, tested for membership,
/// * an object holding exactly one operator such as `{"lt": 5}`.
pub(crate) fn to_expr(table: &Table, criteria: &Row) -> Result<Option<Expr>> {
    if criteria.is_empty() {
        return Ok(None);
    }

    let mut operands = Vec::with_capacity(criteria.len());
    for (field, value) in criteria {
        operands.push(field_expr(table, field, value)?);
    }

    Ok(Some(match operands.len() {
        1 => operands.remove(0),
        _ => Expr::and(operands),
    }))
}

fn field_expr(table: &Table, field: &str, value: &Value) -> Result<Expr> {
    if table.column(field).is_none() {
        return Err(Error::invalid_filter_key(table.name(), field));
    }
    let column = || Expr::column(field);

    match value {
        Value::Null => Ok(Expr::is_null(column(), false)),
        Value::List(items) => Ok(Expr::in_list(column(), encode_all(table, field, items)?)),
        Value::Map(ops) => {
            let (op, operand) = match ops.first() {
                Some((op, operand)) if ops.len() == 1 && OPERATORS.contains(&op.as_str()) => {
                    (op.as_str(), operand)
                }
                _ => {
                    let key = ops.keys().cloned().collect::<Vec<_>>().join(",");
                    return Err(Error::invalid_filter_key(
                        table.name(),
                        format!("{field}.{key}"),
                    ));
                }
            };
            operator_expr(table, field, op, operand)
        }
        scalar => Ok(Expr::eq(column(), encode(table, field, scalar)?)),
    }
}

fn operator_expr(table: &Table, field: &str, op: &str, operand: &Value) -> Result<Expr> {
    let column = || Expr::column(field);
    let compare = |op| -> Result<Expr> {
        Ok(Expr::binary_op(column(), op, encode(table, field, operand)?))
    };

    match op {
        "lt" => compare(BinaryOp::Lt),
        "gt" => compare(BinaryOp::Gt),
        "lte" => compare(BinaryOp::Le),
        "gte" => compare(BinaryOp::Ge),
        "like" => Ok(Expr::Like {
            expr: Box::new(column()),
            pattern: Box::new(encode(table, field, operand)?),
        }),
        "neq" => match operand {
            Value::Null => Ok(Expr::is_null(column(), true)),
            Value::List(items) => Ok(Expr::InList {
                expr: Box::new(column()),
                list: encode_all(table, field, items)?,
                negated: true,
            }),
            _ => compare(BinaryOp::Ne),
        },
        "between" => match operand.as_list() {
            Some([low, high]) => Ok(Expr::Between {
                expr: Box::new(column()),
                low: Box::new(encode(table, field, low)?),
                high: Box::new(encode(table, field, high)?),
            }),
            _ => Err(Error::invalid_filter_key(
                table.name(),
                format!("{field}.between"),
            )),
        },
        _ => Err(Error::invalid_filter_key(
            table.name(),
            format!("{field}.{op}"),
        )),
    }
}

fn encode(table: &Table, field: &str, value: &Value) -> Result<Expr> {
    let column = table
        .column(field)
        .ok_or_else(|| Error::invalid_filter_key(table.name(), field))?;
    let encoded = codec::encode(column, value, table.flavor())?;
    Ok(Expr::value(encoded))
}

fn encode_all(table: &Table, field: &str, items: &[Value]) -> Result<Vec<Expr>> {
    items
        .iter()
        .map(|item| encode(table, field, item))
        .collect()
}
