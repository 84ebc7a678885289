use super::{Comma, Formatter, Ident, ToSql};

use crate::stmt::{BinaryOp, Expr};

impl ToSql for &Expr {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Expr::Column(name) => fmt!(f, Ident(name)),
            Expr::Value(encoded) => fmt!(f, encoded),
            Expr::BinaryOp { lhs, op, rhs } => {
                let (lhs, rhs): (&Expr, &Expr) = (lhs, rhs);
                fmt!(f, lhs " " op " " rhs);
            }
            Expr::InList { expr, list, negated } => {
                // `IN ()` is not valid SQL
                if list.is_empty() {
                    fmt!(f, if *negated { "1 = 1" } else { "1 = 0" });
                    return;
                }
                let expr: &Expr = expr;
                let not = if *negated { " NOT IN (" } else { " IN (" };
                fmt!(f, expr not Comma(list) ")");
            }
            Expr::Between { expr, low, high } => {
                let (expr, low, high): (&Expr, &Expr, &Expr) = (expr, low, high);
                fmt!(f, expr " BETWEEN " low " AND " high);
            }
            Expr::IsNull { expr, negated } => {
                let expr: &Expr = expr;
                let is = if *negated { " IS NOT NULL" } else { " IS NULL" };
                fmt!(f, expr is);
            }
            Expr::Like { expr, pattern } => {
                let (expr, pattern): (&Expr, &Expr) = (expr, pattern);
                fmt!(f, expr " LIKE " pattern);
            }
            Expr::Case {
                when,
                then,
                otherwise,
            } => {
                let (when, then, otherwise): (&Expr, &Expr, &Expr) = (when, then, otherwise);
                fmt!(f, "CASE WHEN " when " THEN " then " ELSE " otherwise " END");
            }
            Expr::And(operands) => match &operands[..] {
                [] => fmt!(f, "1 = 1"),
                [operand] => operand.to_sql(f),
                operands => {
                    let mut s = "";
                    for operand in operands {
                        fmt!(f, s operand);
                        s = " AND ";
                    }
                }
            },
        }
    }
}

impl ToSql for &BinaryOp {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(
            f,
            match self {
                BinaryOp::Eq => "=",
                BinaryOp::Ne => "<>",
                BinaryOp::Lt => "<",
                BinaryOp::Le => "<=",
                BinaryOp::Gt => ">",
                BinaryOp::Ge => ">=",
                BinaryOp::Sub => "-",
            }
        );
    }
}
