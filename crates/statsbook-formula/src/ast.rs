//! Formula Abstract Syntax Tree types

use crate::error::{FormulaError, FormulaResult};
use statsbook_core::{Address, AddressRange, Offset};
use std::fmt;

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    // === Literals ===
    /// Numeric literal
    Number(f64),
    /// String literal
    String(String),
    /// Boolean literal
    Boolean(bool),

    // === References ===
    /// Single cell reference
    CellRef(CellReference),
    /// Range reference
    RangeRef(RangeReference),

    // === Operators ===
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },
    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<FormulaExpr>,
    },

    // === Function call ===
    Function {
        name: String,
        args: Vec<FormulaExpr>,
    },
}

/// Cell reference with optional sheet
#[derive(Debug, Clone, PartialEq)]
pub struct CellReference {
    pub sheet: Option<String>,
    pub address: Address,
}

/// Range reference with optional sheet
///
/// The corners are kept as written (anchors included) so relocation can
/// move each one; [`RangeReference::range`] gives the normalized rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeReference {
    pub sheet: Option<String>,
    pub start: Address,
    pub end: Address,
}

impl RangeReference {
    pub fn range(&self) -> AddressRange {
        AddressRange::new(self.start, self.end)
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,

    // Text
    Concat,
}

impl BinaryOperator {
    /// Binding strength: compare < term < factor
    fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::LessThan
            | BinaryOperator::LessEqual
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterEqual => 1,
            BinaryOperator::Add | BinaryOperator::Subtract | BinaryOperator::Concat => 2,
            BinaryOperator::Multiply | BinaryOperator::Divide => 3,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "<>",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Concat => "&",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
}

impl FormulaExpr {
    /// Shift every same-sheet reference by `by`
    ///
    /// This turns a shared formula's canonical expression (written for its
    /// anchor cell) into the expression for another cell of the group.
    /// Anchored axes stay put, and references qualified with a sheet name
    /// are left alone.
    pub fn relocated(&self, by: Offset) -> FormulaResult<FormulaExpr> {
        if by.is_zero() {
            return Ok(self.clone());
        }
        let shift = |address: &Address| {
            address.offset(by).ok_or_else(|| {
                FormulaError::InvalidReference(format!(
                    "{} moved by ({}, {})",
                    address, by.rows, by.cols
                ))
            })
        };
        Ok(match self {
            FormulaExpr::CellRef(CellReference {
                sheet: None,
                address,
            }) => FormulaExpr::CellRef(CellReference {
                sheet: None,
                address: shift(address)?,
            }),
            FormulaExpr::RangeRef(RangeReference {
                sheet: None,
                start,
                end,
            }) => FormulaExpr::RangeRef(RangeReference {
                sheet: None,
                start: shift(start)?,
                end: shift(end)?,
            }),
            FormulaExpr::BinaryOp { op, left, right } => FormulaExpr::BinaryOp {
                op: *op,
                left: Box::new(left.relocated(by)?),
                right: Box::new(right.relocated(by)?),
            },
            FormulaExpr::UnaryOp { op, operand } => FormulaExpr::UnaryOp {
                op: *op,
                operand: Box::new(operand.relocated(by)?),
            },
            FormulaExpr::Function { name, args } => FormulaExpr::Function {
                name: name.clone(),
                args: args
                    .iter()
                    .map(|arg| arg.relocated(by))
                    .collect::<FormulaResult<_>>()?,
            },
            other => other.clone(),
        })
    }

    fn precedence(&self) -> u8 {
        match self {
            FormulaExpr::BinaryOp { op, .. } => op.precedence(),
            _ => u8::MAX,
        }
    }
}

fn write_sheet(f: &mut fmt::Formatter<'_>, sheet: &Option<String>) -> fmt::Result {
    let Some(sheet) = sheet else {
        return Ok(());
    };
    let plain = sheet
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && sheet
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if plain {
        write!(f, "{}!", sheet)
    } else {
        write!(f, "'{}'!", sheet.replace('\'', "''"))
    }
}

/// Formula text without the leading `=`
impl fmt::Display for FormulaExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaExpr::Number(n) => write!(f, "{}", n),
            FormulaExpr::String(s) => write!(f, "\"{}\"", s.replace('"', "\"\"")),
            FormulaExpr::Boolean(true) => f.write_str("TRUE"),
            FormulaExpr::Boolean(false) => f.write_str("FALSE"),
            FormulaExpr::CellRef(r) => {
                write_sheet(f, &r.sheet)?;
                write!(f, "{}", r.address)
            }
            FormulaExpr::RangeRef(r) => {
                write_sheet(f, &r.sheet)?;
                write!(f, "{}:{}", r.start, r.end)
            }
            FormulaExpr::BinaryOp { op, left, right } => {
                let prec = op.precedence();
                if left.precedence() < prec {
                    write!(f, "({})", left)?;
                } else {
                    write!(f, "{}", left)?;
                }
                f.write_str(op.symbol())?;
                // left-associative: an equal-precedence right operand needs parens
                if right.precedence() <= prec {
                    write!(f, "({})", right)
                } else {
                    write!(f, "{}", right)
                }
            }
            FormulaExpr::UnaryOp {
                op: UnaryOperator::Negate,
                operand,
            } => {
                if operand.precedence() == u8::MAX {
                    write!(f, "-{}", operand)
                } else {
                    write!(f, "-({})", operand)
                }
            }
            FormulaExpr::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_formula;
    use pretty_assertions::assert_eq;

    fn relocate(formula: &str, rows: i64, cols: i64) -> String {
        parse_formula(formula)
            .unwrap()
            .relocated(Offset::new(rows, cols))
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_relocate_relative_references() {
        assert_eq!(relocate("=A1+1", 1, 0), "A2+1");
        assert_eq!(relocate("=SUM(B2:C3)", 2, 1), "SUM(C4:D5)");
    }

    #[test]
    fn test_relocate_keeps_anchors() {
        assert_eq!(relocate("=$A1+A$1+$A$1", 3, 2), "$A4+C$1+$A$1");
    }

    #[test]
    fn test_relocate_skips_other_sheets() {
        assert_eq!(relocate("=Score!A1+A1", 1, 1), "Score!A1+B2");
        assert_eq!(relocate("='Game Summary'!A1:B2", 5, 5), "'Game Summary'!A1:B2");
    }

    #[test]
    fn test_relocate_off_grid() {
        let expr = parse_formula("=A1").unwrap();
        assert!(matches!(
            expr.relocated(Offset::new(-1, 0)),
            Err(FormulaError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_display_parenthesizes() {
        assert_eq!(parse_formula("=(1+2)*3").unwrap().to_string(), "(1+2)*3");
        assert_eq!(parse_formula("=1-(2-3)").unwrap().to_string(), "1-(2-3)");
        assert_eq!(parse_formula("=1-2-3").unwrap().to_string(), "1-2-3");
        assert_eq!(parse_formula("=-(A1+1)").unwrap().to_string(), "-(A1+1)");
        assert_eq!(
            parse_formula("=IF(A1=\"\",\"say \"\"hi\"\"\",B1)")
                .unwrap()
                .to_string(),
            "IF(A1=\"\",\"say \"\"hi\"\"\",B1)"
        );
    }
}
