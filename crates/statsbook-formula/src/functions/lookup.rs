//! Lookup and reference functions

use crate::ast::FormulaExpr;
use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::EvaluationContext;
use statsbook_core::{Value, ValueOrdering};

/// MATCH(lookup_value, lookup_range, [match_type])
///
/// - `0`: position of the first value equal to `lookup_value`
/// - `1` (default): scans forward while values are `<= lookup_value`
/// - `-1`: scans forward while values are `>= lookup_value`
///
/// The ordered forms assume a sorted range and stop at the first value
/// that breaks the order, returning the last position before it. Strings
/// compare case-insensitively. Positions are 1-based; no match gives
/// undefined.
pub fn fn_match(args: &[FormulaExpr], ctx: &mut EvaluationContext) -> FormulaResult<Value> {
    let lookup_value = ctx.evaluate(&args[0])?;
    let values = ctx.flatten(&args[1])?;
    let match_type = match args.get(2) {
        Some(arg) => {
            let v = ctx.evaluate(arg)?;
            v.as_number().ok_or_else(|| {
                FormulaError::TypeMismatch(format!(
                    "MATCH type must be a number, got {}",
                    v.type_name()
                ))
            })?
        }
        None => 1.0,
    };

    let found = if match_type == 0.0 {
        values.iter().position(|v| *v == lookup_value)
    } else {
        let keep_going = |ordering: ValueOrdering| {
            if match_type > 0.0 {
                matches!(ordering, ValueOrdering::Descending | ValueOrdering::Same)
            } else {
                matches!(ordering, ValueOrdering::Ascending | ValueOrdering::Same)
            }
        };
        let mut last = None;
        for (i, v) in values.iter().enumerate() {
            if !keep_going(lookup_value.compare(v, true)) {
                break;
            }
            last = Some(i);
        }
        last
    };

    Ok(found.map(|i| (i + 1) as f64).into())
}

/// ROW([reference])
///
/// With no argument, the row of the cell being evaluated. With a
/// reference, its row (the top row for a range). The reference is not
/// dereferenced.
pub fn fn_row(args: &[FormulaExpr], ctx: &mut EvaluationContext) -> FormulaResult<Value> {
    let row = match args.first() {
        None => ctx.current.row,
        Some(FormulaExpr::CellRef(cell_ref)) => cell_ref.address.row,
        Some(FormulaExpr::RangeRef(range_ref)) => range_ref.range().start.row,
        Some(other) => {
            return Err(FormulaError::TypeMismatch(format!(
                "ROW expects a reference, got {}",
                other
            )))
        }
    };
    Ok(Value::Number(f64::from(row)))
}
