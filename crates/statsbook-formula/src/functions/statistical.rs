//! Statistical functions

use super::criteria::CriteriaMatcher;
use crate::ast::FormulaExpr;
use crate::error::FormulaResult;
use crate::evaluator::EvaluationContext;
use statsbook_core::Value;

fn numbers(values: &[Value]) -> impl Iterator<Item = f64> + '_ {
    values.iter().filter_map(|v| match v {
        Value::Number(n) => Some(*n),
        _ => None,
    })
}

/// COUNT(value, ...) - number-typed values only
pub fn fn_count(args: &[FormulaExpr], ctx: &mut EvaluationContext) -> FormulaResult<Value> {
    let values = ctx.flatten_all(args)?;
    Ok(Value::Number(numbers(&values).count() as f64))
}

/// COUNTA(value, ...) - every non-blank value
pub fn fn_counta(args: &[FormulaExpr], ctx: &mut EvaluationContext) -> FormulaResult<Value> {
    let values = ctx.flatten_all(args)?;
    Ok(Value::Number(
        values.iter().filter(|v| !v.is_empty()).count() as f64,
    ))
}

/// COUNTIF(range, criteria)
pub fn fn_countif(args: &[FormulaExpr], ctx: &mut EvaluationContext) -> FormulaResult<Value> {
    let range = ctx.flatten(&args[0])?;
    let matcher = CriteriaMatcher::new(&ctx.evaluate(&args[1])?);
    Ok(Value::Number(
        range.iter().filter(|v| matcher.matches(v)).count() as f64,
    ))
}

/// MAX(value, ...) - undefined when there are no numbers
pub fn fn_max(args: &[FormulaExpr], ctx: &mut EvaluationContext) -> FormulaResult<Value> {
    let values = ctx.flatten_all(args)?;
    Ok(numbers(&values).reduce(f64::max).into())
}

/// MIN(value, ...) - undefined when there are no numbers
pub fn fn_min(args: &[FormulaExpr], ctx: &mut EvaluationContext) -> FormulaResult<Value> {
    let values = ctx.flatten_all(args)?;
    Ok(numbers(&values).reduce(f64::min).into())
}

#[cfg(test)]
mod tests {
    use crate::evaluator::tests::{eval_in, Grid};
    use pretty_assertions::assert_eq;
    use statsbook_core::Value;

    fn grid() -> Grid {
        Grid::default()
            .with("A1", "cat")
            .with("A2", "car")
            .with("A3", "dog")
            .with("B1", 4.0)
            .with("B2", "")
            .with("B3", -2.0)
            .with("C1", true)
    }

    #[test]
    fn test_count_and_counta() {
        let mut grid = grid();
        assert_eq!(eval_in(&mut grid, "D1", "=COUNT(A1:C3)").unwrap(), Value::Number(2.0));
        assert_eq!(
            eval_in(&mut grid, "D1", "=COUNT(1,2,\"a\",3)").unwrap(),
            Value::Number(3.0)
        );
        assert_eq!(eval_in(&mut grid, "D1", "=COUNTA(A1:C3)").unwrap(), Value::Number(6.0));
    }

    #[test]
    fn test_countif() {
        let mut grid = grid();
        assert_eq!(
            eval_in(&mut grid, "D1", "=COUNTIF(A1:A3,\"ca*\")").unwrap(),
            Value::Number(2.0)
        );
        assert_eq!(
            eval_in(&mut grid, "D1", "=COUNTIF(A1:A3,\"dog\")").unwrap(),
            Value::Number(1.0)
        );
        assert_eq!(
            eval_in(&mut grid, "D1", "=COUNTIF(B1:B3,\"\")").unwrap(),
            Value::Number(1.0)
        );
        assert_eq!(
            eval_in(&mut grid, "D1", "=COUNTIF(B1:B3,4)").unwrap(),
            Value::Number(1.0)
        );
    }

    #[test]
    fn test_max_min() {
        let mut grid = grid();
        assert_eq!(eval_in(&mut grid, "D1", "=MAX(B1:B3)").unwrap(), Value::Number(4.0));
        assert_eq!(eval_in(&mut grid, "D1", "=MIN(B1:B3)").unwrap(), Value::Number(-2.0));
        assert_eq!(eval_in(&mut grid, "D1", "=MIN(5,2,8,1)").unwrap(), Value::Number(1.0));
        assert_eq!(eval_in(&mut grid, "D1", "=MAX(A1:A3)").unwrap(), Value::Undefined);
    }
}
