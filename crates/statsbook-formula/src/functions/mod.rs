//! Built-in functions
//!
//! Only the functions the stats book formulas actually use are provided;
//! any other name is an [`UnimplementedFunction`] error.
//!
//! [`UnimplementedFunction`]: crate::FormulaError::UnimplementedFunction

pub mod criteria;
pub mod info;
pub mod logical;
pub mod lookup;
pub mod math;
pub mod statistical;

use crate::ast::FormulaExpr;
use crate::error::FormulaResult;
use crate::evaluator::EvaluationContext;
use ahash::AHashMap;
use statsbook_core::Value;

/// Function implementation signature
///
/// Arguments arrive unevaluated. Implementations evaluate them through the
/// context, which lets `IF` skip the branch it does not take and lets the
/// aggregates flatten range arguments.
pub type FunctionImpl = fn(&[FormulaExpr], &mut EvaluationContext) -> FormulaResult<Value>;

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
}

/// Function registry
pub struct FunctionRegistry {
    functions: AHashMap<&'static str, FunctionDef>,
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: AHashMap::new(),
        };

        registry.register_logical_functions();
        registry.register_info_functions();
        registry.register_math_functions();
        registry.register_statistical_functions();
        registry.register_lookup_functions();

        registry
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name.to_ascii_uppercase().as_str())
    }

    /// Register a function
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name, def);
    }

    /// Names of every registered function, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    fn add(
        &mut self,
        name: &'static str,
        min_args: usize,
        max_args: Option<usize>,
        implementation: FunctionImpl,
    ) {
        self.register(FunctionDef {
            name,
            min_args,
            max_args,
            implementation,
        });
    }

    fn register_logical_functions(&mut self) {
        self.add("IF", 2, Some(3), logical::fn_if);
        self.add("AND", 1, None, logical::fn_and);
        self.add("OR", 1, None, logical::fn_or);
    }

    fn register_info_functions(&mut self) {
        self.add("ISBLANK", 1, Some(1), info::fn_isblank);
        self.add("ISNA", 1, Some(1), info::fn_isna);
    }

    fn register_math_functions(&mut self) {
        self.add("SUM", 1, None, math::fn_sum);
        self.add("SUMIF", 2, Some(3), math::fn_sumif);
    }

    fn register_statistical_functions(&mut self) {
        self.add("COUNT", 1, None, statistical::fn_count);
        self.add("COUNTA", 1, None, statistical::fn_counta);
        self.add("COUNTIF", 2, Some(2), statistical::fn_countif);
        self.add("MAX", 1, None, statistical::fn_max);
        self.add("MIN", 1, None, statistical::fn_min);
    }

    fn register_lookup_functions(&mut self) {
        self.add("MATCH", 2, Some(3), lookup::fn_match);
        self.add("ROW", 0, Some(1), lookup::fn_row);
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_registry_contents() {
        let registry = FunctionRegistry::new();
        assert_eq!(
            registry.names(),
            vec![
                "AND", "COUNT", "COUNTA", "COUNTIF", "IF", "ISBLANK", "ISNA", "MATCH", "MAX",
                "MIN", "OR", "ROW", "SUM", "SUMIF"
            ]
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = FunctionRegistry::new();
        assert_eq!(registry.get("sum").map(|f| f.name), Some("SUM"));
        assert!(registry.get("VLOOKUP").is_none());
    }
}
