//! # statsbook-formula
//!
//! Formula parser and evaluator for statsbook.
//!
//! This crate provides:
//! - Formula parsing (text → AST)
//! - Relocation of shared formulas to other cells
//! - Formula evaluation (AST → value) against a [`CellResolver`]
//! - The small built-in function library stats book formulas use
//!
//! ## Example
//!
//! ```rust
//! use statsbook_core::{Address, Value};
//! use statsbook_formula::{evaluate_at, parse_formula, NoCells};
//!
//! let ast = parse_formula("=1+2*3").unwrap();
//! let value = evaluate_at(&ast, Address::new(1, 0), &mut NoCells).unwrap();
//! assert_eq!(value, Value::Number(7.0));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;

pub use ast::{BinaryOperator, CellReference, FormulaExpr, RangeReference, UnaryOperator};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, evaluate_at, CellResolver, EvaluationContext, NoCells};
pub use parser::parse_formula;
