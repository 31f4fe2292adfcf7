//! Criteria matching for COUNTIF and SUMIF
//!
//! A string criterion containing `*` or `?` is a wildcard pattern matched
//! against string values (`*` any run of characters, `?` exactly one).
//! Every other criterion matches by blank-aware value equality, so `""`
//! matches empty cells.

use statsbook_core::Value;

/// Criteria matcher for COUNTIF/SUMIF
#[derive(Debug)]
pub struct CriteriaMatcher {
    criteria_type: CriteriaType,
}

#[derive(Debug)]
enum CriteriaType {
    /// Pattern with at least one wildcard
    Wildcard(Vec<char>),
    /// Anything else
    Equals(Value),
}

impl CriteriaMatcher {
    /// Create a new criteria matcher from the evaluated criteria argument
    pub fn new(criteria: &Value) -> Self {
        let criteria_type = match criteria {
            Value::String(s) if s.contains(['*', '?']) => {
                CriteriaType::Wildcard(s.chars().collect())
            }
            other => CriteriaType::Equals(other.clone()),
        };
        Self { criteria_type }
    }

    /// Check whether a cell value satisfies the criteria
    pub fn matches(&self, value: &Value) -> bool {
        match &self.criteria_type {
            CriteriaType::Wildcard(pattern) => match value {
                Value::String(text) => {
                    let text: Vec<char> = text.chars().collect();
                    wildcard_match(pattern, &text)
                }
                _ => false,
            },
            CriteriaType::Equals(expected) => value == expected,
        }
    }
}

/// Iterative wildcard match with single-star backtracking
fn wildcard_match(pattern: &[char], text: &[char]) -> bool {
    let mut pi = 0; // pattern index
    let mut ti = 0; // text index
    let mut star_pi = None; // position of last * in pattern
    let mut star_ti = 0; // position in text when we matched last *

    while ti < text.len() {
        if pi < pattern.len() && (pattern[pi] == '?' || pattern[pi] == text[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < pattern.len() && pattern[pi] == '*' {
            star_pi = Some(pi);
            star_ti = ti;
            // try matching * with the empty string first
            pi += 1;
        } else if let Some(sp) = star_pi {
            pi = sp + 1;
            star_ti += 1;
            ti = star_ti;
        } else {
            return false;
        }
    }

    // Remaining pattern characters must all be *
    while pi < pattern.len() && pattern[pi] == '*' {
        pi += 1;
    }

    pi == pattern.len()
}
