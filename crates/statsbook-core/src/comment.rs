//! Cell comments and commented values
//!
//! ## Example
//!
//! ```rust
//! use statsbook_core::{Comment, CommentedValue, Value};
//!
//! let entry = CommentedValue::new(Value::from("Jammer"))
//!     .with_comment(Comment::new("Lead", "Called off"));
//! assert!(!entry.is_empty());
//! assert_eq!(entry.comment.unwrap().to_string(), "[Lead]: Called off");
//! ```

use crate::cell::Value;

/// A cell comment (note) as read from a sheet's comments part
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    /// Author, resolved through the comments part's author list
    pub author: Option<String>,
    /// Plain text of the comment body (rich runs concatenated)
    pub text: String,
}

impl Comment {
    /// Create a comment with the given author and text
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            text: text.into(),
        }
    }

    /// Create a comment with just text
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            author: None,
            text: text.into(),
        }
    }

    pub fn has_author(&self) -> bool {
        self.author.as_deref().map_or(false, |a| !a.is_empty())
    }
}

impl std::fmt::Display for Comment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.author {
            Some(author) if !author.is_empty() => write!(f, "[{}]: {}", author, self.text),
            _ => write!(f, "{}", self.text),
        }
    }
}

/// A cell's value together with its comment and formula text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentedValue {
    pub value: Option<Value>,
    pub comment: Option<Comment>,
    pub formula: Option<String>,
}

impl CommentedValue {
    pub fn new(value: Value) -> Self {
        Self {
            value: Some(value),
            comment: None,
            formula: None,
        }
    }

    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comment = Some(comment);
        self
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    /// True when there is neither a non-blank value nor a comment
    pub fn is_empty(&self) -> bool {
        self.value.as_ref().map_or(true, Value::is_empty) && self.comment.is_none()
    }
}
