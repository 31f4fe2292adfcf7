//! Document options and boolean cell encodings

use statsbook_core::Value;

/// Options for [`Document::open_with_options`](crate::Document::open_with_options)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Write new strings through the shared strings table (default), or as
    /// inline strings. Some consumers do not read inline strings.
    pub shared_strings: bool,
    /// Required text of `'Read Me'!A3`, checked when opening
    pub expected_version: Option<String>,
    /// Check the CRC-32 of every decompressed part
    pub verify_checksums: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            shared_strings: true,
            expected_version: None,
            verify_checksums: true,
        }
    }
}

impl DocumentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shared_strings(mut self, shared: bool) -> Self {
        self.shared_strings = shared;
        self
    }

    pub fn with_expected_version(mut self, version: impl Into<String>) -> Self {
        self.expected_version = Some(version.into());
        self
    }

    pub fn with_checksums(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }
}

/// How a yes/no field is written into its cell
///
/// The stats book is not consistent: some fields take an "X", others
/// "YES"/"NO", and some have an explicit "YES | NO" placeholder for unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanFormat {
    pub true_value: &'static str,
    /// Empty means the cell is cleared
    pub false_value: &'static str,
    pub undefined_value: &'static str,
}

impl BooleanFormat {
    /// "X" for true, blank otherwise
    pub const X_IS_TRUE: BooleanFormat = BooleanFormat {
        true_value: "X",
        false_value: "",
        undefined_value: "",
    };

    /// "YES" / "NO", with "YES | NO" for unset
    pub const YES_BAR_NO: BooleanFormat = BooleanFormat {
        true_value: "YES",
        false_value: "NO",
        undefined_value: "YES | NO",
    };

    /// "YES" / "NO", unset written as "NO"
    pub const DEFAULT_TO_NO: BooleanFormat = BooleanFormat {
        true_value: "YES",
        false_value: "NO",
        undefined_value: "NO",
    };

    /// "YES" / "NO", blank for unset
    pub const YES_OR_NO: BooleanFormat = BooleanFormat {
        true_value: "YES",
        false_value: "NO",
        undefined_value: "",
    };

    /// Cell value for `value`
    pub fn encode(&self, value: Option<bool>) -> Value {
        let text = match value {
            Some(true) => self.true_value,
            Some(false) => self.false_value,
            None => self.undefined_value,
        };
        if text.is_empty() {
            Value::Undefined
        } else {
            Value::from(text)
        }
    }

    /// Read a yes/no cell
    ///
    /// Accepts every spelling the stats book uses regardless of format and
    /// letter case: blank reads as `false`, and text that is neither yes nor no
    /// (such as "YES | NO") reads as unset.
    pub fn decode(value: &Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Undefined => Some(false),
            Value::String(s) => {
                let is = |spelling: &str| s.eq_ignore_ascii_case(spelling);
                if is("x") || is("yes") || is("y") {
                    Some(true)
                } else if s.is_empty() || is("no") || is("n") {
                    Some(false)
                } else {
                    None
                }
            }
            Value::Number(_) => None,
        }
    }
}
