//! Number formats from the styles part (`xl/styles.xml`)

use ahash::AHashMap;

use crate::error::XlsxResult;
use crate::xml::{XmlDocument, XmlNode};

/// Built-in format codes the stats book relies on when the styles part
/// does not spell them out
const BUILTIN_FORMATS: &[(u32, &str)] = &[
    (14, "m/d/yyyy"),
    (22, "m/d/yyyy h:mm"),
    (37, "#,##0_);(#,##0)"),
    (38, "#,##0_);[Red](#,##0)"),
    (39, "#,##0.00_);(#,##0.00)"),
    (40, "#,##0.00_);[Red](#,##0.00)"),
    (47, "mm:ss.0"),
    (55, "yyyy/mm/dd"),
];

/// One `<xf>` record, reduced to what format lookup needs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Xf {
    num_fmt_id: Option<u32>,
    /// Parent `cellStyleXfs` entry
    xf_id: Option<u32>,
}

impl Xf {
    fn from_node(node: &XmlNode) -> Self {
        Self {
            num_fmt_id: node.attr("numFmtId").and_then(|v| v.parse().ok()),
            xf_id: node.attr("xfId").and_then(|v| v.parse().ok()),
        }
    }
}

/// Parsed cell formats
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Styles {
    number_formats: AHashMap<u32, String>,
    cell_xfs: Vec<Xf>,
    cell_style_xfs: Vec<Xf>,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            number_formats: builtin_formats(),
            cell_xfs: Vec::new(),
            cell_style_xfs: Vec::new(),
        }
    }
}

fn builtin_formats() -> AHashMap<u32, String> {
    BUILTIN_FORMATS
        .iter()
        .map(|&(id, code)| (id, code.to_string()))
        .collect()
}

impl Styles {
    /// Parse a styles part
    pub fn parse(bytes: &[u8]) -> XlsxResult<Self> {
        let doc = XmlDocument::parse(bytes)?;
        let Some(sheet) = doc.root_element() else {
            return Ok(Self::default());
        };

        let mut number_formats = builtin_formats();
        if let Some(num_fmts) = sheet.first_child("numFmts") {
            for fmt in num_fmts.all_children("numFmt") {
                let id = fmt.attr("numFmtId").and_then(|v| v.parse().ok());
                if let (Some(id), Some(code)) = (id, fmt.attr("formatCode")) {
                    number_formats.insert(id, code.to_string());
                }
            }
        }

        let xfs = |list: &str| -> Vec<Xf> {
            sheet
                .first_child(list)
                .map(|l| l.all_children("xf").map(Xf::from_node).collect())
                .unwrap_or_default()
        };

        Ok(Self {
            number_formats,
            cell_xfs: xfs("cellXfs"),
            cell_style_xfs: xfs("cellStyleXfs"),
        })
    }

    /// Format code for a number format id
    pub fn format_code(&self, num_fmt_id: u32) -> Option<&str> {
        self.number_formats.get(&num_fmt_id).map(String::as_str)
    }

    /// Format code applied by a cell style (`s` attribute of a cell)
    ///
    /// The cell's `xf` inherits the format of its parent style record and
    /// overrides it with its own `numFmtId` when it has one.
    pub fn number_format(&self, style_id: u32) -> Option<&str> {
        let xf = self.cell_xfs.get(style_id as usize)?;
        let inherited = xf
            .xf_id
            .and_then(|parent| self.cell_style_xfs.get(parent as usize))
            .and_then(|parent| parent.num_fmt_id);
        xf.num_fmt_id
            .or(inherited)
            .and_then(|id| self.format_code(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><numFmts count="2"><numFmt numFmtId="164" formatCode="0.0%"/><numFmt numFmtId="14" formatCode="yyyy-mm-dd"/></numFmts><cellStyleXfs count="2"><xf numFmtId="0" fontId="0"/><xf numFmtId="47" fontId="1"/></cellStyleXfs><cellXfs count="4"><xf numFmtId="0" xfId="0"/><xf numFmtId="164" xfId="0"/><xf xfId="1"/><xf numFmtId="14" xfId="1"/></cellXfs></styleSheet>"#;

    #[test]
    fn test_number_formats() {
        let styles = Styles::parse(STYLES.as_bytes()).unwrap();
        assert_eq!(styles.number_format(0), None);
        assert_eq!(styles.number_format(1), Some("0.0%"));
        // inherited from the parent style record
        assert_eq!(styles.number_format(2), Some("mm:ss.0"));
        // part definition overrides the built-in code
        assert_eq!(styles.number_format(3), Some("yyyy-mm-dd"));
        assert_eq!(styles.number_format(10), None);
    }

    #[test]
    fn test_builtin_defaults() {
        let styles = Styles::default();
        assert_eq!(styles.format_code(22), Some("m/d/yyyy h:mm"));
        assert_eq!(styles.format_code(55), Some("yyyy/mm/dd"));
        assert_eq!(styles.format_code(164), None);
    }
}
