//! Workbook index: sheet names and where their parts live

use log::warn;

use crate::error::{XlsxError, XlsxResult};
use crate::relationships::{
    part_dir, resolve_target, Relationships, REL_COMMENTS, REL_SHARED_STRINGS, REL_STYLES,
    REL_WORKSHEET,
};
use crate::xml::XmlDocument;

/// Workbook part path
pub const WORKBOOK_PATH: &str = "xl/workbook.xml";

/// Relationship types that are understood even though only worksheets,
/// shared strings and styles are followed
const KNOWN_REL_TYPES: &[&str] = &[
    "/theme",
    "/calcChain",
    "/customXml",
    "/externalLink",
    "/connections",
    "/pivotCacheDefinition",
    "/volatileDependencies",
    "/chartsheet",
    "/metadata",
    "/vbaProject",
];

/// One `<sheet>` of the workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    pub name: String,
    pub sheet_id: Option<String>,
    pub rel_id: Option<String>,
    /// Archive path of the worksheet part, when the relationship resolves
    pub path: Option<String>,
}

/// Sheets of the workbook in tab order, plus the shared parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookIndex {
    sheets: Vec<SheetEntry>,
    shared_strings_path: Option<String>,
    styles_path: Option<String>,
}

impl WorkbookIndex {
    /// Build the index from `xl/workbook.xml` and its relationships part
    pub fn parse(workbook: &[u8], rels: &[u8]) -> XlsxResult<Self> {
        let doc = XmlDocument::parse(workbook)?;
        let root = doc
            .root_element()
            .filter(|root| root.is_element("workbook"))
            .ok_or_else(|| XlsxError::InvalidFormat("workbook part has no <workbook>".into()))?;
        let rels = Relationships::parse(rels)?;
        let base = part_dir(WORKBOOK_PATH);

        for rel in rels.iter() {
            let followed = [REL_WORKSHEET, REL_SHARED_STRINGS, REL_STYLES, REL_COMMENTS]
                .iter()
                .chain(KNOWN_REL_TYPES)
                .any(|suffix| rel.is_type(suffix));
            if !followed {
                warn!("skipping workbook relationship {} of type {}", rel.id, rel.rel_type);
            }
        }

        let sheets = root
            .first_child("sheets")
            .map(|sheets| {
                sheets
                    .all_children("sheet")
                    .filter_map(|sheet| {
                        let name = sheet.attr("name")?.to_string();
                        let rel_id = sheet.attr("r:id").map(str::to_string);
                        let path = rel_id
                            .as_deref()
                            .and_then(|id| rels.get(id))
                            .filter(|rel| rel.is_type(REL_WORKSHEET) && !rel.external)
                            .map(|rel| resolve_target(base, &rel.target));
                        Some(SheetEntry {
                            name,
                            sheet_id: sheet.attr("sheetId").map(str::to_string),
                            rel_id,
                            path,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let part_of = |suffix: &str| {
            rels.first_of_type(suffix)
                .filter(|rel| !rel.external)
                .map(|rel| resolve_target(base, &rel.target))
        };

        Ok(Self {
            sheets,
            shared_strings_path: part_of(REL_SHARED_STRINGS),
            styles_path: part_of(REL_STYLES),
        })
    }

    /// Sheets in tab order
    pub fn sheets(&self) -> &[SheetEntry] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }

    /// Archive path of the named sheet
    pub fn sheet_path(&self, name: &str) -> XlsxResult<&str> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .and_then(|s| s.path.as_deref())
            .ok_or_else(|| XlsxError::SheetNotFound(name.to_string()))
    }

    pub fn shared_strings_path(&self) -> Option<&str> {
        self.shared_strings_path.as_deref()
    }

    pub fn styles_path(&self) -> Option<&str> {
        self.styles_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Read Me" sheetId="1" r:id="rId1"/><sheet name="IGRF" sheetId="2" r:id="rId2"/><sheet name="Broken" sheetId="3" r:id="rId7"/></sheets></workbook>"#;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet2.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/><Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

    #[test]
    fn test_sheet_paths() {
        let index = WorkbookIndex::parse(WORKBOOK.as_bytes(), RELS.as_bytes()).unwrap();
        assert_eq!(
            index.sheet_names().collect::<Vec<_>>(),
            vec!["Read Me", "IGRF", "Broken"]
        );
        assert_eq!(index.sheet_path("Read Me").unwrap(), "xl/worksheets/sheet1.xml");
        assert_eq!(index.sheet_path("IGRF").unwrap(), "xl/worksheets/sheet2.xml");
        assert_eq!(index.shared_strings_path(), Some("xl/sharedStrings.xml"));
        assert_eq!(index.styles_path(), Some("xl/styles.xml"));
    }

    #[test]
    fn test_unresolved_sheets() {
        let index = WorkbookIndex::parse(WORKBOOK.as_bytes(), RELS.as_bytes()).unwrap();
        assert!(matches!(
            index.sheet_path("Broken"),
            Err(XlsxError::SheetNotFound(name)) if name == "Broken"
        ));
        assert!(matches!(
            index.sheet_path("Penalties"),
            Err(XlsxError::SheetNotFound(_))
        ));
    }

    #[test]
    fn test_requires_workbook_element() {
        assert!(matches!(
            WorkbookIndex::parse(b"<sst/>", RELS.as_bytes()),
            Err(XlsxError::InvalidFormat(_))
        ));
    }
}
