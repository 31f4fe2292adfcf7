//! The open workbook: parts, sheets, evaluation and saving

use std::path::Path;

use ahash::AHashMap;
use log::debug;
use statsbook_core::{Address, Comment, CommentedValue, Value};
use statsbook_formula::{evaluate_at, CellResolver, FormulaError, FormulaResult};

use crate::archive::ZipContainer;
use crate::error::{XlsxError, XlsxResult};
use crate::options::{BooleanFormat, DocumentOptions};
use crate::relationships::{part_dir, rels_path_for, resolve_target, Relationships, REL_COMMENTS};
use crate::shared_strings::SharedStrings;
use crate::sheet::Sheet;
use crate::styles::Styles;
use crate::workbook::{WorkbookIndex, WORKBOOK_PATH};

/// Relationships part of the workbook
const WORKBOOK_RELS_PATH: &str = "xl/_rels/workbook.xml.rels";

/// Sheet and cell holding the release name of the stats book
const VERSION_SHEET: &str = "Read Me";
const VERSION_CELL: Address = Address::new(3, 0);

/// An xlsx document opened from memory
///
/// Sheets are parsed on first use. Reads go through the per-sheet value
/// cache, writes land in it, and [`Document::save`] folds the cache back
/// into the worksheet parts.
#[derive(Debug)]
pub struct Document {
    container: ZipContainer,
    options: DocumentOptions,
    workbook: WorkbookIndex,
    shared_strings: SharedStrings,
    styles: Styles,
    sheets: AHashMap<String, Sheet>,
    /// Formula cells being evaluated, innermost last
    eval_stack: Vec<(String, Address)>,
}

impl Document {
    /// Open a document with default options
    pub fn open(bytes: Vec<u8>) -> XlsxResult<Self> {
        Self::open_with_options(bytes, DocumentOptions::default())
    }

    /// Read and open a document from disk
    pub fn open_file<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open(bytes)
    }

    pub fn open_with_options(bytes: Vec<u8>, options: DocumentOptions) -> XlsxResult<Self> {
        let container = ZipContainer::new(bytes)?.with_checksums(options.verify_checksums);

        let workbook_bytes = required_part(&container, WORKBOOK_PATH)?;
        let rels_bytes = required_part(&container, WORKBOOK_RELS_PATH)?;
        let workbook = WorkbookIndex::parse(&workbook_bytes, &rels_bytes)?;

        let shared_strings = match workbook.shared_strings_path() {
            Some(path) if container.contains(path) => SharedStrings::parse(&container.data(path)?)?,
            _ => SharedStrings::default(),
        };
        let styles = match workbook.styles_path() {
            Some(path) if container.contains(path) => Styles::parse(&container.data(path)?)?,
            _ => Styles::default(),
        };

        debug!(
            "opened workbook with {} sheets, {} shared strings",
            workbook.sheets().len(),
            shared_strings.len()
        );

        let mut document = Self {
            container,
            options,
            workbook,
            shared_strings,
            styles,
            sheets: AHashMap::new(),
            eval_stack: Vec::new(),
        };

        if let Some(expected) = document.options.expected_version.clone() {
            let found = document.version()?;
            let found = match found {
                Some(found) => found,
                None => {
                    // the sheet must exist for a versioned book
                    document.workbook.sheet_path(VERSION_SHEET)?;
                    String::new()
                }
            };
            if found != expected {
                return Err(XlsxError::UnsupportedVersion { expected, found });
            }
        }
        Ok(document)
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    /// Sheet names in tab order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.workbook.sheet_names().collect()
    }

    pub fn shared_strings(&self) -> &SharedStrings {
        &self.shared_strings
    }

    /// The named sheet, parsing it on first use
    pub fn sheet(&mut self, name: &str) -> XlsxResult<&Sheet> {
        self.load_sheet(name)?;
        self.sheets
            .get(name)
            .ok_or_else(|| XlsxError::SheetNotFound(name.to_string()))
    }

    fn load_sheet(&mut self, name: &str) -> XlsxResult<()> {
        if self.sheets.contains_key(name) {
            return Ok(());
        }
        let path = self.workbook.sheet_path(name)?.to_string();
        if !self.container.contains(&path) {
            return Err(XlsxError::SheetNotFound(name.to_string()));
        }
        let worksheet = self.container.data(&path)?;

        let rels_path = rels_path_for(&path);
        let comments = if self.container.contains(&rels_path) {
            let rels = Relationships::parse(&self.container.data(&rels_path)?)?;
            match rels.first_of_type(REL_COMMENTS).filter(|rel| !rel.external) {
                Some(rel) => {
                    let target = resolve_target(part_dir(&path), &rel.target);
                    if self.container.contains(&target) {
                        Some(self.container.data(&target)?)
                    } else {
                        None
                    }
                }
                None => None,
            }
        } else {
            None
        };

        let sheet = Sheet::parse(name, path, &worksheet, comments.as_deref())?;
        self.sheets.insert(name.to_string(), sheet);
        Ok(())
    }

    fn loaded(&self, name: &str) -> XlsxResult<&Sheet> {
        self.sheets
            .get(name)
            .ok_or_else(|| XlsxError::SheetNotFound(name.to_string()))
    }

    fn loaded_mut(&mut self, name: &str) -> XlsxResult<&mut Sheet> {
        self.sheets
            .get_mut(name)
            .ok_or_else(|| XlsxError::SheetNotFound(name.to_string()))
    }

    /// Current value of a cell, evaluating its formula if it has one
    ///
    /// A cell missing from the grid reads as [`Value::Undefined`].
    pub fn value(&mut self, sheet: &str, address: &Address) -> XlsxResult<Value> {
        self.eval(sheet, address, true)
    }

    /// Value of a cell under the caching policy
    ///
    /// A cached value always wins. Otherwise a formula is evaluated when
    /// `force` is set or the cell has no stored value, and the result is
    /// cached; a stored value is returned as is.
    pub fn eval(&mut self, sheet: &str, address: &Address, force: bool) -> XlsxResult<Value> {
        let address = address.unanchored();
        self.load_sheet(sheet)?;
        let loaded = self.loaded(sheet)?;
        if let Some(value) = loaded.cached(&address) {
            return Ok(value.clone());
        }
        let Some(cell) = loaded.cell(&address) else {
            return Ok(Value::Undefined);
        };
        let literal = cell.literal(&self.shared_strings);
        if !cell.has_formula() || (!force && literal.is_some()) {
            return Ok(literal.unwrap_or_default());
        }

        let Some(expr) = loaded.formula(&address)? else {
            return Ok(literal.unwrap_or_default());
        };

        let frame = (sheet.to_string(), address);
        if self.eval_stack.contains(&frame) {
            return Err(FormulaError::CycleDetected(format!("{}!{}", sheet, address)).into());
        }
        self.eval_stack.push(frame);
        let result = {
            let mut resolver = DocumentResolver {
                document: &mut *self,
                sheet,
            };
            evaluate_at(&expr, address, &mut resolver)
        };
        self.eval_stack.pop();

        let value = result?;
        self.loaded_mut(sheet)?.set_cached(&address, value.clone());
        Ok(value)
    }

    /// Write a value into a cell's cache; it reaches the XML on save
    ///
    /// The grid is never extended: writing to an address that has no cell
    /// fails with [`XlsxError::CellNotFound`].
    pub fn set_value(
        &mut self,
        sheet: &str,
        address: &Address,
        value: impl Into<Value>,
    ) -> XlsxResult<()> {
        self.load_sheet(sheet)?;
        let target = self.loaded_mut(sheet)?;
        if target.cell(address).is_none() {
            return Err(XlsxError::CellNotFound {
                sheet: sheet.to_string(),
                address: address.unanchored().to_string(),
            });
        }
        target.set_cached(address, value.into());
        Ok(())
    }

    /// Write a yes/no field using the field's encoding
    pub fn set_bool(
        &mut self,
        sheet: &str,
        address: &Address,
        value: Option<bool>,
        format: &BooleanFormat,
    ) -> XlsxResult<()> {
        self.set_value(sheet, address, format.encode(value))
    }

    /// Read a yes/no field; `None` when the text is neither
    pub fn get_bool(&mut self, sheet: &str, address: &Address) -> XlsxResult<Option<bool>> {
        let value = self.value(sheet, address)?;
        Ok(BooleanFormat::decode(&value))
    }

    /// Formula text of a cell, relocated for shared formulas
    pub fn formula(&mut self, sheet: &str, address: &Address) -> XlsxResult<Option<String>> {
        self.sheet(sheet)?.formula_text(address)
    }

    pub fn comment(&mut self, sheet: &str, address: &Address) -> XlsxResult<Option<Comment>> {
        Ok(self.sheet(sheet)?.comment(address).cloned())
    }

    /// Value, comment and formula of a cell together
    pub fn commented_value(
        &mut self,
        sheet: &str,
        address: &Address,
    ) -> XlsxResult<CommentedValue> {
        let value = self.value(sheet, address)?;
        let loaded = self.loaded(sheet)?;
        let mut result = CommentedValue::new(value);
        if let Some(comment) = loaded.comment(address) {
            result = result.with_comment(comment.clone());
        }
        if let Some(formula) = loaded.formula_text(address)? {
            result = result.with_formula(formula);
        }
        Ok(result)
    }

    /// Number format code applied to a cell through its style
    pub fn number_format(&mut self, sheet: &str, address: &Address) -> XlsxResult<Option<String>> {
        let style_id = self.sheet(sheet)?.cell(address).and_then(|c| c.style_id());
        Ok(style_id
            .and_then(|id| self.styles.number_format(id))
            .map(str::to_string))
    }

    /// Bottom-right corner of the sheet's used range
    pub fn bottom_right(&mut self, sheet: &str) -> XlsxResult<Address> {
        self.load_sheet(sheet)?;
        Ok(self.loaded(sheet)?.bottom_right(&self.shared_strings))
    }

    /// Evaluate every formula in a sheet, optionally dropping the cache first
    pub fn recalc(&mut self, sheet: &str, reset: bool) -> XlsxResult<()> {
        self.load_sheet(sheet)?;
        if reset {
            self.loaded_mut(sheet)?.reset();
        }
        let formulas = self.loaded(sheet)?.formula_cells();
        debug!("recalculating {} formulas on {}", formulas.len(), sheet);
        for address in &formulas {
            self.eval(sheet, address, true)?;
        }
        Ok(())
    }

    /// Drop a sheet's cached values
    pub fn reset(&mut self, sheet: &str) -> XlsxResult<()> {
        self.load_sheet(sheet)?;
        self.loaded_mut(sheet)?.reset();
        Ok(())
    }

    /// Release name held in `'Read Me'!A3`, if the book has one
    pub fn version(&mut self) -> XlsxResult<Option<String>> {
        if self.workbook.sheet_path(VERSION_SHEET).is_err() {
            return Ok(None);
        }
        self.load_sheet(VERSION_SHEET)?;
        Ok(self
            .loaded(VERSION_SHEET)?
            .literal(&VERSION_CELL, &self.shared_strings)
            .filter(|v| !v.is_empty())
            .map(|v| v.as_string()))
    }

    /// Serialize the document with every pending write applied
    ///
    /// Parts nothing was written to keep their original bytes. Either the
    /// whole save succeeds and the written XML becomes the new baseline,
    /// or the document is left as it was.
    pub fn save(&mut self) -> XlsxResult<Vec<u8>> {
        let mut strings = self.shared_strings.clone();
        let mut container = self.container.clone();
        let mut rewritten = Vec::new();

        for entry in self.workbook.sheets() {
            let Some(sheet) = self.sheets.get(&entry.name) else {
                continue;
            };
            if let Some(xml) = sheet.rewrite(&mut strings, self.options.shared_strings) {
                container.replace(sheet.path(), xml.to_xml().as_bytes())?;
                rewritten.push((entry.name.clone(), xml));
            }
        }

        let strings_xml = strings.rewrite();
        if let (Some(xml), Some(path)) = (&strings_xml, self.workbook.shared_strings_path()) {
            container.replace(path, xml.to_xml().as_bytes())?;
        }

        let bytes = container.save()?;

        for (name, xml) in rewritten {
            self.loaded_mut(&name)?.commit(xml);
        }
        if let Some(xml) = strings_xml {
            strings.commit(xml);
        }
        debug!("saved document ({} bytes)", bytes.len());
        self.shared_strings = strings;
        self.container = container;
        Ok(bytes)
    }

    /// Save to a file
    pub fn save_file<P: AsRef<Path>>(&mut self, path: P) -> XlsxResult<()> {
        let bytes = self.save()?;
        std::fs::write(path.as_ref(), bytes)?;
        Ok(())
    }
}

fn required_part(container: &ZipContainer, path: &str) -> XlsxResult<Vec<u8>> {
    if !container.contains(path) {
        return Err(XlsxError::MissingPart(path.to_string()));
    }
    Ok(container.data(path)?)
}

/// Resolves formula references through the document, evaluating the
/// referenced cells as needed
struct DocumentResolver<'a> {
    document: &'a mut Document,
    /// Sheet of the formula being evaluated
    sheet: &'a str,
}

impl CellResolver for DocumentResolver<'_> {
    fn resolve(&mut self, sheet: Option<&str>, address: &Address) -> FormulaResult<Value> {
        let sheet = sheet.unwrap_or(self.sheet);
        self.document
            .value(sheet, address)
            .map_err(|e| match e {
                XlsxError::Formula(e) => e,
                XlsxError::SheetNotFound(name) => FormulaError::UnknownSheet(name),
                other => FormulaError::ReferenceFailed(other.to_string()),
            })
    }
}
