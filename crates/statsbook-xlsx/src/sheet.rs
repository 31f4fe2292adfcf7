//! Worksheet: cell index, value cache and shared formulas

use std::sync::Arc;

use ahash::AHashMap;
use log::{debug, trace, warn};
use once_cell::unsync::OnceCell;
use statsbook_core::{Address, Comment, Value, MAX_COLS, MAX_ROWS};
use statsbook_formula::{parse_formula, FormulaExpr};

use crate::cell::{Cell, FormulaSource, StoredValue};
use crate::comments::parse_comments;
use crate::error::XlsxResult;
use crate::shared_strings::SharedStrings;
use crate::xml::{Rewrite, XmlDocument, XmlNode};

/// Canonical text of a shared formula group and the cell it was written for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedFormula {
    pub anchor: Address,
    pub text: String,
}

/// One worksheet of the document
///
/// All addresses used as keys are unanchored; callers may pass anchored
/// addresses and they are normalized on the way in.
#[derive(Debug)]
pub struct Sheet {
    name: String,
    path: String,
    xml: XmlDocument,
    cells: AHashMap<Address, Cell>,
    /// Cell addresses in document order
    order: Vec<Address>,
    /// Values set by callers or produced by forced evaluation; these win
    /// over whatever the XML holds
    cache: AHashMap<Address, Value>,
    comments: AHashMap<Address, Comment>,
    /// Built on first use by scanning every formula cell
    shared_formulas: OnceCell<AHashMap<String, SharedFormula>>,
}

impl Sheet {
    /// Build a sheet from its worksheet part and optional comments part
    pub fn parse(
        name: impl Into<String>,
        path: impl Into<String>,
        worksheet: &[u8],
        comments: Option<&[u8]>,
    ) -> XlsxResult<Self> {
        let xml = XmlDocument::parse(worksheet)?;
        let (cells, order) = index_cells(&xml);
        let comments = match comments {
            Some(bytes) => parse_comments(bytes)?,
            None => AHashMap::new(),
        };
        let sheet = Self {
            name: name.into(),
            path: path.into(),
            xml,
            cells,
            order,
            cache: AHashMap::new(),
            comments,
            shared_formulas: OnceCell::new(),
        };
        debug!(
            "loaded sheet {} from {}: {} cells, {} comments",
            sheet.name,
            sheet.path,
            sheet.cells.len(),
            sheet.comments.len()
        );
        Ok(sheet)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Archive path of the worksheet part
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn xml(&self) -> &XmlDocument {
        &self.xml
    }

    /// The cell at `address`, if the grid has one
    pub fn cell(&self, address: &Address) -> Option<&Cell> {
        self.cells.get(&address.unanchored())
    }

    /// Cells in document order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.order.iter().filter_map(|a| self.cells.get(a))
    }

    pub fn comment(&self, address: &Address) -> Option<&Comment> {
        self.comments.get(&address.unanchored())
    }

    /// Stored value of a cell, ignoring the cache
    pub fn literal(&self, address: &Address, strings: &SharedStrings) -> Option<Value> {
        self.cell(address)?.literal(strings)
    }

    pub fn cached(&self, address: &Address) -> Option<&Value> {
        self.cache.get(&address.unanchored())
    }

    pub(crate) fn set_cached(&mut self, address: &Address, value: Value) {
        self.cache.insert(address.unanchored(), value);
    }

    /// Forget every cached and written value; the XML is untouched
    pub fn reset(&mut self) {
        self.cache.clear();
    }

    pub fn is_modified(&self) -> bool {
        !self.cache.is_empty()
    }

    /// Shared formula group `id`
    pub fn shared_formula(&self, id: &str) -> Option<&SharedFormula> {
        self.shared_formulas
            .get_or_init(|| self.build_shared_formulas())
            .get(id)
    }

    fn build_shared_formulas(&self) -> AHashMap<String, SharedFormula> {
        let mut table = AHashMap::new();
        for cell in self.cells() {
            if let Some(FormulaSource::Shared { id, text: Some(text) }) = cell.formula_source() {
                table.insert(
                    id,
                    SharedFormula {
                        anchor: cell.address().unanchored(),
                        text,
                    },
                );
            }
        }
        trace!("sheet {}: {} shared formulas", self.name, table.len());
        table
    }

    /// Parsed formula of a cell, relocated when it belongs to a shared group
    pub fn formula(&self, address: &Address) -> XlsxResult<Option<FormulaExpr>> {
        let Some(cell) = self.cell(address) else {
            return Ok(None);
        };
        match cell.formula_source() {
            None => Ok(None),
            Some(FormulaSource::Direct(text)) => Ok(Some(parse_formula(&text)?)),
            Some(FormulaSource::Shared { id, text }) => match self.shared_formula(&id) {
                Some(shared) => {
                    let canonical = parse_formula(&shared.text)?;
                    let delta = shared.anchor.delta(&cell.address().unanchored());
                    Ok(Some(canonical.relocated(delta)?))
                }
                None => {
                    warn!(
                        "sheet {}: shared formula {} used by {} has no anchor cell",
                        self.name,
                        id,
                        cell.address()
                    );
                    text.map(|t| parse_formula(&t)).transpose().map_err(Into::into)
                }
            },
        }
    }

    /// Formula text of a cell as written for that cell
    pub fn formula_text(&self, address: &Address) -> XlsxResult<Option<String>> {
        let Some(cell) = self.cell(address) else {
            return Ok(None);
        };
        Ok(match cell.formula_source() {
            Some(FormulaSource::Direct(text)) => Some(text),
            Some(FormulaSource::Shared { .. }) => {
                self.formula(address)?.map(|expr| expr.to_string())
            }
            None => None,
        })
    }

    /// Addresses of every cell with a formula, in document order
    pub fn formula_cells(&self) -> Vec<Address> {
        self.cells()
            .filter(|cell| cell.has_formula())
            .map(Cell::address)
            .collect()
    }

    /// Bottom-right corner of the rectangle from A1 that encloses every
    /// cell with a stored value
    pub fn bottom_right(&self, strings: &SharedStrings) -> Address {
        self.cells()
            .filter(|cell| cell.literal(strings).is_some())
            .fold(Address::new(1, 0), |corner, cell| {
                let a = cell.address();
                Address::new(corner.row.max(a.row), corner.col.max(a.col))
            })
    }

    /// The worksheet with every cached value written into its cell
    ///
    /// Only cells whose cached value differs from the stored one change.
    /// Returns `None` when no cell needs rewriting. New strings are added
    /// to `strings` when `use_shared_strings` is set and the package has a
    /// shared strings part; otherwise they are written inline unless the
    /// table already holds them.
    pub(crate) fn rewrite(
        &self,
        strings: &mut SharedStrings,
        use_shared_strings: bool,
    ) -> Option<XmlDocument> {
        let mut pending: AHashMap<*const XmlNode, StoredValue> = AHashMap::new();
        for address in &self.order {
            let (Some(value), Some(cell)) = (self.cache.get(address), self.cells.get(address)) else {
                continue;
            };
            let stored = cell.literal(strings).unwrap_or_default();
            if stored == *value {
                continue;
            }
            let target = stored_value(value, cell.has_formula(), strings, use_shared_strings);
            trace!("sheet {}: {} {:?} -> {:?}", self.name, address, stored, target);
            pending.insert(cell.node_ptr(), target);
        }
        if pending.is_empty() {
            return None;
        }

        let cells_by_node: AHashMap<*const XmlNode, &Cell> =
            self.cells.values().map(|c| (c.node_ptr(), c)).collect();
        let rewritten = self.xml.walk_and_update(|node| {
            let ptr: *const XmlNode = node;
            match (pending.get(&ptr), cells_by_node.get(&ptr)) {
                (Some(stored), Some(cell)) => Rewrite::Replace(cell.with_value(stored)),
                _ => Rewrite::Keep,
            }
        });
        debug!("sheet {}: rewrote {} cells", self.name, pending.len());
        Some(rewritten)
    }

    /// Make a rewritten worksheet the new baseline
    ///
    /// The cache is kept, so later evaluation still sees written values.
    pub(crate) fn commit(&mut self, xml: XmlDocument) {
        let (cells, order) = index_cells(&xml);
        self.xml = xml;
        self.cells = cells;
        self.order = order;
    }
}

/// Encoding of `value` for a cell's `<v>`
fn stored_value(
    value: &Value,
    is_formula: bool,
    strings: &mut SharedStrings,
    use_shared_strings: bool,
) -> StoredValue {
    match value {
        Value::Undefined => StoredValue::Remove,
        Value::Bool(b) => StoredValue::Bool(*b),
        Value::Number(n) if n.is_finite() => StoredValue::Number(*n),
        Value::Number(n) if n.is_nan() => StoredValue::Error("#NUM!"),
        Value::Number(_) => StoredValue::Error("#DIV/0!"),
        Value::String(s) if s.is_empty() => StoredValue::Remove,
        Value::String(s) if is_formula => StoredValue::FormulaString(s.clone()),
        Value::String(s) => {
            if use_shared_strings && strings.has_part() {
                StoredValue::SharedString(strings.reference(s))
            } else if let Some(i) = strings.reference_existing(s) {
                StoredValue::SharedString(i)
            } else {
                StoredValue::InlineString(s.clone())
            }
        }
    }
}

/// Index the `<c>` elements under `sheetData`
///
/// Rows and cells without an `r` attribute take the position after the
/// previous one. Rows and cells that fall outside the grid are skipped.
fn index_cells(xml: &XmlDocument) -> (AHashMap<Address, Cell>, Vec<Address>) {
    let mut cells = AHashMap::new();
    let mut order = Vec::new();
    let Some(data) = xml
        .root_element()
        .and_then(|worksheet| worksheet.first_child("sheetData"))
    else {
        return (cells, order);
    };

    let mut last_row = 0u32;
    for row in data.children().iter().filter(|n| n.is_element("row")) {
        let row_number = match row.attr("r") {
            Some(r) => r.parse::<u32>().ok(),
            None => last_row.checked_add(1),
        }
        .filter(|n| (1..=MAX_ROWS).contains(n));
        match row_number {
            Some(n) => last_row = n,
            None => warn!("skipping row outside the grid (r={:?})", row.attr("r")),
        }

        let mut last_col: Option<u32> = None;
        for c in row.children().iter().filter(|n| n.is_element("c")) {
            let address = match c.attr("r").and_then(Address::parse) {
                Some(a) => a.unanchored(),
                None => {
                    let col = match last_col {
                        Some(col) => col.checked_add(1).filter(|col| *col < MAX_COLS),
                        None => Some(0),
                    };
                    let (Some(row), Some(col)) = (row_number, col) else {
                        warn!("skipping cell outside the grid (r={:?})", c.attr("r"));
                        continue;
                    };
                    Address::new(row, col)
                }
            };
            last_col = Some(address.col);
            if cells.insert(address, Cell::new(address, Arc::clone(c))).is_none() {
                order.push(address);
            }
        }
    }
    (cells, order)
}
