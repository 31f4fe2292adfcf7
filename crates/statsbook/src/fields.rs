//! Named fields at fixed cells
//!
//! Each record type of the stats book keeps its fields at fixed addresses.
//! A record type is described by a static table of [`Field`]s and read or
//! written through [`DocumentFields`].
//!
//! ```rust
//! use statsbook::{BooleanFormat, Field};
//!
//! const IGRF: &[Field] = &[
//!     Field::value("venue", "IGRF", "B3"),
//!     Field::flag("sanctioned", "IGRF", "K3", BooleanFormat::X_IS_TRUE),
//! ];
//!
//! assert_eq!(Field::find(IGRF, "venue").unwrap().address, "B3");
//! ```

use statsbook_core::{Address, CommentedValue, Value};
use statsbook_xlsx::{BooleanFormat, Document, XlsxResult};

/// How a field's cell is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any value, read and written as is
    Value,
    /// A yes/no field written with the given encoding
    Flag(BooleanFormat),
}

/// One named field of a record type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub sheet: &'static str,
    /// Cell address, such as `"B3"`
    pub address: &'static str,
    pub kind: FieldKind,
}

impl Field {
    pub const fn value(name: &'static str, sheet: &'static str, address: &'static str) -> Self {
        Self {
            name,
            sheet,
            address,
            kind: FieldKind::Value,
        }
    }

    pub const fn flag(
        name: &'static str,
        sheet: &'static str,
        address: &'static str,
        format: BooleanFormat,
    ) -> Self {
        Self {
            name,
            sheet,
            address,
            kind: FieldKind::Flag(format),
        }
    }

    /// The field named `name` in `table`
    pub fn find<'a>(table: &'a [Field], name: &str) -> Option<&'a Field> {
        table.iter().find(|field| field.name == name)
    }

    pub fn cell(&self) -> XlsxResult<Address> {
        Ok(self.address.parse::<Address>()?)
    }
}

/// Field access on a [`Document`]
pub trait DocumentFields {
    /// Value, comment and formula of a field
    fn read_field(&mut self, field: &Field) -> XlsxResult<CommentedValue>;

    /// Write a field's value
    fn write_field(&mut self, field: &Field, value: Value) -> XlsxResult<()>;

    /// Read a yes/no field
    fn read_flag(&mut self, field: &Field) -> XlsxResult<Option<bool>>;

    /// Write a yes/no field with its encoding; a plain field is encoded
    /// as "YES" / "NO"
    fn write_flag(&mut self, field: &Field, value: Option<bool>) -> XlsxResult<()>;
}

impl DocumentFields for Document {
    fn read_field(&mut self, field: &Field) -> XlsxResult<CommentedValue> {
        self.commented_value(field.sheet, &field.cell()?)
    }

    fn write_field(&mut self, field: &Field, value: Value) -> XlsxResult<()> {
        self.set_value(field.sheet, &field.cell()?, value)
    }

    fn read_flag(&mut self, field: &Field) -> XlsxResult<Option<bool>> {
        self.get_bool(field.sheet, &field.cell()?)
    }

    fn write_flag(&mut self, field: &Field, value: Option<bool>) -> XlsxResult<()> {
        let format = match field.kind {
            FieldKind::Flag(format) => format,
            FieldKind::Value => BooleanFormat::YES_OR_NO,
        };
        self.set_bool(field.sheet, &field.cell()?, value, &format)
    }
}
