//! Reading and evaluating cells of an opened document

mod common;

use common::{statsbook, Book, WORKBOOK};
use pretty_assertions::assert_eq;
use statsbook_core::{Address, Comment, Value};
use statsbook_formula::FormulaError;
use statsbook_xlsx::{BooleanFormat, Document, DocumentOptions, XlsxError};

fn a(s: &str) -> Address {
    Address::parse(s).unwrap()
}

fn open() -> Document {
    Document::open(statsbook()).unwrap()
}

#[test]
fn test_open_lists_sheets() {
    let mut doc = open();
    assert_eq!(doc.sheet_names(), vec!["Read Me", "Score", "Penalties"]);
    assert_eq!(doc.version().unwrap().as_deref(), Some("January 2019 Release"));
    assert_eq!(doc.sheet("Score").unwrap().path(), "xl/worksheets/sheet2.xml");
    assert_eq!(doc.sheet("Penalties").unwrap().path(), "xl/worksheets/sheet3.xml");
}

#[test]
fn test_unknown_sheet() {
    let mut doc = open();
    assert!(matches!(doc.sheet("Lineups"), Err(XlsxError::SheetNotFound(name)) if name == "Lineups"));
    assert!(matches!(
        doc.value("Lineups", &a("A1")),
        Err(XlsxError::SheetNotFound(_))
    ));
}

#[test]
fn test_missing_required_parts() {
    let bytes = Book::statsbook().without("xl/workbook.xml").build();
    assert!(matches!(
        Document::open(bytes),
        Err(XlsxError::MissingPart(part)) if part == "xl/workbook.xml"
    ));

    let bytes = Book::statsbook().without("xl/_rels/workbook.xml.rels").build();
    assert!(matches!(Document::open(bytes), Err(XlsxError::MissingPart(_))));

    assert!(Document::open(b"not a zip file".to_vec()).is_err());
}

#[test]
fn test_literal_values() {
    let mut doc = open();
    assert_eq!(doc.value("Score", &a("A1")).unwrap(), Value::Number(1.0));
    assert_eq!(doc.value("Score", &a("B3")).unwrap(), Value::from("dog"));
    assert_eq!(doc.value("Score", &a("H1")).unwrap(), Value::from("Notes"));
    assert_eq!(doc.value("Score", &a("$B$1")).unwrap(), Value::from("cat"));
    // styled but empty, and absent from the grid
    assert!(matches!(doc.value("Score", &a("F3")).unwrap(), Value::Undefined));
    assert!(matches!(doc.value("Score", &a("Z99")).unwrap(), Value::Undefined));
}

#[test]
fn test_formula_values() {
    let mut doc = open();
    assert_eq!(doc.value("Score", &a("C1")).unwrap(), Value::Number(6.0));
    assert_eq!(doc.value("Score", &a("C2")).unwrap(), Value::Number(2.0));
    assert_eq!(doc.value("Score", &a("C3")).unwrap(), Value::Number(2.0));
    assert_eq!(doc.value("Score", &a("E1")).unwrap(), Value::Number(5.0));
}

#[test]
fn test_unforced_eval_prefers_stored_value() {
    let mut doc = open();
    // E1 holds a stale result
    assert_eq!(doc.eval("Score", &a("E1"), false).unwrap(), Value::Number(0.0));
    // C3 has no stored result and is evaluated
    assert_eq!(doc.eval("Score", &a("C3"), false).unwrap(), Value::Number(2.0));
    assert_eq!(
        doc.sheet("Score").unwrap().cached(&a("C3")),
        Some(&Value::Number(2.0))
    );
    // forcing evaluates and caches
    assert_eq!(doc.eval("Score", &a("E1"), true).unwrap(), Value::Number(5.0));
    assert_eq!(doc.eval("Score", &a("E1"), false).unwrap(), Value::Number(5.0));
}

#[test]
fn test_shared_formulas() {
    let mut doc = open();
    assert_eq!(doc.formula("Score", &a("D1")).unwrap().as_deref(), Some("A1*10"));
    assert_eq!(doc.formula("Score", &a("D3")).unwrap().as_deref(), Some("A3*10"));
    assert_eq!(doc.formula("Score", &a("A3")).unwrap(), None);

    doc.set_value("Score", &a("A3"), 4).unwrap();
    assert_eq!(doc.value("Score", &a("D3")).unwrap(), Value::Number(40.0));
}

#[test]
fn test_written_value_wins_until_reset() {
    let mut doc = open();
    doc.set_value("Score", &a("C1"), "override").unwrap();
    assert_eq!(doc.eval("Score", &a("C1"), false).unwrap(), Value::from("override"));
    assert_eq!(doc.value("Score", &a("C1")).unwrap(), Value::from("override"));

    doc.reset("Score").unwrap();
    assert_eq!(doc.value("Score", &a("C1")).unwrap(), Value::Number(6.0));
}

#[test]
fn test_cycle_is_an_error() {
    let mut doc = open();
    let err = doc.value("Penalties", &a("C1")).unwrap_err();
    assert!(matches!(
        err,
        XlsxError::Formula(FormulaError::CycleDetected(ref frame)) if frame == "Penalties!C1"
    ));
    // evaluation state is unwound after the failure
    assert_eq!(doc.value("Penalties", &a("A1")).unwrap(), Value::Number(4.0));
    assert!(doc.value("Penalties", &a("C2")).is_err());
}

#[test]
fn test_write_outside_grid() {
    let mut doc = open();
    let err = doc.set_value("Score", &a("Z9"), 1).unwrap_err();
    assert!(matches!(
        err,
        XlsxError::CellNotFound { ref sheet, ref address } if sheet == "Score" && address == "Z9"
    ));
}

#[test]
fn test_comments() {
    let mut doc = open();
    assert_eq!(
        doc.comment("Penalties", &a("A1")).unwrap(),
        Some(Comment::new("Head NSO", "Head NSO: two majors"))
    );
    assert_eq!(doc.comment("Penalties", &a("B1")).unwrap(), None);
    assert_eq!(doc.comment("Score", &a("A1")).unwrap(), None);
}

#[test]
fn test_commented_value() {
    let mut doc = open();
    let penalties = doc.commented_value("Penalties", &a("A1")).unwrap();
    assert_eq!(penalties.value, Some(Value::Number(4.0)));
    assert_eq!(penalties.comment.unwrap().author.as_deref(), Some("Head NSO"));
    assert_eq!(penalties.formula, None);

    let shared = doc.commented_value("Score", &a("D2")).unwrap();
    assert_eq!(shared.value, Some(Value::Number(20.0)));
    assert_eq!(shared.formula.as_deref(), Some("A2*10"));
    assert!(!shared.is_empty());

    assert!(doc.commented_value("Score", &a("F3")).unwrap().is_empty());
}

#[test]
fn test_number_formats() {
    let mut doc = open();
    assert_eq!(doc.number_format("Score", &a("G1")).unwrap().as_deref(), Some("0.0%"));
    assert_eq!(doc.number_format("Score", &a("G2")).unwrap().as_deref(), Some("mm:ss.0"));
    assert_eq!(doc.number_format("Score", &a("A1")).unwrap(), None);
}

#[test]
fn test_bottom_right() {
    let mut doc = open();
    assert_eq!(doc.bottom_right("Score").unwrap(), a("H3"));
    assert_eq!(doc.bottom_right("Read Me").unwrap(), a("A3"));
}

#[test]
fn test_boolean_fields() {
    let mut doc = open();
    assert_eq!(doc.get_bool("Score", &a("F1")).unwrap(), Some(true));
    assert_eq!(doc.get_bool("Score", &a("F2")).unwrap(), None);
    assert_eq!(doc.get_bool("Score", &a("F3")).unwrap(), Some(false));

    doc.set_bool("Score", &a("F2"), Some(false), &BooleanFormat::YES_BAR_NO)
        .unwrap();
    assert_eq!(doc.value("Score", &a("F2")).unwrap(), Value::from("NO"));
    doc.set_bool("Score", &a("F1"), Some(false), &BooleanFormat::X_IS_TRUE)
        .unwrap();
    assert!(matches!(doc.value("Score", &a("F1")).unwrap(), Value::Undefined));
    assert_eq!(doc.get_bool("Score", &a("F1")).unwrap(), Some(false));
}

#[test]
fn test_recalc() {
    let mut doc = open();
    doc.set_value("Score", &a("A1"), 5).unwrap();
    doc.recalc("Score", false).unwrap();
    assert_eq!(doc.eval("Score", &a("C1"), false).unwrap(), Value::Number(10.0));
    assert_eq!(doc.eval("Score", &a("D1"), false).unwrap(), Value::Number(50.0));

    doc.recalc("Score", true).unwrap();
    assert_eq!(doc.eval("Score", &a("A1"), false).unwrap(), Value::Number(1.0));
    assert_eq!(doc.eval("Score", &a("C1"), false).unwrap(), Value::Number(6.0));

    assert!(doc.recalc("Penalties", true).is_err());
}

#[test]
fn test_version_check() {
    let options = DocumentOptions::new().with_expected_version("January 2019 Release");
    assert!(Document::open_with_options(statsbook(), options).is_ok());

    let options = DocumentOptions::new().with_expected_version("December 2018 Release");
    match Document::open_with_options(statsbook(), options) {
        Err(XlsxError::UnsupportedVersion { expected, found }) => {
            assert_eq!(expected, "December 2018 Release");
            assert_eq!(found, "January 2019 Release");
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }

    let without_read_me = WORKBOOK.replace(r#"<sheet name="Read Me" sheetId="1" r:id="rId1"/>"#, "");
    let bytes = Book::statsbook()
        .with_part("xl/workbook.xml", &without_read_me)
        .build();
    let mut doc = Document::open(bytes.clone()).unwrap();
    assert_eq!(doc.version().unwrap(), None);
    let options = DocumentOptions::new().with_expected_version("January 2019 Release");
    assert!(matches!(
        Document::open_with_options(bytes, options),
        Err(XlsxError::SheetNotFound(name)) if name == "Read Me"
    ));
}

#[test]
fn test_open_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("statsbook.xlsx");
    std::fs::write(&path, statsbook()).unwrap();

    let mut doc = Document::open_file(&path).unwrap();
    assert_eq!(doc.value("Score", &a("B2")).unwrap(), Value::from("car"));

    assert!(matches!(
        Document::open_file(dir.path().join("missing.xlsx")),
        Err(XlsxError::Io(_))
    ));
}
