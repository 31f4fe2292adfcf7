//! In-memory stats book fixtures

#![allow(dead_code)]

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#;

pub const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

pub const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Read Me" sheetId="1" r:id="rId1"/><sheet name="Score" sheetId="2" r:id="rId2"/><sheet name="Penalties" sheetId="3" r:id="rId3"/></sheets></workbook>"#;

pub const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet3.xml"/><Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/><Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId6" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="theme/theme1.xml"/></Relationships>"#;

/// Index 0 is the release name, 1..=3 the animals, 4 "X", 5 "YES | NO",
/// 6 "Home"
pub const SHARED_STRINGS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="8" uniqueCount="7"><si><t>January 2019 Release</t></si><si><t>cat</t></si><si><t>car</t></si><si><t>dog</t></si><si><t>X</t></si><si><t>YES | NO</t></si><si><t>Home</t></si></sst>"#;

pub const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><numFmts count="1"><numFmt numFmtId="164" formatCode="0.0%"/></numFmts><cellStyleXfs count="1"><xf numFmtId="0"/></cellStyleXfs><cellXfs count="3"><xf numFmtId="0" xfId="0"/><xf numFmtId="164" xfId="0"/><xf numFmtId="47" xfId="0"/></cellXfs></styleSheet>"#;

pub const READ_ME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="3"><c r="A3" t="s"><v>0</v></c></row></sheetData></worksheet>"#;

/// Numbers in A1:A3, animals in B1:B3, formulas in C, a shared formula
/// group in D1:D3, a cross-sheet reference in E1, yes/no fields in F,
/// number formats in G and an inline string in H1
pub const SCORE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><dimension ref="A1:H3"/><sheetData><row r="1" spans="1:8"><c r="A1"><v>1</v></c><c r="B1" t="s"><v>1</v></c><c r="C1"><f>SUM(A1:A3)</f><v>6</v></c><c r="D1"><f t="shared" ref="D1:D3" si="0">A1*10</f><v>10</v></c><c r="E1"><f>Penalties!A1+1</f><v>0</v></c><c r="F1" t="s"><v>4</v></c><c r="G1" s="1"><v>0.5</v></c><c r="H1" t="inlineStr"><is><t>Notes</t></is></c></row><row r="2" spans="1:8"><c r="A2"><v>2</v></c><c r="B2" t="s"><v>2</v></c><c r="C2"><f>COUNTIF(B1:B3,"ca*")</f><v>2</v></c><c r="D2"><f t="shared" si="0"/><v>20</v></c><c r="F2" t="s"><v>5</v></c><c r="G2" s="2"/></row><row r="3" spans="1:8"><c r="A3"><v>3</v></c><c r="B3" t="s"><v>3</v></c><c r="C3"><f>MATCH("car",B1:B3,0)</f></c><c r="D3"><f t="shared" si="0"/><v>30</v></c><c r="F3"/></row></sheetData><pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/></worksheet>"#;

/// A1 carries a comment; C1 and C2 refer to each other
pub const PENALTIES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1"><v>4</v></c><c r="B1"/><c r="C1"><f>C2+1</f></c></row><row r="2"><c r="C2"><f>C1+1</f></c></row></sheetData><legacyDrawing r:id="rId2" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"/></worksheet>"#;

pub const PENALTIES_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments" Target="../comments1.xml"/></Relationships>"#;

pub const COMMENTS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<comments xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><authors><author>Head NSO</author></authors><commentList><comment ref="A1" authorId="0"><text><r><t>Head NSO:</t></r><r><t xml:space="preserve"> two majors</t></r></text></comment></commentList></comments>"#;

pub const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"/>"#;

/// Builder for an xlsx package held in memory
#[derive(Debug, Clone)]
pub struct Book {
    parts: Vec<(String, String, CompressionMethod)>,
}

impl Book {
    /// The full fixture: three sheets, shared strings, styles, comments
    pub fn statsbook() -> Self {
        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", ROOT_RELS),
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/sharedStrings.xml", SHARED_STRINGS),
            ("xl/styles.xml", STYLES),
            ("xl/theme/theme1.xml", THEME),
            ("xl/worksheets/sheet1.xml", READ_ME),
            ("xl/worksheets/sheet2.xml", SCORE),
            ("xl/worksheets/sheet3.xml", PENALTIES),
            ("xl/worksheets/_rels/sheet3.xml.rels", PENALTIES_RELS),
            ("xl/comments1.xml", COMMENTS),
        ];
        Self {
            parts: parts
                .iter()
                .map(|(name, text)| (name.to_string(), text.to_string(), CompressionMethod::Deflated))
                .collect(),
        }
    }

    /// Replace a part, or add it when missing
    pub fn with_part(mut self, name: &str, text: &str) -> Self {
        match self.parts.iter_mut().find(|(n, _, _)| n == name) {
            Some(part) => part.1 = text.to_string(),
            None => self
                .parts
                .push((name.to_string(), text.to_string(), CompressionMethod::Deflated)),
        }
        self
    }

    pub fn without(mut self, name: &str) -> Self {
        self.parts.retain(|(n, _, _)| n != name);
        self
    }

    /// Store a part uncompressed
    pub fn stored(mut self, name: &str) -> Self {
        for part in self.parts.iter_mut().filter(|(n, _, _)| n == name) {
            part.2 = CompressionMethod::Stored;
        }
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, text, method) in &self.parts {
            let options = SimpleFileOptions::default().compression_method(*method);
            writer.start_file(name.as_str(), options).unwrap();
            writer.write_all(text.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }
}

/// The default fixture's bytes
pub fn statsbook() -> Vec<u8> {
    Book::statsbook().build()
}

/// Read one part of a package with an independent ZIP reader
pub fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut text = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    text
}
