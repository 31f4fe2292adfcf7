//! Relationship parts (`*.rels`)

use crate::error::XlsxResult;
use crate::xml::XmlDocument;

/// Relationship type suffixes this crate follows
pub const REL_WORKSHEET: &str = "/worksheet";
pub const REL_SHARED_STRINGS: &str = "/sharedStrings";
pub const REL_STYLES: &str = "/styles";
pub const REL_COMMENTS: &str = "/comments";

/// One `<Relationship>` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    /// `TargetMode="External"`: the target is a URL, not a part
    pub external: bool,
}

impl Relationship {
    /// Whether the relationship type ends with `suffix` (`"/worksheet"`)
    pub fn is_type(&self, suffix: &str) -> bool {
        self.rel_type.ends_with(suffix)
    }
}

/// The relationships of one source part
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    /// Parse a `.rels` part
    pub fn parse(bytes: &[u8]) -> XlsxResult<Self> {
        let doc = XmlDocument::parse(bytes)?;
        let rels = doc
            .root_element()
            .filter(|root| root.is_element("Relationships"))
            .map(|root| {
                root.all_children("Relationship")
                    .filter_map(|rel| {
                        Some(Relationship {
                            id: rel.attr("Id")?.to_string(),
                            rel_type: rel.attr("Type").unwrap_or_default().to_string(),
                            target: rel.attr("Target")?.to_string(),
                            external: rel.attr("TargetMode") == Some("External"),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self { rels })
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.id == id)
    }

    /// First relationship of the given type
    pub fn first_of_type(&self, suffix: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.is_type(suffix))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }
}

/// Directory part of an archive path (`xl/worksheets` for
/// `xl/worksheets/sheet1.xml`)
pub fn part_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Archive path of the relationships part for `part`
///
/// `xl/worksheets/sheet1.xml` has its relationships in
/// `xl/worksheets/_rels/sheet1.xml.rels`.
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the directory of its source part
///
/// Absolute targets (`/xl/comments1.xml`) are taken from the package root;
/// `..` segments climb out of `base_dir`.
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    let (mut segments, rest): (Vec<&str>, &str) = match target.strip_prefix('/') {
        Some(absolute) => (Vec::new(), absolute),
        None => (
            base_dir.split('/').filter(|s| !s.is_empty()).collect(),
            target,
        ),
    };
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
