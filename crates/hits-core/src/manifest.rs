//! Per-set manifest of exported items
//!
//! Rendered as:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <InterestingFileSet name="Pictures" description="Image files">
//!   <SavedDirectory>
//!     <Path>/out/Pictures/DCIM_42/DCIM</Path>
//!     <OriginalPath>/img/DCIM</OriginalPath>
//!   </SavedDirectory>
//!   <SavedFile>
//!     <Path>/out/Pictures/DCIM_42/DCIM/a.jpg</Path>
//!     <OriginalPath>/img/DCIM/a.jpg</OriginalPath>
//!     <MD5>9e107d9d372bb6826bd81d3542a419d6</MD5>
//!   </SavedFile>
//! </InterestingFileSet>
//! ```

use crate::{Error, Result};
use hits_case::{EntityKind, FileEntity};
use hits_fs::{NormalizedPath, RobustnessConfig, io};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::borrow::Cow;

const ROOT: &str = "InterestingFileSet";
const SAVED_FILE: &str = "SavedFile";
const SAVED_DIRECTORY: &str = "SavedDirectory";
const PATH: &str = "Path";
const ORIGINAL_PATH: &str = "OriginalPath";
const MD5: &str = "MD5";

/// One exported file or directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub kind: EntityKind,
    /// Where the item now lives on disk
    pub saved_path: NormalizedPath,
    /// Logical path of the item inside the case
    pub original_path: String,
    /// Upstream MD5; only files carry one
    pub md5: Option<String>,
}

impl ManifestEntry {
    /// Entry for an item saved at `saved_path`. Directories never carry a hash.
    pub fn saved(entity: &FileEntity, saved_path: NormalizedPath) -> Self {
        Self {
            kind: entity.kind,
            saved_path,
            original_path: entity.unique_path.clone(),
            md5: match entity.kind {
                EntityKind::File => entity.md5.clone(),
                EntityKind::Directory => None,
            },
        }
    }
}

/// Everything exported for one rule-set, in visit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    set_name: String,
    set_description: String,
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(set_name: impl Into<String>, set_description: impl Into<String>) -> Self {
        Self {
            set_name: set_name.into(),
            set_description: set_description.into(),
            entries: Vec::new(),
        }
    }

    pub fn set_name(&self) -> &str {
        &self.set_name
    }

    pub fn set_description(&self) -> &str {
        &self.set_description
    }

    pub fn add_entry(&mut self, entry: ManifestEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the pretty-printed UTF-8 document.
    pub fn to_xml(&self) -> std::io::Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new(ROOT);
        root.push_attribute(("name", xml_safe(&self.set_name).as_ref()));
        root.push_attribute(("description", xml_safe(&self.set_description).as_ref()));
        writer.write_event(Event::Start(root))?;

        for entry in &self.entries {
            let tag = match entry.kind {
                EntityKind::File => SAVED_FILE,
                EntityKind::Directory => SAVED_DIRECTORY,
            };
            writer.write_event(Event::Start(BytesStart::new(tag)))?;
            write_text_element(&mut writer, PATH, entry.saved_path.as_str())?;
            write_text_element(&mut writer, ORIGINAL_PATH, &entry.original_path)?;
            if entry.kind == EntityKind::File {
                write_text_element(&mut writer, MD5, entry.md5.as_deref().unwrap_or(""))?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }

        writer.write_event(Event::End(BytesEnd::new(ROOT)))?;

        let mut xml = String::from_utf8(writer.into_inner())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        xml.push('\n');
        Ok(xml)
    }

    /// Render and atomically write the document to `path`.
    pub fn write(&self, path: &NormalizedPath, robustness: RobustnessConfig) -> Result<()> {
        let failed = |source: hits_fs::Error| Error::ManifestWriteFailed {
            path: path.to_native(),
            source,
        };
        let xml = self
            .to_xml()
            .map_err(|e| failed(hits_fs::Error::io(path.to_native(), e)))?;
        io::write_atomic(path, xml.as_bytes(), robustness).map_err(failed)?;
        tracing::debug!(
            set = %self.set_name,
            entries = self.entries.len(),
            path = %path,
            "wrote manifest"
        );
        Ok(())
    }

    /// Parse a document produced by [`Manifest::to_xml`].
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut manifest: Option<Manifest> = None;
        let mut current: Option<ManifestEntry> = None;
        let mut field: Option<String> = None;

        loop {
            let event = reader.read_event().map_err(parse_error)?;
            match event {
                Event::Start(e) | Event::Empty(e) if e.name().as_ref() == ROOT.as_bytes() => {
                    let mut name = String::new();
                    let mut description = String::new();
                    for attr in e.attributes() {
                        let attr = attr.map_err(parse_error)?;
                        let value = attr.unescape_value().map_err(parse_error)?.into_owned();
                        match attr.key.as_ref() {
                            b"name" => name = value,
                            b"description" => description = value,
                            _ => {}
                        }
                    }
                    manifest = Some(Manifest::new(name, description));
                }
                Event::Start(e) => {
                    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    match tag.as_str() {
                        SAVED_FILE | SAVED_DIRECTORY => {
                            current = Some(ManifestEntry {
                                kind: if tag == SAVED_FILE {
                                    EntityKind::File
                                } else {
                                    EntityKind::Directory
                                },
                                saved_path: NormalizedPath::new(""),
                                original_path: String::new(),
                                md5: None,
                            });
                        }
                        _ => field = Some(tag),
                    }
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(parse_error)?.into_owned();
                    if let (Some(entry), Some(name)) = (current.as_mut(), field.as_deref()) {
                        match name {
                            PATH => entry.saved_path = NormalizedPath::new(&text),
                            ORIGINAL_PATH => entry.original_path = text,
                            MD5 => entry.md5 = Some(text).filter(|md5| !md5.is_empty()),
                            _ => {}
                        }
                    }
                }
                Event::End(e) => {
                    let tag = e.name();
                    if tag.as_ref() == SAVED_FILE.as_bytes() || tag.as_ref() == SAVED_DIRECTORY.as_bytes() {
                        let entry = current.take().ok_or_else(|| Error::ManifestParse {
                            message: "closing tag without an open entry".into(),
                        })?;
                        manifest
                            .as_mut()
                            .ok_or_else(|| Error::ManifestParse {
                                message: "entry outside the root element".into(),
                            })?
                            .add_entry(entry);
                    } else {
                        field = None;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        manifest.ok_or_else(|| Error::ManifestParse {
            message: format!("missing {ROOT} root element"),
        })
    }
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> std::io::Result<()> {
    // Always emit the text event, even when empty, so the closing tag
    // stays on the same line: `<MD5></MD5>`.
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(&xml_safe(text))))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))
}

/// Replace characters XML 1.0 cannot carry, even as references, with U+FFFD.
fn xml_safe(text: &str) -> Cow<'_, str> {
    let allowed = |c: char| {
        matches!(c, '\t' | '\n' | '\r')
            || ('\u{20}'..='\u{D7FF}').contains(&c)
            || ('\u{E000}'..='\u{FFFD}').contains(&c)
            || c >= '\u{10000}'
    };
    if text.chars().all(allowed) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(
            text.chars()
                .map(|c| if allowed(c) { c } else { char::REPLACEMENT_CHARACTER })
                .collect(),
        )
    }
}

fn parse_error(err: impl std::fmt::Display) -> Error {
    Error::ManifestParse {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn file(id: u64, path: &str, md5: Option<&str>) -> FileEntity {
        FileEntity {
            id,
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            kind: EntityKind::File,
            parent: None,
            unique_path: path.to_string(),
            md5: md5.map(str::to_string),
        }
    }

    #[test]
    fn entries_keep_call_order() {
        let mut manifest = Manifest::new("set", "desc");
        manifest.add_entry(ManifestEntry::saved(&file(2, "/b", None), "/out/b".into()));
        manifest.add_entry(ManifestEntry::saved(&file(1, "/a", None), "/out/a".into()));

        let originals: Vec<_> = manifest.entries().iter().map(|e| e.original_path.as_str()).collect();
        assert_eq!(originals, vec!["/b", "/a"]);
    }

    #[test]
    fn empty_manifest_keeps_set_attributes() {
        let manifest = Manifest::new("Empty Set", "nothing survived");

        let xml = manifest.to_xml().unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(r#"<InterestingFileSet name="Empty Set" description="nothing survived">"#));
        assert!(!xml.contains(SAVED_FILE));
        let parsed = Manifest::from_xml(&xml).unwrap();
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn files_always_carry_an_md5_element() {
        let mut manifest = Manifest::new("s", "");
        manifest.add_entry(ManifestEntry::saved(&file(1, "/a.txt", None), "/out/a_1.txt".into()));

        let xml = manifest.to_xml().unwrap();

        assert!(xml.contains("<MD5></MD5>"), "got:\n{xml}");
    }

    #[test]
    fn directories_never_carry_an_md5_element() {
        let dir = FileEntity {
            kind: EntityKind::Directory,
            md5: Some("ignored".into()),
            ..file(3, "/dir", None)
        };
        let mut manifest = Manifest::new("s", "");
        manifest.add_entry(ManifestEntry::saved(&dir, "/out/dir_3/dir".into()));

        let xml = manifest.to_xml().unwrap();

        assert!(xml.contains("<SavedDirectory>"));
        assert!(!xml.contains("<MD5>"));
    }

    #[test]
    fn special_characters_round_trip() {
        let mut manifest = Manifest::new("R&D <secret>", "\"quoted\" & 'single'");
        manifest.add_entry(ManifestEntry::saved(
            &file(4, "/a&b/<c>.txt", Some("d41d8cd98f00b204e9800998ecf8427e")),
            "/out/R&D <secret>/<c>_4.txt".into(),
        ));

        let xml = manifest.to_xml().unwrap();
        let parsed = Manifest::from_xml(&xml).unwrap();

        assert_eq!(parsed, manifest);
    }

    #[test]
    fn control_characters_are_replaced() {
        let mut manifest = Manifest::new("bell\u{7}set", "esc\u{1B}aped");
        manifest.add_entry(ManifestEntry::saved(
            &file(8, "/odd\u{1}name.txt", None),
            "/out/odd\u{1}name_8.txt".into(),
        ));

        let xml = manifest.to_xml().unwrap();

        assert!(!xml.chars().any(|c| c < ' ' && c != '\n'), "got:\n{xml}");
        let parsed = Manifest::from_xml(&xml).unwrap();
        assert_eq!(parsed.set_name(), "bell\u{FFFD}set");
        assert_eq!(parsed.set_description(), "esc\u{FFFD}aped");
        assert_eq!(parsed.entries()[0].original_path, "/odd\u{FFFD}name.txt");
        assert_eq!(parsed.entries()[0].saved_path.as_str(), "/out/odd\u{FFFD}name_8.txt");
    }

    #[test]
    fn from_xml_rejects_documents_without_root() {
        assert!(matches!(
            Manifest::from_xml("<Other/>"),
            Err(Error::ManifestParse { .. })
        ));
    }
}
