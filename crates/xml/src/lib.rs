//! The XML read/write convention shared by every thing type.
//!
//! Each thing type describes its XML node shape once, as a serde *wire struct*:
//! - child elements are fields (renamed to their kebab-case tag),
//! - attributes are fields renamed `@name`,
//! - element text is a field renamed `$text`,
//! - optional children are `Option<T>` with `skip_serializing_if = "Option::is_none"`,
//! - repeated children are `Vec<T>` with `default` and `skip_serializing_if = "Vec::is_empty"`,
//! - `#[serde(deny_unknown_fields)]` keeps parsing strict.
//!
//! This crate then provides the two mirrored operations over any such struct:
//! [`read_document`] locates the named root element and reconstructs the wire struct, reporting
//! the path of the first failing node, and [`write_document`] walks the same shape back out.
//! Translating wire structs into validated domain values is left to the caller.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Errors returned by the XML convention layer.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Malformed(String),

    #[error("expected root element <{expected}>, found <{found}>")]
    UnexpectedRoot { expected: String, found: String },

    #[error("<{root}> schema mismatch at {path}: {message}")]
    SchemaMismatch {
        root: String,
        path: String,
        message: String,
    },

    #[error("failed to serialise XML: {0}")]
    Serialize(String),
}

/// Type alias for Results that can fail with an [`XmlError`].
pub type XmlResult<T> = Result<T, XmlError>;

/// Output options for [`write_document`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Number of spaces per nesting level; `None` writes compact XML on one line.
    pub indent: Option<usize>,
}

impl WriteOptions {
    pub fn compact() -> Self {
        Self { indent: None }
    }

    pub fn indented(width: usize) -> Self {
        Self {
            indent: Some(width),
        }
    }
}

/// Returns the local name of the first element in `xml`.
///
/// Declarations, comments and processing instructions before the root element are skipped.
///
/// # Errors
///
/// Returns [`XmlError::Malformed`] if the document cannot be tokenised or has no element.
pub fn root_element_name(xml: &str) -> XmlResult<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Eof) => {
                return Err(XmlError::Malformed(
                    "document has no root element".to_string(),
                ))
            }
            Ok(_) => {}
            Err(e) => return Err(XmlError::Malformed(e.to_string())),
        }
    }
}

/// Returns the root element name of a document that holds exactly one element tree.
///
/// Only whitespace, comments and processing instructions may follow the root element.
fn single_root(xml: &str) -> XmlResult<String> {
    let mut reader = Reader::from_str(xml);
    let mut root: Option<String> = None;
    let mut depth = 0usize;
    loop {
        let event = reader
            .read_event()
            .map_err(|e| XmlError::Malformed(e.to_string()))?;
        match event {
            Event::Eof => break,
            _ if depth > 0 => match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth -= 1,
                _ => {}
            },
            Event::Comment(_) | Event::PI(_) => {}
            Event::Decl(_) | Event::DocType(_) if root.is_none() => {}
            Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
            Event::Start(e) if root.is_none() => {
                root = Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                depth = 1;
            }
            Event::Empty(e) if root.is_none() => {
                root = Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            _ => {
                let position = reader.buffer_position();
                return Err(XmlError::Malformed(match &root {
                    Some(name) => format!("unexpected content after </{name}> at byte {position}"),
                    None => format!("unexpected content before the root element at byte {position}"),
                }));
            }
        }
    }
    match root {
        Some(name) if depth > 0 => Err(XmlError::Malformed(format!("<{name}> is not closed"))),
        Some(name) => Ok(name),
        None => Err(XmlError::Malformed(
            "document has no root element".to_string(),
        )),
    }
}

/// Read a wire struct from an XML document whose root element is `expected_root`.
///
/// This uses `serde_path_to_error` to surface a best-effort "path" (e.g. `when.date.m`) to the
/// failing node when the XML does not match the wire schema.
///
/// # Errors
///
/// Returns [`XmlError`] if:
/// - the document is not well-formed or has content after the root element,
/// - the root element is not `expected_root`,
/// - a required child is missing, a value has the wrong type or an unknown child is present.
pub fn read_document<W>(xml: &str, expected_root: &str) -> XmlResult<W>
where
    W: DeserializeOwned,
{
    let found = single_root(xml)?;
    if found != expected_root {
        return Err(XmlError::UnexpectedRoot {
            expected: expected_root.to_string(),
            found,
        });
    }

    let mut deserializer = quick_xml::de::Deserializer::from_str(xml);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let message = err.into_inner().to_string();
        let path = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        XmlError::SchemaMismatch {
            root: expected_root.to_string(),
            path,
            message,
        }
    })
}

/// Write a wire struct as an XML document with the root element `root`.
///
/// # Errors
///
/// Returns [`XmlError::Serialize`] if the wire struct cannot be represented as XML.
pub fn write_document<W>(root: &str, wire: &W, options: &WriteOptions) -> XmlResult<String>
where
    W: Serialize,
{
    let mut buffer = String::new();
    let mut serializer = quick_xml::se::Serializer::with_root(&mut buffer, Some(root))
        .map_err(|e| XmlError::Serialize(e.to_string()))?;
    if let Some(width) = options.indent {
        serializer.indent(' ', width);
    }
    wire.serialize(serializer)
        .map_err(|e| XmlError::Serialize(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct ReadingWire {
        #[serde(rename = "@units", default, skip_serializing_if = "Option::is_none")]
        units: Option<String>,
        #[serde(rename = "$text")]
        text: String,
    }

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct SampleWire {
        value: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        reading: Option<ReadingWire>,
        #[serde(rename = "tag", default, skip_serializing_if = "Vec::is_empty")]
        tags: Vec<String>,
    }

    #[test]
    fn root_element_name_skips_declaration_and_comments() {
        let xml = r#"<?xml version="1.0"?><!-- note --><sample><value>1</value></sample>"#;
        assert_eq!(root_element_name(xml).expect("root"), "sample");
    }

    #[test]
    fn root_element_name_handles_empty_root() {
        assert_eq!(root_element_name("<sample/>").expect("root"), "sample");
    }

    #[test]
    fn root_element_name_rejects_documents_without_elements() {
        let err = root_element_name("   ").expect_err("no element");
        assert!(matches!(err, XmlError::Malformed(msg) if msg.contains("no root element")));
    }

    #[test]
    fn reads_children_attributes_and_repeated_elements() {
        let xml = r#"<sample><value>72</value><reading units="bpm">72 bpm</reading><tag>a</tag><tag>b</tag></sample>"#;
        let wire: SampleWire = read_document(xml, "sample").expect("read");
        assert_eq!(wire.value, 72);
        assert_eq!(
            wire.reading,
            Some(ReadingWire {
                units: Some("bpm".into()),
                text: "72 bpm".into()
            })
        );
        assert_eq!(wire.tags, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn missing_optional_children_are_none() {
        let wire: SampleWire = read_document("<sample><value>1</value></sample>", "sample")
            .expect("read minimal");
        assert!(wire.reading.is_none());
        assert!(wire.tags.is_empty());
    }

    #[test]
    fn rejects_unexpected_root() {
        let err = read_document::<SampleWire>("<other><value>1</value></other>", "sample")
            .expect_err("wrong root");
        match err {
            XmlError::UnexpectedRoot { expected, found } => {
                assert_eq!(expected, "sample");
                assert_eq!(found, "other");
            }
            other => panic!("expected UnexpectedRoot, got {other:?}"),
        }
    }

    #[test]
    fn reports_path_of_wrong_typed_value() {
        let err = read_document::<SampleWire>("<sample><value>abc</value></sample>", "sample")
            .expect_err("wrong type");
        match err {
            XmlError::SchemaMismatch { root, path, .. } => {
                assert_eq!(root, "sample");
                assert!(path.contains("value"), "path was {path}");
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_children() {
        let err = read_document::<SampleWire>(
            "<sample><value>1</value><surprise>x</surprise></sample>",
            "sample",
        )
        .expect_err("unknown child");
        match err {
            XmlError::SchemaMismatch { message, .. } => {
                assert!(message.contains("surprise"), "message was {message}");
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_required_child() {
        let err = read_document::<SampleWire>("<sample><tag>a</tag></sample>", "sample")
            .expect_err("missing value");
        match err {
            XmlError::SchemaMismatch { message, .. } => {
                assert!(message.contains("value"), "message was {message}");
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn writes_under_named_root_and_skips_absent_children() {
        let wire = SampleWire {
            value: 5,
            reading: None,
            tags: vec![],
        };
        let xml = write_document("sample", &wire, &WriteOptions::compact()).expect("write");
        assert_eq!(xml, "<sample><value>5</value></sample>");
    }

    #[test]
    fn written_documents_read_back() {
        let wire = SampleWire {
            value: 60,
            reading: Some(ReadingWire {
                units: Some("bpm".into()),
                text: "60 & steady".into(),
            }),
            tags: vec!["rest".into(), "seated".into()],
        };
        let xml = write_document("sample", &wire, &WriteOptions::compact()).expect("write");
        assert!(xml.contains(r#"<reading units="bpm">60 &amp; steady</reading>"#));
        assert!(xml.contains("<tag>rest</tag><tag>seated</tag>"));

        let back: SampleWire = read_document(&xml, "sample").expect("read back");
        assert_eq!(back, wire);
    }

    #[test]
    fn indented_output_spans_lines() {
        let wire = SampleWire {
            value: 1,
            reading: None,
            tags: vec!["a".into()],
        };
        let xml = write_document("sample", &wire, &WriteOptions::indented(2)).expect("write");
        assert!(xml.contains("\n  <value>1</value>"), "xml was {xml}");
    }

    #[test]
    fn rejects_content_after_root() {
        let err = read_document::<SampleWire>(
            "<sample><value>1</value></sample><sample>junk",
            "sample",
        )
        .expect_err("second root");
        assert!(matches!(err, XmlError::Malformed(msg) if msg.contains("after </sample>")));

        let err = read_document::<SampleWire>("<sample><value>1</value></sample>junk", "sample")
            .expect_err("trailing text");
        assert!(matches!(err, XmlError::Malformed(_)));
    }

    #[test]
    fn allows_whitespace_and_comments_around_root() {
        let xml = "<?xml version=\"1.0\"?>\n<sample><value>1</value></sample>\n<!-- end -->\n";
        let wire: SampleWire = read_document(xml, "sample").expect("read");
        assert_eq!(wire.value, 1);
    }

    #[test]
    fn rejects_unclosed_root() {
        let err = read_document::<SampleWire>("<sample><value>1</value>", "sample")
            .expect_err("unclosed");
        assert!(matches!(err, XmlError::Malformed(_)));
    }

    #[test]
    fn rejects_child_elements_inside_text_node() {
        let err = read_document::<SampleWire>(
            r#"<sample><value>1</value><reading units="x">5<bogus/></reading></sample>"#,
            "sample",
        )
        .expect_err("element inside text node");
        match err {
            XmlError::SchemaMismatch { message, .. } => {
                assert!(message.contains("bogus"), "message was {message}");
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }
}
