//! Minimal element tree over `quick-xml`, plus typed attribute decoding for
//! the `bazel query --output xml` schema.
//!
//! Rule attributes arrive as child elements of `<rule>`, each carrying a
//! `name` attribute and a tag telling how to read it:
//!
//! ```xml
//! <rule class="cc_library" name="//absl/base:config">
//!   <string name="name" value="config"/>
//!   <boolean name="testonly" value="false"/>
//!   <list name="hdrs">
//!     <label value="//absl/base:config.h"/>
//!   </list>
//! </rule>
//! ```

use crate::error::{PodgenError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// An XML element with its attributes and child elements. Text is dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    /// Look up an attribute by key.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Decode the first child whose `name` attribute equals `name`.
    pub fn field(&self, name: &str) -> Result<Option<AttributeValue>> {
        match self.children.iter().find(|c| c.attr("name") == Some(name)) {
            Some(child) => decode_value(child).map(Some),
            None => Ok(None),
        }
    }
}

/// A decoded rule attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeValue {
    Str(String),
    Bool(bool),
    List(Vec<String>),
}

impl AttributeValue {
    pub fn into_string(self) -> Option<String> {
        match self {
            AttributeValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_bool(self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<Vec<String>> {
        match self {
            AttributeValue::List(values) => Some(values),
            _ => None,
        }
    }
}

/// Decode one attribute element according to its tag.
pub fn decode_value(elem: &Element) -> Result<AttributeValue> {
    match elem.tag.as_str() {
        "string" => Ok(AttributeValue::Str(
            elem.attr("value").unwrap_or_default().to_string(),
        )),
        "boolean" => Ok(AttributeValue::Bool(elem.attr("value") == Some("true"))),
        "list" => Ok(AttributeValue::List(
            elem.children
                .iter()
                .filter_map(|c| c.attr("value"))
                .map(str::to_string)
                .collect(),
        )),
        other => Err(PodgenError::UnrecognizedTag {
            tag: other.to_string(),
            attribute: elem.attr("name").unwrap_or_default().to_string(),
        }),
    }
}

/// Parse a whole document and return its root element.
pub fn parse_document(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(element_from(&e)?),
            Event::Empty(e) => {
                let elem = element_from(&e)?;
                attach(&mut stack, &mut root, elem)?;
            }
            Event::End(_) => {
                let elem = stack.pop().ok_or_else(|| xml_error("unbalanced end tag"))?;
                attach(&mut stack, &mut root, elem)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(xml_error("unexpected end of document"));
    }
    root.ok_or_else(|| xml_error("document has no root element"))
}

fn element_from(start: &BytesStart<'_>) -> Result<Element> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        tag,
        attributes,
        children: Vec::new(),
    })
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, elem: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(elem);
        return Ok(());
    }
    if root.is_some() {
        return Err(xml_error("multiple root elements"));
    }
    *root = Some(elem);
    Ok(())
}

fn xml_error(message: &str) -> PodgenError {
    PodgenError::Xml {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULE_XML: &str = r#"<?xml version="1.1" encoding="UTF-8" standalone="no"?>
<query version="2">
    <rule class="cc_library" location="/src/absl/base/BUILD.bazel:28:1" name="//absl/base:config">
        <string name="name" value="config"/>
        <boolean name="testonly" value="false"/>
        <list name="hdrs">
            <label value="//absl/base:config.h"/>
            <label value="//absl/base:options.h"/>
        </list>
        <int name="linkstatic" value="0"/>
    </rule>
</query>
"#;

    #[test]
    fn test_parse_document_builds_tree() {
        let root = parse_document(RULE_XML).unwrap();
        assert_eq!(root.tag, "query");
        assert_eq!(root.attr("version"), Some("2"));
        assert_eq!(root.children.len(), 1);

        let rule = &root.children[0];
        assert_eq!(rule.tag, "rule");
        assert_eq!(rule.attr("class"), Some("cc_library"));
        assert_eq!(rule.children.len(), 4);
    }

    #[test]
    fn test_field_decoding_by_tag() {
        let root = parse_document(RULE_XML).unwrap();
        let rule = &root.children[0];

        assert_eq!(
            rule.field("name").unwrap(),
            Some(AttributeValue::Str("config".to_string()))
        );
        assert_eq!(rule.field("testonly").unwrap(), Some(AttributeValue::Bool(false)));
        assert_eq!(
            rule.field("hdrs").unwrap(),
            Some(AttributeValue::List(vec![
                "//absl/base:config.h".to_string(),
                "//absl/base:options.h".to_string(),
            ]))
        );
        assert_eq!(rule.field("srcs").unwrap(), None);
    }

    #[test]
    fn test_unrecognized_tag_is_fatal() {
        let root = parse_document(RULE_XML).unwrap();
        let err = root.children[0].field("linkstatic").unwrap_err();
        assert!(matches!(
            err,
            PodgenError::UnrecognizedTag { ref tag, ref attribute } if tag == "int" && attribute == "linkstatic"
        ));
    }

    #[test]
    fn test_escaped_attribute_values() {
        let root = parse_document(r#"<q><string name="x" value="a &amp; b"/></q>"#).unwrap();
        assert_eq!(
            root.field("x").unwrap(),
            Some(AttributeValue::Str("a & b".to_string()))
        );
    }

    #[test]
    fn test_malformed_documents() {
        assert!(parse_document("<query><rule></query>").is_err());
        assert!(parse_document("<query>").is_err());
        assert!(parse_document("").is_err());
    }
}
