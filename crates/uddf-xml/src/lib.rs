//! Load UDDF XML into an attribute-merged document tree using quick-xml.
//!
//! The tree follows the conventions dive-log consumers expect from a generic
//! XML-to-object parser: namespace prefixes are stripped, attributes become
//! sibling keys of their element's children, and repeated elements collapse
//! into a sequence only when they actually repeat.

pub mod tree;

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;
use tracing::{debug, trace};

pub use tree::{Mapping, Node, Scalar};

/// Key under which element text is stored when the element also carries
/// attributes or child elements.
pub const TEXT_KEY: &str = "_";

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("xml: {0}")]
    Xml(String),
    #[error("invalid document: {0}")]
    Invalid(String),
    #[error("io: {0}")]
    Io(String),
}

/// Read a UDDF document from disk as UTF-8 text.
pub async fn load_xml_file(path: impl AsRef<Path>) -> Result<String, XmlError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| XmlError::Io(format!("{}: {err}", path.display())))?;
    debug!(path = %path.display(), len = bytes.len(), "loaded xml file");
    String::from_utf8(bytes).map_err(|err| XmlError::Io(format!("invalid UTF-8: {err}")))
}

/// Element under construction while its children are being read.
struct Frame {
    name: String,
    entries: Vec<(String, Node)>,
    text: String,
}

impl Frame {
    fn open(event: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = local_name(event.local_name().as_ref());
        let mut entries = Vec::new();
        for attr in event.attributes() {
            let attr = attr.map_err(|err| XmlError::Xml(err.to_string()))?;
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let value = attr
                .unescape_value()
                .map_err(|err| XmlError::Xml(err.to_string()))?;
            entries.push((
                local_name(attr.key.local_name().as_ref()),
                Node::text(value.into_owned()),
            ));
        }
        Ok(Self {
            name,
            entries,
            text: String::new(),
        })
    }

    fn close(self) -> (String, Node) {
        if self.entries.is_empty() {
            return (self.name, Node::text(self.text));
        }
        let mut mapping = Mapping::new();
        for (key, value) in self.entries {
            // Children are never bare sequences, so a sequence here comes
            // from an earlier repeat of the same key.
            match mapping.get_mut(&key) {
                Some(Node::Sequence(items)) => items.push(value),
                Some(existing) => {
                    let first = std::mem::replace(existing, Node::Sequence(Vec::new()));
                    *existing = Node::Sequence(vec![first, value]);
                }
                None => {
                    mapping.insert(key, value);
                }
            }
        }
        let text = self.text.trim();
        if !text.is_empty() {
            mapping.insert(TEXT_KEY, Node::text(text));
        }
        (self.name, Node::Mapping(mapping))
    }
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Parse UDDF XML text into a tree rooted at `{ <root element>: ... }`.
pub fn parse_tree(xml: &str) -> Result<Node, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Node)> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                stack.push(Frame::open(&e)?);
            }
            Ok(Event::Empty(e)) => {
                let frame = Frame::open(&e)?;
                attach(&mut stack, &mut root, frame.close())?;
            }
            Ok(Event::End(_)) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| XmlError::Xml("unexpected closing tag".into()))?;
                attach(&mut stack, &mut root, frame.close())?;
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|err| XmlError::Xml(err.to_string()))?;
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(XmlError::Xml(err.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Invalid(format!(
            "document ended inside <{}>",
            open.name
        )));
    }
    let (name, node) =
        root.ok_or_else(|| XmlError::Invalid("document has no root element".into()))?;
    debug!(root = %name, "parsed xml tree");
    let mut mapping = Mapping::new();
    mapping.insert(name, node);
    Ok(Node::Mapping(mapping))
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<(String, Node)>,
    (name, node): (String, Node),
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => {
            trace!(parent = %parent.name, child = %name, "attach element");
            parent.entries.push((name, node));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some((name, node));
            Ok(())
        }
        None => Err(XmlError::Invalid(format!(
            "unexpected second root element <{name}>"
        ))),
    }
}
