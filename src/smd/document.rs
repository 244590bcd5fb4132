//! Generic element tree of an SMD header
//!
//! The header is decoded once into a [`ScanDocument`] and handed to the schema
//! mapper. Repeated sibling tags stay in document order, so a name can map to
//! a sequence of nodes.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::SmdError;

/// One XML element with its text and child elements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Tag name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text content, with surrounding whitespace trimmed
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Child elements in document order
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// First child with the given tag name
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given tag name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Append a child element
    pub fn push(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    /// Builder-style text setter
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder-style child append
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }
}

/// Decoded SMD header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDocument {
    root: XmlNode,
}

impl ScanDocument {
    /// Wrap an already-built tree
    pub fn from_root(root: XmlNode) -> Self {
        Self { root }
    }

    /// Decode XML text into an element tree
    ///
    /// Attributes are ignored; SMD headers carry all values as element text.
    pub fn parse(xml: &str) -> Result<Self, SmdError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
                    stack.push(XmlNode::new(name));
                }
                Event::Empty(e) => {
                    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
                    attach(&mut stack, &mut root, XmlNode::new(name))?;
                }
                Event::End(_) => {
                    let node = stack.pop().ok_or_else(|| {
                        SmdError::MalformedFile("unbalanced closing tag".to_string())
                    })?;
                    attach(&mut stack, &mut root, node)?;
                }
                Event::Text(t) => {
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&t.unescape()?);
                    }
                }
                Event::CData(c) => {
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(std::str::from_utf8(&c.into_inner())?);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(SmdError::MalformedFile(format!(
                "element <{}> is never closed",
                open.name
            )));
        }
        root.map(Self::from_root)
            .ok_or_else(|| SmdError::MalformedFile("header has no root element".to_string()))
    }

    /// The top-level element (`SCANDATA` in instrument files)
    pub fn root(&self) -> &XmlNode {
        &self.root
    }
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), SmdError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(node);
            Ok(())
        }
        None => Err(SmdError::MalformedFile(format!(
            "second top-level element <{}>",
            node.name
        ))),
    }
}
