//! Ordered XML emission for the WUFI project document.
//!
//! The downstream tool reads elements positionally, so sibling order
//! is part of the wire contract: nodes are built as ordered lists and
//! written exactly as given, never sorted. List containers carry a
//! `count` attribute and their items a zero-based `index` attribute.

use std::fmt::Display;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

/// One writable node: a text leaf, an element with ordered children,
/// or a counted list.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Leaf {
        name: String,
        value: String,
        attr: Option<(String, String)>,
    },
    Object {
        name: String,
        children: Vec<XmlNode>,
    },
    List {
        name: String,
        items: Vec<XmlNode>,
    },
}

impl XmlNode {
    /// Booleans format as literal `true` / `false`, which is what the
    /// schema expects.
    pub fn leaf(name: &str, value: impl Display) -> Self {
        Self::Leaf {
            name: name.to_string(),
            value: value.to_string(),
            attr: None,
        }
    }

    pub fn leaf_attr(name: &str, value: impl Display, key: &str, attr_value: impl Display) -> Self {
        Self::Leaf {
            name: name.to_string(),
            value: value.to_string(),
            attr: Some((key.to_string(), attr_value.to_string())),
        }
    }

    /// A leaf for an optional value; `None` writes an empty element.
    pub fn leaf_opt(name: &str, value: Option<impl Display>) -> Self {
        match value {
            Some(v) => Self::leaf(name, v),
            None => Self::leaf(name, ""),
        }
    }

    pub fn object(name: &str, children: Vec<XmlNode>) -> Self {
        Self::Object {
            name: name.to_string(),
            children,
        }
    }

    pub fn list(name: &str, items: Vec<XmlNode>) -> Self {
        Self::List {
            name: name.to_string(),
            items,
        }
    }

    fn push_to(&self, out: &mut String, depth: usize, index: Option<usize>) {
        let pad = "  ".repeat(depth);
        match self {
            Self::Leaf { name, value, attr } => {
                out.push_str(&pad);
                out.push('<');
                out.push_str(name);
                if let Some((key, attr_value)) = attr {
                    out.push_str(&format!(" {}=\"{}\"", key, xml_escape(attr_value)));
                }
                if let Some(i) = index {
                    out.push_str(&format!(" index=\"{}\"", i));
                }
                out.push_str(&format!(">{}</{}>\n", xml_escape(value), name));
            }
            Self::Object { name, children } => {
                out.push_str(&pad);
                out.push('<');
                out.push_str(name);
                if let Some(i) = index {
                    out.push_str(&format!(" index=\"{}\"", i));
                }
                out.push_str(">\n");
                for child in children {
                    child.push_to(out, depth + 1, None);
                }
                out.push_str(&format!("{}</{}>\n", pad, name));
            }
            Self::List { name, items } => {
                out.push_str(&format!("{}<{} count=\"{}\">\n", pad, name, items.len()));
                for (i, item) in items.iter().enumerate() {
                    item.push_to(out, depth + 1, Some(i));
                }
                out.push_str(&format!("{}</{}>\n", pad, name));
            }
        }
    }
}

/// A type that knows its ordered WUFI node list.
pub trait ToXml {
    fn to_xml(&self) -> Vec<XmlNode>;
}

/// Renders a full document under the given root element.
pub fn render(root: &str, children: &[XmlNode]) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!("<{}>\n", root));
    for child in children {
        child.push_to(&mut out, 1, None);
    }
    out.push_str(&format!("</{}>\n", root));
    out
}

pub fn write_xml_file(path: &Path, root: &str, children: &[XmlNode]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    file.write_all(render(root, children).as_bytes())
        .with_context(|| format!("Failed to write XML to: {}", path.display()))?;
    Ok(())
}

pub fn xml_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
