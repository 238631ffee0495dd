//! Owned, editable XML tree for SVG documents.
//!
//! `roxmltree` is read-only, so a parsed document is copied into plain
//! `Element`s that can be edited and written back out. Prefixes are kept as
//! they appear in the source and namespace declarations are re-emitted on
//! the element that introduced them.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::error::{Error, Result};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

/// An element with its qualified name, ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`Element::set_attr`].
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder form of [`Element::set_text`].
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Namespace prefix of the name, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Qualified name for a sibling element that should share this prefix.
    pub fn qualified(&self, local: &str) -> String {
        match self.prefix() {
            Some(prefix) => format!("{prefix}:{local}"),
            None => local.to_string(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, keeping its position when it already exists.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name.to_string(), value));
        }
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Concatenated direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Node::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace all content with a single text run.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.children.push(Node::Text(text.into()));
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First element in document order (self included) matching `pred`.
    pub fn find(&self, pred: &impl Fn(&Self) -> bool) -> Option<&Self> {
        if pred(self) {
            return Some(self);
        }
        self.child_elements().find_map(|child| child.find(pred))
    }

    /// Mutable counterpart of [`Element::find`].
    pub fn find_mut(&mut self, pred: &impl Fn(&Self) -> bool) -> Option<&mut Self> {
        if pred(self) {
            return Some(self);
        }
        for child in &mut self.children {
            if let Node::Element(element) = child {
                if let Some(found) = element.find_mut(pred) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Descendant elements (self excluded) with the given local name, in
    /// document order. Matches are not searched further, so an element
    /// nested inside another match is skipped.
    pub fn outermost_named<'a>(&'a self, local: &str) -> Vec<&'a Self> {
        let mut out = Vec::new();
        for child in self.child_elements() {
            if child.local_name() == local {
                out.push(child);
            } else {
                out.extend(child.outermost_named(local));
            }
        }
        out
    }

    /// Mutable counterpart of [`Element::outermost_named`].
    pub fn outermost_named_mut<'a>(&'a mut self, local: &str) -> Vec<&'a mut Self> {
        let mut out = Vec::new();
        for child in &mut self.children {
            if let Node::Element(element) = child {
                collect_named_mut(element, local, &mut out);
            }
        }
        out
    }
}

fn collect_named_mut<'a>(element: &'a mut Element, local: &str, out: &mut Vec<&'a mut Element>) {
    if element.local_name() == local {
        out.push(element);
    } else {
        for child in &mut element.children {
            if let Node::Element(inner) = child {
                collect_named_mut(inner, local, out);
            }
        }
    }
}

/// An SVG document held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse SVG source text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not well-formed XML or its root is
    /// not an `<svg>` element.
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse_with_options(xml, parsing_options())?;
        let root = doc.root_element();
        if root.tag_name().name() != "svg" {
            return Err(Error::MissingRoot("svg"));
        }
        Ok(Self {
            root: convert_element(root, &HashSet::new()),
        })
    }

    pub const fn root(&self) -> &Element {
        &self.root
    }

    pub const fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Element with the given `id` attribute, searching from the root.
    pub fn element_by_id(&self, id: &str) -> Option<&Element> {
        self.root.find(&|el: &Element| el.attr("id") == Some(id))
    }

    pub fn element_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.root.find_mut(&|el: &Element| el.attr("id") == Some(id))
    }

    /// Serialize with an XML declaration and two-space indentation.
    ///
    /// Elements holding text keep their content inline so no whitespace is
    /// added to rendered text.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::from("<?xml version='1.0' encoding='utf-8'?>\n");
        write_element(&mut out, &self.root, 0);
        out.push('\n');
        out
    }
}

/// Gephi writes a `DOCTYPE` line into every SVG export.
pub(crate) fn parsing_options() -> roxmltree::ParsingOptions {
    roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    }
}

type NamespaceSet = HashSet<(Option<String>, String)>;

fn convert_element(node: roxmltree::Node<'_, '_>, inherited: &NamespaceSet) -> Element {
    let in_scope: NamespaceSet = node
        .namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .map(|ns| (ns.name().map(str::to_string), ns.uri().to_string()))
        .collect();

    let mut element = Element::new(qualified_name(
        node,
        node.tag_name().namespace(),
        node.tag_name().name(),
    ));

    // Declarations first, in a stable order.
    let mut declared: Vec<&(Option<String>, String)> = in_scope.difference(inherited).collect();
    declared.sort();
    for (prefix, uri) in declared {
        let key = prefix
            .as_ref()
            .map_or_else(|| "xmlns".to_string(), |p| format!("xmlns:{p}"));
        element.attributes.push((key, uri.clone()));
    }

    for attribute in node.attributes() {
        let name = qualified_name(node, attribute.namespace(), attribute.name());
        element.attributes.push((name, attribute.value().to_string()));
    }

    let keep_blank = preserves_space(node);
    for child in node.children() {
        if child.is_element() {
            element
                .children
                .push(Node::Element(convert_element(child, &in_scope)));
        } else if child.is_text() {
            let text = child.text().unwrap_or_default();
            if keep_blank || !text.trim().is_empty() {
                element.children.push(Node::Text(text.to_string()));
            }
        } else if child.is_comment() {
            element
                .children
                .push(Node::Comment(child.text().unwrap_or_default().to_string()));
        }
    }

    element
}

/// Whitespace between runs is rendered inside text content elements and
/// under `xml:space="preserve"`; everywhere else it is layout only.
fn preserves_space(node: roxmltree::Node<'_, '_>) -> bool {
    matches!(node.tag_name().name(), "text" | "tspan" | "textPath")
        || node
            .ancestors()
            .any(|n| n.attribute((XML_NAMESPACE, "space")) == Some("preserve"))
}

fn qualified_name(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    let Some(uri) = namespace else {
        return local.to_string();
    };
    if uri == XML_NAMESPACE {
        return format!("xml:{local}");
    }
    let prefix = node
        .namespaces()
        .find(|ns| ns.uri() == uri)
        .and_then(|ns| ns.name());
    match prefix {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attributes {
        let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
    }

    if element.children.is_empty() {
        out.push_str(" />");
        return;
    }
    out.push('>');

    let has_text = element
        .children
        .iter()
        .any(|child| matches!(child, Node::Text(_)));

    if has_text {
        for child in &element.children {
            write_node(out, child, depth);
        }
    } else {
        for child in &element.children {
            out.push('\n');
            push_indent(out, depth + 1);
            write_node(out, child, depth + 1);
        }
        out.push('\n');
        push_indent(out, depth);
    }

    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    match node {
        Node::Element(element) => write_element(out, element, depth),
        Node::Text(text) => out.push_str(&escape_text(text)),
        Node::Comment(comment) => {
            let _ = write!(out, "<!--{comment}-->");
        }
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Escape character data.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a double-quoted attribute value.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Format a coordinate or size for an attribute, dropping float noise.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

/// Parse a length attribute, accepting a trailing `px`.
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_suffix("px").unwrap_or(trimmed).trim_end();
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
