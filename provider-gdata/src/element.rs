//! Owned XML element tree
//!
//! A minimal DOM for Atom entries: elements own their attributes and
//! children outright, with no parent links. Names are kept exactly as
//! qualified on the wire (`gd:email`), next to the resolved namespace URI.
//! Serialization and parsing go through `quick-xml`.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::{NsReader, Writer};

use crate::error::{GDataError, Result};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Attribute on an [`Element`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    namespace: Option<String>,
    value: String,
}

impl Attribute {
    /// Attribute in no namespace
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            value: value.into(),
        }
    }

    /// Attribute in `namespace`; an empty URI means no namespace
    pub fn namespaced(
        namespace: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let namespace = namespace.into();
        Self {
            name: name.into(),
            namespace: (!namespace.is_empty()).then_some(namespace),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_name(&self) -> &str {
        split_name(&self.name).1
    }

    pub fn prefix(&self) -> Option<&str> {
        split_name(&self.name).0
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn same_slot(&self, other: &Attribute) -> bool {
        self.local_name() == other.local_name() && self.namespace == other.namespace
    }
}

/// Child of an [`Element`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// XML element with its attributes and children in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    namespace: String,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
}

impl Element {
    /// `name` may carry a prefix (`gd:email`); an empty `namespace` means
    /// no namespace
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Qualified name, prefix included
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_name(&self) -> &str {
        split_name(&self.name).1
    }

    pub fn prefix(&self) -> Option<&str> {
        split_name(&self.name).0
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements, skipping text
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// First child element whose qualified or local name is `name`
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|element| element.is_named(name))
    }

    pub fn children_named<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a Element> + 'n
    where
        'a: 'n,
    {
        self.child_elements()
            .filter(move |element| element.is_named(name))
    }

    fn is_named(&self, name: &str) -> bool {
        self.name == name || self.local_name() == name
    }

    /// Value of the first attribute whose qualified or local name is `name`
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name || attribute.local_name() == name)
            .map(Attribute::value)
    }

    pub fn attribute_ns(&self, namespace: &str, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| {
                attribute.namespace().unwrap_or_default() == namespace
                    && attribute.local_name() == local_name
            })
            .map(Attribute::value)
    }

    /// Concatenated direct text content
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Set an attribute; one with the same local name and namespace is
    /// overwritten where it stands
    pub fn set_attribute(&mut self, attribute: Attribute) {
        match self
            .attributes
            .iter_mut()
            .find(|existing| existing.same_slot(&attribute))
        {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }

    pub fn append_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn append_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Serialize as an XML fragment
    pub fn to_xml(&self) -> Result<String> {
        self.serialize(false)
    }

    /// Serialize as a standalone document with an XML declaration
    pub fn to_document(&self) -> Result<String> {
        self.serialize(true)
    }

    fn serialize(&self, declaration: bool) -> Result<String> {
        let mut writer = Writer::new(Vec::new());

        if declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
                .map_err(GDataError::xml)?;
        }

        let mut scope = vec![Binding::new("xml", XML_NAMESPACE)];
        self.write_to(&mut writer, &mut scope)?;

        String::from_utf8(writer.into_inner()).map_err(GDataError::xml)
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>, scope: &mut Vec<Binding>) -> Result<()> {
        let mark = scope.len();
        let mut declarations = Vec::new();

        let element_prefix = self.prefix().unwrap_or_default();
        let prefixed_without_namespace = !element_prefix.is_empty() && self.namespace.is_empty();
        if lookup(scope, element_prefix).unwrap_or_default() != self.namespace
            && !prefixed_without_namespace
        {
            declare(scope, &mut declarations, element_prefix, &self.namespace);
        }

        let mut attributes = Vec::with_capacity(self.attributes.len());
        for attribute in &self.attributes {
            let name = match attribute.namespace() {
                None => attribute.name.clone(),
                Some(uri) => {
                    // A prefix already bound to another URI is swapped for one bound to `uri`
                    let prefix = match attribute.prefix() {
                        Some(prefix) if lookup(scope, prefix).map_or(true, |bound| bound == uri) => {
                            prefix.to_string()
                        }
                        _ => prefix_for(scope, uri),
                    };
                    if lookup(scope, &prefix) != Some(uri) {
                        declare(scope, &mut declarations, &prefix, uri);
                    }
                    format!("{}:{}", prefix, attribute.local_name())
                }
            };
            attributes.push((name, attribute.value.as_str()));
        }

        let mut start = BytesStart::new(self.name.as_str());
        for (name, uri) in &declarations {
            start.push_attribute((name.as_str(), uri.as_str()));
        }
        for (name, value) in &attributes {
            start.push_attribute((name.as_str(), *value));
        }

        if self.children.is_empty() {
            writer
                .write_event(Event::Empty(start))
                .map_err(GDataError::xml)?;
        } else {
            writer
                .write_event(Event::Start(start))
                .map_err(GDataError::xml)?;

            for child in &self.children {
                match child {
                    Node::Element(element) => element.write_to(writer, scope)?,
                    Node::Text(text) => writer
                        .write_event(Event::Text(BytesText::new(text)))
                        .map_err(GDataError::xml)?,
                }
            }

            writer
                .write_event(Event::End(BytesEnd::new(self.name.as_str())))
                .map_err(GDataError::xml)?;
        }

        scope.truncate(mark);
        Ok(())
    }

    /// Parse the root element of `xml` into an owned tree
    ///
    /// Text is kept verbatim, whitespace included; comments and processing
    /// instructions are dropped.
    pub fn parse(xml: &str) -> Result<Element> {
        let mut reader = NsReader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();

        loop {
            let (resolved, event) = reader.read_resolved_event().map_err(GDataError::xml)?;
            let namespace = namespace_uri(resolved)?;

            match event {
                Event::Start(start) => {
                    stack.push(open_element(&reader, namespace, &start)?);
                }
                Event::Empty(start) => {
                    let element = open_element(&reader, namespace, &start)?;
                    if let Some(root) = close(&mut stack, element) {
                        return Ok(root);
                    }
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| GDataError::Xml("unexpected closing tag".to_string()))?;
                    if let Some(root) = close(&mut stack, element) {
                        return Ok(root);
                    }
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        let text = text.unescape().map_err(GDataError::xml)?;
                        current.push_parsed_text(&text);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        let text = String::from_utf8(data.into_inner().into_owned())
                            .map_err(GDataError::xml)?;
                        current.push_parsed_text(&text);
                    }
                }
                Event::Eof => {
                    return Err(GDataError::Xml(
                        "document ended before the root element closed".to_string(),
                    ))
                }
                _ => {}
            }
        }
    }

    /// Adjacent text from the parser is merged into one node
    fn push_parsed_text(&mut self, text: &str) {
        match self.children.last_mut() {
            Some(Node::Text(existing)) => existing.push_str(text),
            _ => self.children.push(Node::Text(text.to_string())),
        }
    }
}

struct Binding {
    prefix: String,
    uri: String,
}

impl Binding {
    fn new(prefix: &str, uri: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
        }
    }
}

fn split_name(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

/// Innermost binding for `prefix`; the empty prefix is the default namespace
fn lookup<'s>(scope: &'s [Binding], prefix: &str) -> Option<&'s str> {
    scope
        .iter()
        .rev()
        .find(|binding| binding.prefix == prefix)
        .map(|binding| binding.uri.as_str())
}

fn declare(scope: &mut Vec<Binding>, declarations: &mut Vec<(String, String)>, prefix: &str, uri: &str) {
    let attribute = if prefix.is_empty() {
        "xmlns".to_string()
    } else {
        format!("xmlns:{}", prefix)
    };
    declarations.push((attribute, uri.to_string()));
    scope.push(Binding::new(prefix, uri));
}

/// Prefix for a namespaced attribute written without one
fn prefix_for(scope: &[Binding], uri: &str) -> String {
    let bound = scope.iter().rev().find(|binding| {
        !binding.prefix.is_empty()
            && binding.uri == uri
            && lookup(scope, &binding.prefix) == Some(uri)
    });
    if let Some(binding) = bound {
        return binding.prefix.clone();
    }

    (0..)
        .map(|n| format!("ns{}", n))
        .find(|candidate| lookup(scope, candidate).is_none())
        .unwrap_or_default()
}

fn namespace_uri(resolved: ResolveResult<'_>) -> Result<String> {
    match resolved {
        ResolveResult::Bound(namespace) => {
            String::from_utf8(namespace.0.to_vec()).map_err(GDataError::xml)
        }
        ResolveResult::Unbound => Ok(String::new()),
        ResolveResult::Unknown(prefix) => Err(GDataError::Xml(format!(
            "undeclared namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

fn open_element(reader: &NsReader<&[u8]>, namespace: String, start: &BytesStart<'_>) -> Result<Element> {
    let name = std::str::from_utf8(start.name().into_inner()).map_err(GDataError::xml)?;
    let mut element = Element::new(name, namespace);

    for attribute in start.attributes() {
        let attribute = attribute.map_err(GDataError::xml)?;
        if attribute.key.as_namespace_binding().is_some() {
            continue;
        }

        let (resolved, _) = reader.resolve_attribute(attribute.key);
        let namespace = namespace_uri(resolved)?;
        let name = std::str::from_utf8(attribute.key.into_inner()).map_err(GDataError::xml)?;
        let value = attribute.unescape_value().map_err(GDataError::xml)?;

        element.set_attribute(Attribute::namespaced(namespace, name, value.into_owned()));
    }

    Ok(element)
}

/// Attach a finished element to its parent, or hand it back as the root
fn close(stack: &mut [Element], element: Element) -> Option<Element> {
    match stack.last_mut() {
        Some(parent) => {
            parent.append_child(element);
            None
        }
        None => Some(element),
    }
}
