//! Fluent construction of Atom/GData request bodies
//!
//! Optional string inputs are silently skipped when they carry no text,
//! so entries with conditionally present fields can be built without
//! checks at every call site:
//!
//! ```ignore
//! let entry = ElementBuilder::new_atom_entry_builder()
//!     .set_category_kind("http://schemas.google.com/contact/2008#contact")
//!     .set_title(contact.name.as_deref())
//!     .add_element(
//!         ElementBuilder::new_gdata_element_builder("email")
//!             .set_rel("http://schemas.google.com/g/2005#work")
//!             .add_attribute("address", contact.email.as_deref())
//!             .add_bool_attribute("primary", true),
//!     )
//!     .into_element();
//! ```

use crate::element::{Attribute, Element};
use crate::namespaces::{ATOM_NAMESPACE, GDATA_NAMESPACE, GDATA_PREFIX, KIND_SCHEME};

/// Builder of one [`Element`] and its subtree
///
/// Every method consumes the builder and returns it. Finish with
/// [`into_element`](Self::into_element), which hands the tree over; no
/// builder can reach it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ElementBuilder {
    element: Element,
}

impl ElementBuilder {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            element: Element::new(name, namespace),
        }
    }

    /// Root `entry` element in the Atom namespace
    pub fn new_atom_entry_builder() -> Self {
        Self::new("entry", ATOM_NAMESPACE)
    }

    /// `gd:`-prefixed element in the GData namespace
    pub fn new_gdata_element_builder(name: &str) -> Self {
        Self::new(gdata_name(name), GDATA_NAMESPACE)
    }

    /// Read-only view of the element built so far
    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn into_element(self) -> Element {
        self.element
    }

    /// Append the child's element after any existing children
    pub fn add_element(mut self, child: ElementBuilder) -> Self {
        self.element.append_child(child.into_element());
        self
    }

    /// Set a namespaced attribute, even when `value` is empty
    pub fn add_attribute_ns(mut self, namespace: &str, name: &str, value: &str) -> Self {
        self.element
            .set_attribute(Attribute::namespaced(namespace, name, value));
        self
    }

    /// Set an attribute only when `value` has text
    pub fn add_attribute<'a>(mut self, name: &str, value: impl Into<Option<&'a str>>) -> Self {
        if let Some(value) = text_of(value.into()) {
            self.element.set_attribute(Attribute::new(name, value));
        }
        self
    }

    pub fn add_bool_attribute(self, name: &str, value: bool) -> Self {
        self.add_attribute(name, if value { "true" } else { "false" })
    }

    /// Append `<name>` holding the lower-cased variant name; `None` adds nothing
    pub fn add_enum_element<E: AsRef<str>>(
        mut self,
        namespace: &str,
        name: &str,
        value: Option<E>,
    ) -> Self {
        if let Some(value) = value {
            let mut child = Element::new(name, namespace);
            child.append_text(value.as_ref().to_lowercase());
            self.element.append_child(child);
        }
        self
    }

    /// Append an Atom text element when `value` has text
    pub fn add_simple_atom_element<'a>(
        self,
        name: &str,
        value: impl Into<Option<&'a str>>,
    ) -> Self {
        self.add_text_element(name, ATOM_NAMESPACE, value.into())
    }

    /// Append a `gd:` text element when `value` has text
    pub fn add_gdata_element<'a>(self, name: &str, value: impl Into<Option<&'a str>>) -> Self {
        self.add_text_element(&gdata_name(name), GDATA_NAMESPACE, value.into())
    }

    pub fn set_title<'a>(self, title: impl Into<Option<&'a str>>) -> Self {
        self.add_simple_atom_element("title", title)
    }

    pub fn set_rel<'a>(self, rel: impl Into<Option<&'a str>>) -> Self {
        self.add_attribute("rel", rel)
    }

    pub fn set_href<'a>(self, href: impl Into<Option<&'a str>>) -> Self {
        self.add_attribute("href", href)
    }

    /// Append `value` as text of this element, blank or not
    pub fn set_value(mut self, value: impl Into<String>) -> Self {
        self.element.append_text(value);
        self
    }

    /// Append a kind `category` with `term`, blank or not
    pub fn set_category_kind(mut self, term: &str) -> Self {
        let mut category = Element::new("category", ATOM_NAMESPACE);
        category.set_attribute(Attribute::new("scheme", KIND_SCHEME));
        category.set_attribute(Attribute::new("term", term));
        self.element.append_child(category);
        self
    }

    fn add_text_element(mut self, name: &str, namespace: &str, value: Option<&str>) -> Self {
        if let Some(value) = text_of(value) {
            let mut child = Element::new(name, namespace);
            child.append_text(value);
            self.element.append_child(child);
        }
        self
    }
}

impl From<ElementBuilder> for Element {
    fn from(builder: ElementBuilder) -> Self {
        builder.into_element()
    }
}

fn gdata_name(name: &str) -> String {
    format!("{}:{}", GDATA_PREFIX, name)
}

/// `Some` only when at least one character is not whitespace
fn text_of(value: Option<&str>) -> Option<&str> {
    value.filter(|value| value.chars().any(|c| !c.is_whitespace()))
}
