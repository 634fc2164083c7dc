//! Traversal roots: a whole document or a single element subtree.

use crate::{Document, Element};

/// The starting point of a subtree traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Root {
	/// Every connected element of a document.
	Document(Document),
	/// An element and its descendants.
	Element(Element),
}

impl Root {
	/// Returns the root element, when the root is an element.
	pub fn element(&self) -> Option<&Element> {
		match self {
			Self::Document(_) => None,
			Self::Element(element) => Some(element),
		}
	}

	/// Returns the document the traversal runs in.
	pub fn document(&self) -> Option<Document> {
		match self {
			Self::Document(document) => Some(document.clone()),
			Self::Element(element) => element.owner_document(),
		}
	}

	/// Returns the elements below the root carrying `name`, in document order.
	///
	/// For an element root the root itself is excluded.
	pub fn query_all_with_attribute(&self, name: &str) -> Vec<Element> {
		match self {
			Self::Document(document) => document.query_all_with_attribute(name),
			Self::Element(element) => element.query_all_with_attribute(name),
		}
	}
}

impl From<Document> for Root {
	fn from(document: Document) -> Self {
		Self::Document(document)
	}
}

impl From<&Document> for Root {
	fn from(document: &Document) -> Self {
		Self::Document(document.clone())
	}
}

impl From<Element> for Root {
	fn from(element: Element) -> Self {
		Self::Element(element)
	}
}

impl From<&Element> for Root {
	fn from(element: &Element) -> Self {
		Self::Element(element.clone())
	}
}
