//! Attribute props composition
//!
//! [`AttrProps`] collects the behavior attributes of one element. Descriptors from
//! different registries can be attached to the same props object; each id lands in
//! its own registry's attribute and ids already present are kept first.
//!
//! ```ignore
//! let props = AttrProps::new()
//!     .attach(&close_on_click)
//!     .attach(&init_tooltip)
//!     .attach(open.then_some(&focus_on_show));
//! props.apply_to(&element)?;
//! ```
//!
//! Props serialize as a flat JSON object, so server-rendered templates can spread
//! them directly into markup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tessel_dom::{DomError, Element};

use crate::codec::IdList;
use crate::registry::Descriptor;

/// Something that can be attached to [`AttrProps`]: an `(attribute, id)` pair.
pub trait Attachable {
	/// Returns the attribute name and the id to merge into it, if any.
	fn attachment(&self) -> Option<(&str, &str)>;
}

impl<H: ?Sized + 'static> Attachable for Descriptor<H> {
	fn attachment(&self) -> Option<(&str, &str)> {
		Some((self.attribute(), self.id().as_str()))
	}
}

impl<T: Attachable + ?Sized> Attachable for &T {
	fn attachment(&self) -> Option<(&str, &str)> {
		(**self).attachment()
	}
}

impl<T: Attachable> Attachable for Option<T> {
	fn attachment(&self) -> Option<(&str, &str)> {
		self.as_ref().and_then(Attachable::attachment)
	}
}

/// An ordered attribute name → value map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttrProps(BTreeMap<String, String>);

impl AttrProps {
	/// Creates empty props.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `name` to `value`, replacing any previous value.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.insert(name, value);
		self
	}

	/// Merges a descriptor's id into its attribute. `None` leaves the props unchanged.
	pub fn attach(mut self, item: impl Attachable) -> Self {
		if let Some((attribute, id)) = item.attachment() {
			self.merge_ids(attribute, [id]);
		}
		self
	}

	/// Merges `ids` into the id list stored under `attribute`.
	///
	/// Existing ids keep their position; the attribute is dropped if the merged list
	/// is empty.
	pub fn merge_ids<I, S>(&mut self, attribute: &str, ids: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let merged = IdList::merge(self.get(attribute), ids);
		match merged.encode() {
			Some(value) => {
				self.0.insert(attribute.to_string(), value);
			}
			None => {
				self.0.remove(attribute);
			}
		}
	}

	/// Returns the value of `name`.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	/// Sets `name` to `value`, returning the previous value.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.0.insert(name.into(), value.into())
	}

	/// Removes `name`, returning its value.
	pub fn remove(&mut self, name: &str) -> Option<String> {
		self.0.remove(name)
	}

	/// Iterates `(name, value)` pairs in name order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
	}

	/// Returns the number of attributes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if there are no attributes.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Writes every attribute onto `element`, overwriting current values.
	pub fn apply_to(&self, element: &Element) -> Result<(), DomError> {
		for (name, value) in self.iter() {
			element.set_attribute(name, value)?;
		}
		Ok(())
	}

	/// Consumes the props, returning the underlying map.
	pub fn into_inner(self) -> BTreeMap<String, String> {
		self.0
	}
}

impl From<BTreeMap<String, String>> for AttrProps {
	fn from(map: BTreeMap<String, String>) -> Self {
		Self(map)
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttrProps {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self(
			iter.into_iter()
				.map(|(name, value)| (name.into(), value.into()))
				.collect(),
		)
	}
}

impl IntoIterator for AttrProps {
	type Item = (String, String);
	type IntoIter = std::collections::btree_map::IntoIter<String, String>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}
