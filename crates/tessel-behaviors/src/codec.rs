//! Attribute value codec.
//!
//! A behavior attribute holds an ordered, de-duplicated list of handler ids
//! separated by whitespace, e.g. `data-t-on-click="menu__close sidebar__link"`.
//! Order is execution order on the element.

use std::fmt;

/// Separator written between ids. Parsing accepts any ASCII whitespace.
pub const ID_SEPARATOR: char = ' ';

/// An ordered, duplicate-free list of handler ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdList {
	ids: Vec<String>,
}

impl IdList {
	/// Creates an empty list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses an attribute value. Repeated ids keep their first position.
	pub fn parse(value: &str) -> Self {
		let mut list = Self::new();
		for id in value.split_ascii_whitespace() {
			list.push(id);
		}
		list
	}

	/// Parses an optional attribute value; a missing attribute is an empty list.
	pub fn from_attribute(value: Option<&str>) -> Self {
		value.map(Self::parse).unwrap_or_default()
	}

	/// Appends `ids` that are not present yet after the ids of `existing`.
	pub fn merge<I, S>(existing: Option<&str>, ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut list = Self::from_attribute(existing);
		list.extend(ids);
		list
	}

	/// Appends `id` unless present. Returns whether it was added.
	///
	/// Empty ids and ids containing whitespace are refused; they would not read
	/// back as one id.
	pub fn push(&mut self, id: &str) -> bool {
		if id.is_empty() || id.chars().any(char::is_whitespace) || self.contains(id) {
			return false;
		}
		self.ids.push(id.to_string());
		true
	}

	/// Appends every id of `ids` that is not present yet.
	pub fn extend<I, S>(&mut self, ids: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		for id in ids {
			self.push(id.as_ref());
		}
	}

	/// Removes `id`. Returns whether it was present.
	pub fn remove(&mut self, id: &str) -> bool {
		let before = self.ids.len();
		self.ids.retain(|existing| existing != id);
		self.ids.len() != before
	}

	/// Returns whether `id` is in the list.
	pub fn contains(&self, id: &str) -> bool {
		self.ids.iter().any(|existing| existing == id)
	}

	/// Iterates the ids in order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.ids.iter().map(String::as_str)
	}

	/// Returns the number of ids.
	pub fn len(&self) -> usize {
		self.ids.len()
	}

	/// Returns true if the list holds no ids.
	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	/// Encodes the list as an attribute value; an empty list has no attribute.
	pub fn encode(&self) -> Option<String> {
		if self.is_empty() {
			None
		} else {
			Some(self.to_string())
		}
	}
}

impl fmt::Display for IdList {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (index, id) in self.ids.iter().enumerate() {
			if index > 0 {
				write!(f, "{}", ID_SEPARATOR)?;
			}
			f.write_str(id)?;
		}
		Ok(())
	}
}

impl From<&str> for IdList {
	fn from(value: &str) -> Self {
		Self::parse(value)
	}
}

impl<'a> IntoIterator for &'a IdList {
	type Item = &'a str;
	type IntoIter = std::iter::Map<std::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;

	fn into_iter(self) -> Self::IntoIter {
		self.ids.iter().map(String::as_str)
	}
}
