//! Callback registries
//!
//! A [`CallbackRegistry`] binds one attribute name (a namespace) to a map of
//! handler ids. Component code registers each behavior once and gets back a
//! [`Descriptor`]; the descriptor's id is then written into the attribute of every
//! element that should carry the behavior.
//!
//! ## Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use tessel_behaviors::CallbackRegistry;
//!
//! let registry = Rc::new(CallbackRegistry::<dyn Fn(&str)>::new("data-t-on-greet"));
//! let hello = registry.create("hello", Rc::new(|name: &str| println!("hi {name}")))?;
//!
//! let props = registry.props([&hello], None);
//! assert_eq!(props.get("data-t-on-greet"), Some("hello"));
//! ```

use std::borrow::Borrow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use tessel_dom::Element;

use crate::codec::IdList;
use crate::error::BehaviorError;
use crate::props::AttrProps;
use crate::warn_log;

/// An opaque handler id, unique within one registry.
///
/// Ids are written into space-delimited attribute values, so they are never empty
/// and never contain whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(String);

impl HandlerId {
	/// Validates and wraps `id`.
	pub fn new(id: impl Into<String>) -> Result<Self, BehaviorError> {
		let id = id.into();
		if !Self::is_valid(&id) {
			return Err(BehaviorError::InvalidHandlerId(id));
		}
		Ok(Self(id))
	}

	/// Returns whether `id` would be accepted by [`HandlerId::new`].
	pub fn is_valid(id: &str) -> bool {
		!id.is_empty() && !id.chars().any(char::is_whitespace)
	}

	/// Returns the id as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for HandlerId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for HandlerId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for HandlerId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl TryFrom<&str> for HandlerId {
	type Error = BehaviorError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl TryFrom<String> for HandlerId {
	type Error = BehaviorError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

/// Anything that resolves to zero or one handler id.
///
/// `None` resolves to no id, which lets callers attach behaviors conditionally:
/// `registry.props([cond.then_some(&descriptor)], None)`.
pub trait AsHandlerId {
	/// Returns the id, if any.
	fn handler_id(&self) -> Option<&str>;
}

impl AsHandlerId for str {
	fn handler_id(&self) -> Option<&str> {
		Some(self)
	}
}

impl AsHandlerId for String {
	fn handler_id(&self) -> Option<&str> {
		Some(self)
	}
}

impl AsHandlerId for HandlerId {
	fn handler_id(&self) -> Option<&str> {
		Some(self.as_str())
	}
}

impl<H: ?Sized + 'static> AsHandlerId for Descriptor<H> {
	fn handler_id(&self) -> Option<&str> {
		Some(self.id.as_str())
	}
}

impl<T: AsHandlerId + ?Sized> AsHandlerId for &T {
	fn handler_id(&self) -> Option<&str> {
		(**self).handler_id()
	}
}

impl<T: AsHandlerId> AsHandlerId for Option<T> {
	fn handler_id(&self) -> Option<&str> {
		self.as_ref().and_then(AsHandlerId::handler_id)
	}
}

/// An id→handler map bound to one attribute name.
///
/// `H` is the (usually unsized) handler type, e.g. `dyn Fn(&Element) -> HandlerResult`.
/// Handlers are stored as `Rc<H>` so iteration can hand out clones without keeping
/// the map borrowed while user code runs.
pub struct CallbackRegistry<H: ?Sized + 'static> {
	attribute: Rc<str>,
	warn_on_duplicate: bool,
	handlers: RefCell<HashMap<HandlerId, Rc<H>>>,
}

impl<H: ?Sized + 'static> fmt::Debug for CallbackRegistry<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CallbackRegistry")
			.field("attribute", &self.attribute)
			.field("handlers", &self.len())
			.finish()
	}
}

impl<H: ?Sized + 'static> CallbackRegistry<H> {
	/// Creates an empty registry for `attribute`.
	pub fn new(attribute: impl Into<Rc<str>>) -> Self {
		Self {
			attribute: attribute.into(),
			warn_on_duplicate: cfg!(debug_assertions),
			handlers: RefCell::new(HashMap::new()),
		}
	}

	/// Sets whether overwriting an id through [`create`](Self::create) logs a warning.
	pub fn with_duplicate_warnings(mut self, warn: bool) -> Self {
		self.warn_on_duplicate = warn;
		self
	}

	/// Returns the attribute this registry reads ids from.
	pub fn attribute(&self) -> &str {
		&self.attribute
	}

	/// Registers `handler` under `id`.
	///
	/// An existing handler with the same id is replaced (last write wins).
	pub fn create(self: &Rc<Self>, id: &str, handler: Rc<H>) -> Result<Descriptor<H>, BehaviorError> {
		let id = HandlerId::new(id)?;
		let replaced = self
			.handlers
			.borrow_mut()
			.insert(id.clone(), Rc::clone(&handler))
			.is_some();
		if replaced && self.warn_on_duplicate {
			warn_log!(
				"handler id '{}' on '{}' was registered twice; the last registration wins",
				id,
				self.attribute
			);
		}
		Ok(self.descriptor(id, handler))
	}

	/// Registers `handler` under `id`, failing if `id` is already registered.
	pub fn create_unique(self: &Rc<Self>, id: &str, handler: Rc<H>) -> Result<Descriptor<H>, BehaviorError> {
		let id = HandlerId::new(id)?;
		{
			let mut handlers = self.handlers.borrow_mut();
			if handlers.contains_key(&id) {
				return Err(BehaviorError::AlreadyRegistered {
					id: id.0,
					attribute: self.attribute.to_string(),
				});
			}
			handlers.insert(id.clone(), Rc::clone(&handler));
		}
		Ok(self.descriptor(id, handler))
	}

	/// Returns the handler registered under `id`.
	pub fn get(&self, id: &str) -> Option<Rc<H>> {
		self.handlers.borrow().get(id).cloned()
	}

	/// Returns whether `id` is registered.
	pub fn contains(&self, id: &str) -> bool {
		self.handlers.borrow().contains_key(id)
	}

	/// Deregisters `id`, returning its handler.
	pub fn remove(&self, id: &str) -> Option<Rc<H>> {
		self.handlers.borrow_mut().remove(id)
	}

	/// Returns the number of registered handlers.
	pub fn len(&self) -> usize {
		self.handlers.borrow().len()
	}

	/// Returns true if nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.handlers.borrow().is_empty()
	}

	/// Returns the registered ids, sorted.
	pub fn ids(&self) -> Vec<HandlerId> {
		let mut ids: Vec<HandlerId> = self.handlers.borrow().keys().cloned().collect();
		ids.sort();
		ids
	}

	/// Returns the handlers named by `element`'s attribute, in attribute order.
	///
	/// Unregistered ids are skipped. The result is a snapshot: handlers may change
	/// the registry or the attribute while the caller walks it.
	pub fn iter(&self, element: &Element) -> Vec<(HandlerId, Rc<H>)> {
		let Some(value) = element.get_attribute(&self.attribute) else {
			return Vec::new();
		};
		let ids = IdList::parse(&value);
		let handlers = self.handlers.borrow();
		ids.iter()
			.filter_map(|id| {
				handlers
					.get_key_value(id)
					.map(|(id, handler)| (id.clone(), Rc::clone(handler)))
			})
			.collect()
	}

	/// Builds the props fragment for this registry's attribute.
	///
	/// Ids already present under the attribute in `existing` come first, followed by
	/// the ids of `items` not seen yet. When no id remains the fragment is empty.
	pub fn props<I, T>(&self, items: I, existing: Option<&AttrProps>) -> AttrProps
	where
		I: IntoIterator<Item = T>,
		T: AsHandlerId,
	{
		let current = existing.and_then(|props| props.get(&self.attribute));
		let mut props = AttrProps::new();
		if let Some(value) = self.attribute_value(items, current) {
			props.insert(self.attribute.to_string(), value);
		}
		props
	}

	/// Merges the ids of `items` into a raw attribute value.
	///
	/// Returns `None` when the merged list is empty.
	pub fn attribute_value<I, T>(&self, items: I, existing: Option<&str>) -> Option<String>
	where
		I: IntoIterator<Item = T>,
		T: AsHandlerId,
	{
		let mut ids = IdList::from_attribute(existing);
		for item in items {
			match item.handler_id() {
				Some(id) if HandlerId::is_valid(id) => {
					ids.push(id);
				}
				Some(id) => warn_log!("skipping invalid handler id {:?} for '{}'", id, self.attribute),
				None => {}
			}
		}
		ids.encode()
	}

	fn descriptor(self: &Rc<Self>, id: HandlerId, handler: Rc<H>) -> Descriptor<H> {
		Descriptor {
			id,
			handler,
			attribute: Rc::clone(&self.attribute),
			registry: Rc::downgrade(self),
		}
	}

	fn remove_if_same(&self, id: &str, handler: &Rc<H>) -> bool {
		let mut handlers = self.handlers.borrow_mut();
		match handlers.get(id) {
			Some(current) if Rc::ptr_eq(current, handler) => {
				handlers.remove(id);
				true
			}
			_ => false,
		}
	}
}

/// A registered handler: its id, the raw function and a way to deregister it.
pub struct Descriptor<H: ?Sized + 'static> {
	id: HandlerId,
	handler: Rc<H>,
	attribute: Rc<str>,
	registry: Weak<CallbackRegistry<H>>,
}

impl<H: ?Sized + 'static> Descriptor<H> {
	/// Returns the handler id.
	pub fn id(&self) -> &HandlerId {
		&self.id
	}

	/// Returns the raw handler, for calling it directly.
	pub fn handler(&self) -> &Rc<H> {
		&self.handler
	}

	/// Returns the attribute the id belongs in.
	pub fn attribute(&self) -> &str {
		&self.attribute
	}

	/// Deregisters the handler.
	///
	/// Returns `false` when the id was removed already or has since been
	/// registered to a different handler; that registration is left alone.
	pub fn remove(&self) -> bool {
		match self.registry.upgrade() {
			Some(registry) => registry.remove_if_same(self.id.as_str(), &self.handler),
			None => false,
		}
	}

	/// Returns whether this descriptor's handler is the one registered under its id.
	pub fn is_registered(&self) -> bool {
		self.registry
			.upgrade()
			.and_then(|registry| registry.get(self.id.as_str()))
			.is_some_and(|current| Rc::ptr_eq(&current, &self.handler))
	}
}

impl<H: ?Sized + 'static> Clone for Descriptor<H> {
	fn clone(&self) -> Self {
		Self {
			id: self.id.clone(),
			handler: Rc::clone(&self.handler),
			attribute: Rc::clone(&self.attribute),
			registry: Weak::clone(&self.registry),
		}
	}
}

impl<H: ?Sized + 'static> fmt::Debug for Descriptor<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Descriptor")
			.field("id", &self.id)
			.field("attribute", &self.attribute)
			.finish_non_exhaustive()
	}
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;
	use std::cell::Cell;
	use tessel_dom::Document;

	type Counter = dyn Fn() -> u32;

	const ATTR: &str = "data-t-on-count";

	fn registry() -> Rc<CallbackRegistry<Counter>> {
		Rc::new(CallbackRegistry::new(ATTR).with_duplicate_warnings(false))
	}

	fn counter(value: u32) -> Rc<Counter> {
		Rc::new(move || value)
	}

	#[rstest]
	#[case("")]
	#[case("two words")]
	#[case("tab\tid")]
	fn test_invalid_ids_are_rejected(#[case] id: &str) {
		let registry = registry();
		let result = registry.create(id, counter(1));
		assert!(matches!(result, Err(BehaviorError::InvalidHandlerId(_))));
		assert!(registry.is_empty());
	}

	#[rstest]
	fn test_create_and_lookup() {
		let registry = registry();
		let descriptor = registry.create("menu__close", counter(7)).unwrap();

		assert_eq!(descriptor.id().as_str(), "menu__close");
		assert_eq!(descriptor.attribute(), ATTR);
		assert_eq!((descriptor.handler())(), 7);
		assert_eq!(registry.get("menu__close").map(|h| h()), Some(7));
		assert!(registry.contains("menu__close"));
		assert_eq!(registry.len(), 1);
	}

	#[rstest]
	fn test_create_overwrites_last_write_wins() {
		let registry = registry();
		let first = registry.create("x", counter(1)).unwrap();
		let second = registry.create("x", counter(2)).unwrap();

		assert_eq!(registry.get("x").map(|h| h()), Some(2));
		assert!(!first.is_registered());
		assert!(second.is_registered());
		// The stale descriptor must not remove the newer handler
		assert!(!first.remove());
		assert!(registry.contains("x"));
		assert!(second.remove());
		assert!(!registry.contains("x"));
	}

	#[rstest]
	fn test_create_unique_refuses_duplicates() {
		let registry = registry();
		registry.create_unique("x", counter(1)).unwrap();
		let err = registry.create_unique("x", counter(2)).unwrap_err();

		assert!(matches!(
			err,
			BehaviorError::AlreadyRegistered { ref id, ref attribute } if id == "x" && attribute == ATTR
		));
		assert_eq!(registry.get("x").map(|h| h()), Some(1));
	}

	#[rstest]
	fn test_recreate_after_remove() {
		let registry = registry();
		let descriptor = registry.create("x", counter(1)).unwrap();
		assert!(descriptor.remove());
		assert!(!descriptor.remove());

		registry.create_unique("x", counter(3)).unwrap();
		assert_eq!(registry.get("x").map(|h| h()), Some(3));
	}

	#[rstest]
	fn test_remove_after_registry_dropped() {
		let registry = registry();
		let descriptor = registry.create("x", counter(1)).unwrap();
		drop(registry);
		assert!(!descriptor.remove());
		assert!(!descriptor.is_registered());
	}

	#[rstest]
	fn test_iter_follows_attribute_order_and_skips_unknown() {
		let document = Document::new();
		let element = document.create_element("div");
		let registry = registry();
		registry.create("a", counter(1)).unwrap();
		registry.create("b", counter(2)).unwrap();
		element.set_attribute(ATTR, "b missing a b").unwrap();

		let found: Vec<(String, u32)> = registry
			.iter(&element)
			.into_iter()
			.map(|(id, handler)| (id.to_string(), handler()))
			.collect();
		assert_eq!(found, vec![("b".to_string(), 2), ("a".to_string(), 1)]);
	}

	#[rstest]
	fn test_iter_without_attribute_is_empty() {
		let document = Document::new();
		let element = document.create_element("div");
		let registry = registry();
		registry.create("a", counter(1)).unwrap();
		assert!(registry.iter(&element).is_empty());
	}

	#[rstest]
	fn test_iter_snapshot_allows_reentrant_mutation() {
		let document = Document::new();
		let element = document.create_element("div");
		let registry = registry();
		registry.create("a", counter(1)).unwrap();
		registry.create("b", counter(2)).unwrap();
		element.set_attribute(ATTR, "a b").unwrap();

		let calls = Cell::new(0);
		for (id, handler) in registry.iter(&element) {
			calls.set(calls.get() + handler());
			if id.as_str() == "a" {
				registry.remove("b");
				registry.create("c", counter(10)).unwrap();
			}
		}
		assert_eq!(calls.get(), 3);
		assert!(!registry.contains("b"));
	}

	#[rstest]
	fn test_props_of_same_descriptor_twice() {
		let registry = registry();
		let descriptor = registry.create("x", counter(1)).unwrap();

		let props = registry.props([&descriptor, &descriptor], None);
		assert_eq!(props.get(ATTR), Some("x"));
	}

	#[rstest]
	fn test_props_merges_existing_first() {
		let registry = registry();
		let a = registry.create("a", counter(1)).unwrap();
		let b = registry.create("b", counter(2)).unwrap();
		let existing = AttrProps::new().with(ATTR, "b c");

		let props = registry.props([&a, &b], Some(&existing));
		assert_eq!(props.get(ATTR), Some("b c a"));
	}

	#[rstest]
	fn test_props_drops_none_items() {
		let registry = registry();
		let a = registry.create("a", counter(1)).unwrap();

		let props = registry.props([None, Some(&a)], None);
		assert_eq!(props.get(ATTR), Some("a"));

		let props = registry.props([None::<&Descriptor<Counter>>], None);
		assert!(props.is_empty());
	}

	#[rstest]
	fn test_attribute_value_with_raw_strings() {
		let registry = registry();
		assert_eq!(
			registry.attribute_value(["a", "b"], Some("c a")).as_deref(),
			Some("c a b")
		);
		assert_eq!(registry.attribute_value(Vec::<&str>::new(), Some("  ")), None);
	}

	#[rstest]
	#[case::space("a b")]
	#[case::tab("a\tb")]
	#[case::empty("")]
	fn test_attribute_value_skips_invalid_raw_ids(#[case] id: &str) {
		let registry = registry();
		assert_eq!(registry.attribute_value([id, "c"], None).as_deref(), Some("c"));
		assert_eq!(registry.attribute_value([id], None), None);
	}

	#[rstest]
	fn test_props_never_splits_a_raw_id() {
		let registry = registry();
		let props = registry.props([String::from("menu open"), String::from("menu")], None);
		assert_eq!(props.get(ATTR), Some("menu"));
		assert_eq!(IdList::from_attribute(props.get(ATTR)).len(), 1);
	}

	#[rstest]
	fn test_ids_are_sorted() {
		let registry = registry();
		registry.create("b", counter(1)).unwrap();
		registry.create("a", counter(2)).unwrap();
		let ids: Vec<String> = registry.ids().iter().map(ToString::to_string).collect();
		assert_eq!(ids, vec!["a", "b"]);
	}

	proptest! {
		/// Property: iter yields exactly the registered ids of the attribute, in order
		#[test]
		fn prop_iter_matches_attribute(
			registered in proptest::collection::hash_set("[a-e]", 0..5),
			attribute in proptest::collection::vec("[a-g]", 0..10)
		) {
			let document = Document::new();
			let element = document.create_element("div");
			let registry = registry();
			for id in &registered {
				registry.create(id, counter(0)).unwrap();
			}
			element.set_attribute(ATTR, &attribute.join(" ")).unwrap();

			let mut expected: Vec<&str> = Vec::new();
			for id in &attribute {
				if registered.contains(id) && !expected.contains(&id.as_str()) {
					expected.push(id);
				}
			}
			let found: Vec<String> = registry.iter(&element).into_iter().map(|(id, _)| id.to_string()).collect();
			prop_assert_eq!(found, expected);
		}
	}
}
