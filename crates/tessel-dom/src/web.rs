//! `web-sys` backend
//!
//! Newtype wrappers exposing the same surface as the headless document, so code
//! above this crate compiles unchanged for the browser.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::{DomError, FrameHandle, HIDDEN_BOUNDARY_SELECTOR};

/// Callback passed to [`Document::request_animation_frame`].
pub type FrameCallback = Box<dyn FnOnce() + 'static>;

/// A browser document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document(web_sys::Document);

impl Document {
	/// Returns the document of the current window.
	pub fn current() -> Result<Self, DomError> {
		let window = web_sys::window().ok_or(DomError::NoWindow)?;
		window.document().map(Self).ok_or(DomError::NoDocument)
	}

	/// Wraps a raw `web_sys::Document`.
	pub fn from_raw(document: web_sys::Document) -> Self {
		Self(document)
	}

	/// Returns the wrapped `web_sys::Document`.
	pub fn as_raw(&self) -> &web_sys::Document {
		&self.0
	}

	/// Returns the `<html>` element.
	pub fn document_element(&self) -> Option<Element> {
		self.0.document_element().map(Element)
	}

	/// Returns the `<body>` element.
	pub fn body(&self) -> Option<Element> {
		self.0.body().map(|body| Element(body.into()))
	}

	/// Returns every element carrying `name`, in document order.
	pub fn query_all_with_attribute(&self, name: &str) -> Vec<Element> {
		match self.0.query_selector_all(&attribute_selector(name)) {
			Ok(list) => collect_elements(&list),
			Err(_) => Vec::new(),
		}
	}

	/// Adds a document-level listener that lives as long as the document.
	pub fn add_event_listener(
		&self,
		event_type: &str,
		capture: bool,
		callback: Rc<dyn Fn(&Event) + 'static>,
	) -> Result<(), DomError> {
		let closure = Closure::<dyn Fn(web_sys::Event)>::new(move |event: web_sys::Event| {
			callback(&Event(event));
		});
		self.0.add_event_listener_with_callback_and_bool(
			event_type,
			closure.as_ref().unchecked_ref(),
			capture,
		)?;
		// The listener is never removed; the closure must outlive this call.
		closure.forget();
		Ok(())
	}

	/// Requests `callback` on the next animation frame of the document's window.
	pub fn request_animation_frame(&self, callback: FrameCallback) -> Result<FrameHandle, DomError> {
		let window = self.0.default_view().ok_or(DomError::NoWindow)?;
		let closure = Closure::once_into_js(move || callback());
		let id = window.request_animation_frame(closure.unchecked_ref())?;
		Ok(FrameHandle(id))
	}
}

/// A browser element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element(web_sys::Element);

impl Element {
	/// Wraps a raw `web_sys::Element`.
	pub fn from_raw(element: web_sys::Element) -> Self {
		Self(element)
	}

	/// Returns the wrapped `web_sys::Element`.
	pub fn as_raw(&self) -> &web_sys::Element {
		&self.0
	}

	/// Returns `Element.tagName`.
	pub fn tag_name(&self) -> String {
		self.0.tag_name()
	}

	/// Returns the value of attribute `name`.
	pub fn get_attribute(&self, name: &str) -> Option<String> {
		self.0.get_attribute(name)
	}

	/// Returns whether attribute `name` is present.
	pub fn has_attribute(&self, name: &str) -> bool {
		self.0.has_attribute(name)
	}

	/// Sets attribute `name` to `value`.
	pub fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
		self.0
			.set_attribute(name, value)
			.map_err(|_| DomError::InvalidAttributeName(name.to_string()))
	}

	/// Removes attribute `name`.
	pub fn remove_attribute(&self, name: &str) -> Result<(), DomError> {
		self.0.remove_attribute(name).map_err(DomError::from)
	}

	/// Returns the parent element, if any.
	pub fn parent_element(&self) -> Option<Element> {
		self.0.parent_element().map(Element)
	}

	/// Returns whether `other` is this element or one of its descendants.
	pub fn contains(&self, other: &Element) -> bool {
		let node: &web_sys::Node = other.0.as_ref();
		self.0.contains(Some(node))
	}

	/// Returns whether the element is attached to its document.
	pub fn is_connected(&self) -> bool {
		self.0.is_connected()
	}

	/// Returns the document that owns this element.
	pub fn owner_document(&self) -> Option<Document> {
		self.0.owner_document().map(Document)
	}

	/// Returns the descendants carrying attribute `name`, in document order.
	pub fn query_all_with_attribute(&self, name: &str) -> Vec<Element> {
		match self.0.query_selector_all(&attribute_selector(name)) {
			Ok(list) => collect_elements(&list),
			Err(_) => Vec::new(),
		}
	}

	/// Returns whether this element matches [`HIDDEN_BOUNDARY_SELECTOR`].
	pub fn is_hidden_boundary(&self) -> bool {
		self.0.matches(HIDDEN_BOUNDARY_SELECTOR).unwrap_or(false)
	}

	/// Returns the nearest inclusive ancestor that is a hidden boundary.
	pub fn closest_hidden_boundary(&self) -> Option<Element> {
		self.0
			.closest(HIDDEN_BOUNDARY_SELECTOR)
			.ok()
			.flatten()
			.map(Element)
	}
}

/// A browser event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event(web_sys::Event);

impl Event {
	/// Wraps a raw `web_sys::Event`.
	pub fn from_raw(event: web_sys::Event) -> Self {
		Self(event)
	}

	/// Returns the wrapped `web_sys::Event`.
	pub fn as_raw(&self) -> &web_sys::Event {
		&self.0
	}

	/// Returns the event type.
	pub fn event_type(&self) -> String {
		self.0.type_()
	}

	/// Returns whether the event bubbles.
	pub fn bubbles(&self) -> bool {
		self.0.bubbles()
	}

	/// Returns the element the event was dispatched at, if it is an element.
	pub fn target(&self) -> Option<Element> {
		self.0
			.target()
			.and_then(|target| target.dyn_into::<web_sys::Element>().ok())
			.map(Element)
	}

	/// Returns `composedPath()`, innermost first.
	pub fn composed_path(&self) -> Vec<EventTarget> {
		self.0
			.composed_path()
			.iter()
			.map(|value| EventTarget(value.unchecked_into()))
			.collect()
	}

	/// Calls the native `stopPropagation`.
	pub fn stop_propagation(&self) {
		self.0.stop_propagation();
	}

	/// Calls the native `stopImmediatePropagation`.
	pub fn stop_immediate_propagation(&self) {
		self.0.stop_immediate_propagation();
	}

	/// Calls the native `preventDefault`.
	pub fn prevent_default(&self) {
		self.0.prevent_default();
	}

	/// Returns `defaultPrevented`.
	pub fn default_prevented(&self) -> bool {
		self.0.default_prevented()
	}
}

/// An entry of [`Event::composed_path`]: any `EventTarget`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTarget(web_sys::EventTarget);

impl EventTarget {
	/// Returns the element if this target supports attributes.
	pub fn as_element(&self) -> Option<Element> {
		self.0.dyn_ref::<web_sys::Element>().cloned().map(Element)
	}
}

fn attribute_selector(name: &str) -> String {
	format!("[{}]", name)
}

fn collect_elements(list: &web_sys::NodeList) -> Vec<Element> {
	(0..list.length())
		.filter_map(|index| list.get(index))
		.filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
		.map(Element)
		.collect()
}
