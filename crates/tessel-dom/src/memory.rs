//! Headless in-memory document
//!
//! Used on every non-wasm target. Nodes live in an arena owned by their
//! [`Document`]; [`Element`] is a cheap `(document, node id)` handle, so two handles
//! to the same node compare equal.
//!
//! Only what behaviors observe is modelled:
//!
//! - attributes (names are ASCII-lowercased, as in HTML documents)
//! - the element tree, connectedness and `contains`
//! - document-level listeners with capture and bubble phases
//! - `composedPath()` (target, ancestors, document, window)
//! - the `:modal` and `:popover-open` states used by [`HIDDEN_BOUNDARY_SELECTOR`]
//! - an animation-frame queue that tests flush explicitly
//!
//! [`HIDDEN_BOUNDARY_SELECTOR`]: crate::HIDDEN_BOUNDARY_SELECTOR

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crate::{DomError, FrameHandle};

type NodeId = usize;

/// Callback queued by [`Document::request_animation_frame`].
pub type FrameCallback = Box<dyn FnOnce() + 'static>;

type ListenerCallback = Rc<dyn Fn(&Event) + 'static>;

const ROOT: NodeId = 0;
const BODY: NodeId = 1;

struct NodeData {
	tag: String,
	attributes: Vec<(String, String)>,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
	modal: bool,
	popover_open: bool,
	marks: HashSet<u64>,
}

impl NodeData {
	fn new(tag: &str) -> Self {
		Self {
			tag: tag.to_ascii_lowercase(),
			attributes: Vec::new(),
			parent: None,
			children: Vec::new(),
			modal: false,
			popover_open: false,
			marks: HashSet::new(),
		}
	}

	fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	fn is_hidden_boundary(&self) -> bool {
		self.attribute("aria-hidden") == Some("true")
			|| (self.tag == "dialog" && !self.modal)
			|| (self.attribute("popover").is_some() && !self.popover_open)
	}
}

struct Listener {
	event_type: String,
	capture: bool,
	callback: ListenerCallback,
}

#[derive(Default)]
struct FrameQueue {
	next_id: i32,
	pending: Vec<FrameCallback>,
}

struct DocumentInner {
	nodes: RefCell<Vec<NodeData>>,
	listeners: RefCell<Vec<Listener>>,
	frames: RefCell<FrameQueue>,
}

/// A headless document holding an `<html><body>` tree.
#[derive(Clone)]
pub struct Document {
	inner: Rc<DocumentInner>,
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl PartialEq for Document {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl Eq for Document {}

impl fmt::Debug for Document {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Document")
			.field("nodes", &self.inner.nodes.borrow().len())
			.field("listeners", &self.inner.listeners.borrow().len())
			.finish()
	}
}

impl Document {
	/// Creates an empty document containing `<html><body></body></html>`.
	pub fn new() -> Self {
		let mut html = NodeData::new("html");
		html.children.push(BODY);
		let mut body = NodeData::new("body");
		body.parent = Some(ROOT);

		Self {
			inner: Rc::new(DocumentInner {
				nodes: RefCell::new(vec![html, body]),
				listeners: RefCell::new(Vec::new()),
				frames: RefCell::new(FrameQueue::default()),
			}),
		}
	}

	/// Returns the `<html>` element. Always present in a headless document.
	pub fn document_element(&self) -> Option<Element> {
		Some(self.element(ROOT))
	}

	/// Returns the `<body>` element. Always present in a headless document.
	pub fn body(&self) -> Option<Element> {
		Some(self.element(BODY))
	}

	/// Creates a detached element owned by this document.
	pub fn create_element(&self, tag: &str) -> Element {
		let mut nodes = self.inner.nodes.borrow_mut();
		nodes.push(NodeData::new(tag));
		let id = nodes.len() - 1;
		drop(nodes);
		self.element(id)
	}

	/// Returns every connected element carrying `name`, in document order.
	pub fn query_all_with_attribute(&self, name: &str) -> Vec<Element> {
		self.collect_with_attribute(ROOT, true, name)
	}

	/// Adds a document-level listener.
	///
	/// Registering the same callback twice for the same type and phase is ignored,
	/// as with `addEventListener`.
	pub fn add_event_listener(
		&self,
		event_type: &str,
		capture: bool,
		callback: Rc<dyn Fn(&Event) + 'static>,
	) -> Result<(), DomError> {
		let mut listeners = self.inner.listeners.borrow_mut();
		let duplicate = listeners.iter().any(|listener| {
			listener.event_type == event_type
				&& listener.capture == capture
				&& Rc::ptr_eq(&listener.callback, &callback)
		});
		if !duplicate {
			listeners.push(Listener {
				event_type: event_type.to_string(),
				capture,
				callback,
			});
		}
		Ok(())
	}

	/// Returns how many document-level listeners exist for `event_type`.
	pub fn listener_count(&self, event_type: &str) -> usize {
		self.inner
			.listeners
			.borrow()
			.iter()
			.filter(|listener| listener.event_type == event_type)
			.count()
	}

	/// Dispatches `event` at `target`.
	///
	/// Document-level capture listeners always run; bubble listeners run only for
	/// bubbling events. Events fired at detached elements never reach the document.
	/// Returns `false` when a listener called `prevent_default`.
	pub fn dispatch_event(&self, target: &Element, event: &Event) -> Result<bool, DomError> {
		if target.document != *self {
			return Err(DomError::WrongDocument);
		}
		if event.inner.dispatching.replace(true) {
			return Err(DomError::InvalidState(format!(
				"'{}' event is already being dispatched",
				event.inner.event_type
			)));
		}

		let mut path: Vec<EventTarget> = self
			.ancestors_inclusive(target.id)
			.into_iter()
			.map(|id| EventTarget::Element(self.element(id)))
			.collect();
		let connected = target.is_connected();
		if connected {
			path.push(EventTarget::Document(self.clone()));
			path.push(EventTarget::Window);
		}
		*event.inner.target.borrow_mut() = Some(target.clone());
		*event.inner.path.borrow_mut() = path;

		if connected {
			self.invoke_listeners(event, true);
			if event.inner.bubbles && !event.inner.propagation_stopped.get() {
				self.invoke_listeners(event, false);
			}
		}

		event.inner.path.borrow_mut().clear();
		event.inner.propagation_stopped.set(false);
		event.inner.immediate_propagation_stopped.set(false);
		event.inner.dispatching.set(false);
		Ok(!event.inner.default_prevented.get())
	}

	/// Queues `callback` for the next [`run_animation_frames`](Self::run_animation_frames).
	pub fn request_animation_frame(&self, callback: FrameCallback) -> Result<FrameHandle, DomError> {
		let mut frames = self.inner.frames.borrow_mut();
		frames.next_id += 1;
		let handle = FrameHandle(frames.next_id);
		frames.pending.push(callback);
		Ok(handle)
	}

	/// Returns the number of frame callbacks waiting for the next frame.
	pub fn pending_animation_frames(&self) -> usize {
		self.inner.frames.borrow().pending.len()
	}

	/// Runs one animation frame: every callback queued so far, in request order.
	///
	/// Callbacks requested while the frame runs are deferred to the next frame.
	/// Returns the number of callbacks run.
	pub fn run_animation_frames(&self) -> usize {
		let pending = std::mem::take(&mut self.inner.frames.borrow_mut().pending);
		let count = pending.len();
		for callback in pending {
			callback();
		}
		count
	}

	fn element(&self, id: NodeId) -> Element {
		Element {
			document: self.clone(),
			id,
		}
	}

	fn invoke_listeners(&self, event: &Event, capture: bool) {
		let callbacks: Vec<ListenerCallback> = self
			.inner
			.listeners
			.borrow()
			.iter()
			.filter(|listener| {
				listener.capture == capture && listener.event_type == event.inner.event_type
			})
			.map(|listener| Rc::clone(&listener.callback))
			.collect();

		for callback in callbacks {
			callback(event);
			if event.inner.immediate_propagation_stopped.get() {
				break;
			}
		}
	}

	fn ancestors_inclusive(&self, id: NodeId) -> Vec<NodeId> {
		let nodes = self.inner.nodes.borrow();
		let mut chain = vec![id];
		let mut cursor = nodes[id].parent;
		while let Some(parent) = cursor {
			chain.push(parent);
			cursor = nodes[parent].parent;
		}
		chain
	}

	fn collect_with_attribute(&self, start: NodeId, include_self: bool, name: &str) -> Vec<Element> {
		let name = name.to_ascii_lowercase();
		let nodes = self.inner.nodes.borrow();
		let mut stack: Vec<NodeId> = if include_self {
			vec![start]
		} else {
			nodes[start].children.iter().rev().copied().collect()
		};
		let mut found = Vec::new();
		while let Some(id) = stack.pop() {
			if nodes[id].attribute(&name).is_some() {
				found.push(id);
			}
			stack.extend(nodes[id].children.iter().rev().copied());
		}
		drop(nodes);
		found.into_iter().map(|id| self.element(id)).collect()
	}

	fn with_node<R>(&self, id: NodeId, f: impl FnOnce(&NodeData) -> R) -> R {
		f(&self.inner.nodes.borrow()[id])
	}

	fn with_node_mut<R>(&self, id: NodeId, f: impl FnOnce(&mut NodeData) -> R) -> R {
		f(&mut self.inner.nodes.borrow_mut()[id])
	}
}

/// Handle to an element of a headless [`Document`].
#[derive(Clone)]
pub struct Element {
	document: Document,
	id: NodeId,
}

impl PartialEq for Element {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id && self.document == other.document
	}
}

impl Eq for Element {}

impl fmt::Debug for Element {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.document.with_node(self.id, |node| {
			write!(f, "<{}", node.tag)?;
			for (name, value) in &node.attributes {
				write!(f, " {}=\"{}\"", name, value)?;
			}
			write!(f, ">#{}", self.id)
		})
	}
}

impl Element {
	/// Returns the upper-case tag name, as `Element.tagName` does for HTML.
	pub fn tag_name(&self) -> String {
		self.document
			.with_node(self.id, |node| node.tag.to_ascii_uppercase())
	}

	/// Returns the value of attribute `name`.
	pub fn get_attribute(&self, name: &str) -> Option<String> {
		let name = name.to_ascii_lowercase();
		self.document
			.with_node(self.id, |node| node.attribute(&name).map(str::to_string))
	}

	/// Returns whether attribute `name` is present.
	pub fn has_attribute(&self, name: &str) -> bool {
		self.get_attribute(name).is_some()
	}

	/// Sets attribute `name` to `value`.
	pub fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
		let name = validate_attribute_name(name)?;
		self.document.with_node_mut(self.id, |node| {
			match node.attributes.iter_mut().find(|(key, _)| *key == name) {
				Some((_, existing)) => *existing = value.to_string(),
				None => node.attributes.push((name, value.to_string())),
			}
		});
		Ok(())
	}

	/// Removes attribute `name`; removing a missing attribute is not an error.
	pub fn remove_attribute(&self, name: &str) -> Result<(), DomError> {
		let name = name.to_ascii_lowercase();
		self.document.with_node_mut(self.id, |node| {
			node.attributes.retain(|(key, _)| *key != name);
		});
		Ok(())
	}

	/// Returns the parent element, if any.
	pub fn parent_element(&self) -> Option<Element> {
		self.document
			.with_node(self.id, |node| node.parent)
			.map(|id| self.document.element(id))
	}

	/// Returns the child elements in order.
	pub fn children(&self) -> Vec<Element> {
		self.document
			.with_node(self.id, |node| node.children.clone())
			.into_iter()
			.map(|id| self.document.element(id))
			.collect()
	}

	/// Appends `child`, moving it out of its current parent first.
	pub fn append_child(&self, child: &Element) -> Result<(), DomError> {
		if child.document != self.document {
			return Err(DomError::WrongDocument);
		}
		if child.contains(self) {
			return Err(DomError::Hierarchy);
		}
		child.remove();
		self.document.with_node_mut(child.id, |node| node.parent = Some(self.id));
		self.document
			.with_node_mut(self.id, |node| node.children.push(child.id));
		Ok(())
	}

	/// Detaches the element from its parent. Its subtree stays attached to it.
	pub fn remove(&self) {
		let Some(parent) = self.document.with_node_mut(self.id, |node| node.parent.take()) else {
			return;
		};
		self.document.with_node_mut(parent, |node| {
			node.children.retain(|child| *child != self.id);
		});
	}

	/// Returns whether `other` is this element or one of its descendants.
	pub fn contains(&self, other: &Element) -> bool {
		other.document == self.document
			&& self
				.document
				.ancestors_inclusive(other.id)
				.contains(&self.id)
	}

	/// Returns whether the element is attached to its document.
	pub fn is_connected(&self) -> bool {
		self.document.ancestors_inclusive(self.id).last() == Some(&ROOT)
	}

	/// Returns the document that owns this element.
	///
	/// Always `Some` for the headless document; kept optional to match `web-sys`.
	pub fn owner_document(&self) -> Option<Document> {
		Some(self.document.clone())
	}

	/// Returns the descendants carrying attribute `name`, in document order.
	pub fn query_all_with_attribute(&self, name: &str) -> Vec<Element> {
		self.document.collect_with_attribute(self.id, false, name)
	}

	/// Returns whether this element matches [`HIDDEN_BOUNDARY_SELECTOR`](crate::HIDDEN_BOUNDARY_SELECTOR).
	pub fn is_hidden_boundary(&self) -> bool {
		self.document
			.with_node(self.id, NodeData::is_hidden_boundary)
	}

	/// Returns the nearest inclusive ancestor that is a hidden boundary.
	pub fn closest_hidden_boundary(&self) -> Option<Element> {
		let nodes = self.document.inner.nodes.borrow();
		let mut cursor = Some(self.id);
		while let Some(id) = cursor {
			if nodes[id].is_hidden_boundary() {
				drop(nodes);
				return Some(self.document.element(id));
			}
			cursor = nodes[id].parent;
		}
		None
	}

	/// Opens a `<dialog>` as a modal (`showModal()`).
	pub fn show_modal(&self) -> Result<(), DomError> {
		self.open_dialog(true)
	}

	/// Opens a `<dialog>` non-modally (`show()`).
	pub fn show(&self) -> Result<(), DomError> {
		self.open_dialog(false)
	}

	/// Closes a `<dialog>`.
	pub fn close(&self) -> Result<(), DomError> {
		self.require_tag("dialog")?;
		self.document.with_node_mut(self.id, |node| node.modal = false);
		self.remove_attribute("open")
	}

	/// Returns whether the element is a dialog open as a modal.
	pub fn is_modal(&self) -> bool {
		self.document.with_node(self.id, |node| node.modal)
	}

	/// Shows a `[popover]` element.
	pub fn show_popover(&self) -> Result<(), DomError> {
		self.set_popover_open(true)
	}

	/// Hides a `[popover]` element.
	pub fn hide_popover(&self) -> Result<(), DomError> {
		self.set_popover_open(false)
	}

	/// Returns whether the element is a popover currently showing.
	pub fn is_popover_open(&self) -> bool {
		self.document.with_node(self.id, |node| node.popover_open)
	}

	/// Dispatches `event` at this element through its owner document.
	pub fn dispatch_event(&self, event: &Event) -> Result<bool, DomError> {
		self.document.dispatch_event(self, event)
	}

	pub(crate) fn has_mark(&self, key: u64) -> bool {
		self.document
			.with_node(self.id, |node| node.marks.contains(&key))
	}

	pub(crate) fn insert_mark(&self, key: u64) -> bool {
		self.document
			.with_node_mut(self.id, |node| node.marks.insert(key))
	}

	fn open_dialog(&self, modal: bool) -> Result<(), DomError> {
		self.require_tag("dialog")?;
		if modal && self.has_attribute("open") && !self.is_modal() {
			return Err(DomError::InvalidState(
				"dialog is already open non-modally".to_string(),
			));
		}
		self.document.with_node_mut(self.id, |node| node.modal = modal);
		self.set_attribute("open", "")
	}

	fn set_popover_open(&self, open: bool) -> Result<(), DomError> {
		if !self.has_attribute("popover") {
			return Err(DomError::InvalidState(
				"element does not have the popover attribute".to_string(),
			));
		}
		self.document
			.with_node_mut(self.id, |node| node.popover_open = open);
		Ok(())
	}

	fn require_tag(&self, tag: &str) -> Result<(), DomError> {
		if self.document.with_node(self.id, |node| node.tag == tag) {
			Ok(())
		} else {
			Err(DomError::InvalidState(format!("<{}> required", tag)))
		}
	}
}

fn validate_attribute_name(name: &str) -> Result<String, DomError> {
	let invalid = name.is_empty()
		|| name
			.chars()
			.any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '>' | '/' | '='));
	if invalid {
		return Err(DomError::InvalidAttributeName(name.to_string()));
	}
	Ok(name.to_ascii_lowercase())
}

/// Flags for [`Event::new_with_init`], mirroring the DOM `EventInit` dictionary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventInit {
	/// Whether the event bubbles.
	pub bubbles: bool,
	/// Whether `prevent_default` has an effect.
	pub cancelable: bool,
}

struct EventInner {
	event_type: String,
	bubbles: bool,
	cancelable: bool,
	target: RefCell<Option<Element>>,
	path: RefCell<Vec<EventTarget>>,
	dispatching: Cell<bool>,
	propagation_stopped: Cell<bool>,
	immediate_propagation_stopped: Cell<bool>,
	default_prevented: Cell<bool>,
}

/// A DOM event for the headless document.
///
/// Clones share state, like references to one JavaScript event object.
#[derive(Clone)]
pub struct Event {
	inner: Rc<EventInner>,
}

impl fmt::Debug for Event {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Event")
			.field("type", &self.inner.event_type)
			.field("bubbles", &self.inner.bubbles)
			.field("target", &self.inner.target.borrow())
			.finish()
	}
}

impl Event {
	/// Creates a bubbling, cancelable event, as the user agent fires for `click`.
	pub fn new(event_type: &str) -> Self {
		Self::new_with_init(
			event_type,
			EventInit {
				bubbles: true,
				cancelable: true,
			},
		)
	}

	/// Creates an event with explicit flags.
	pub fn new_with_init(event_type: &str, init: EventInit) -> Self {
		Self {
			inner: Rc::new(EventInner {
				event_type: event_type.to_string(),
				bubbles: init.bubbles,
				cancelable: init.cancelable,
				target: RefCell::new(None),
				path: RefCell::new(Vec::new()),
				dispatching: Cell::new(false),
				propagation_stopped: Cell::new(false),
				immediate_propagation_stopped: Cell::new(false),
				default_prevented: Cell::new(false),
			}),
		}
	}

	/// Returns the event type.
	pub fn event_type(&self) -> String {
		self.inner.event_type.clone()
	}

	/// Returns whether the event bubbles.
	pub fn bubbles(&self) -> bool {
		self.inner.bubbles
	}

	/// Returns the element the event was dispatched at.
	pub fn target(&self) -> Option<Element> {
		self.inner.target.borrow().clone()
	}

	/// Returns the propagation path, innermost first. Empty outside dispatch.
	pub fn composed_path(&self) -> Vec<EventTarget> {
		self.inner.path.borrow().clone()
	}

	/// Stops propagation to further nodes.
	pub fn stop_propagation(&self) {
		self.inner.propagation_stopped.set(true);
	}

	/// Stops propagation and the remaining listeners of the current node.
	pub fn stop_immediate_propagation(&self) {
		self.inner.propagation_stopped.set(true);
		self.inner.immediate_propagation_stopped.set(true);
	}

	/// Returns whether propagation was stopped during the current dispatch.
	pub fn is_propagation_stopped(&self) -> bool {
		self.inner.propagation_stopped.get()
	}

	/// Cancels the default action when the event is cancelable.
	pub fn prevent_default(&self) {
		if self.inner.cancelable {
			self.inner.default_prevented.set(true);
		}
	}

	/// Returns whether the default action was cancelled.
	pub fn default_prevented(&self) -> bool {
		self.inner.default_prevented.get()
	}
}

/// An entry of [`Event::composed_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTarget {
	/// An element on the path.
	Element(Element),
	/// The owner document.
	Document(Document),
	/// The document's window.
	Window,
}

impl EventTarget {
	/// Returns the element if this target supports attributes.
	pub fn as_element(&self) -> Option<Element> {
		match self {
			Self::Element(element) => Some(element.clone()),
			Self::Document(_) | Self::Window => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn tree() -> (Document, Element, Element, Element) {
		let document = Document::new();
		let outer = document.create_element("div");
		let inner = document.create_element("section");
		let leaf = document.create_element("button");
		document.body().unwrap().append_child(&outer).unwrap();
		outer.append_child(&inner).unwrap();
		inner.append_child(&leaf).unwrap();
		(document, outer, inner, leaf)
	}

	#[test]
	fn test_attributes_are_case_insensitive() {
		let document = Document::new();
		let element = document.create_element("DIV");
		element.set_attribute("Data-T-Mount", "a").unwrap();

		assert_eq!(element.tag_name(), "DIV");
		assert_eq!(element.get_attribute("data-t-mount").as_deref(), Some("a"));
		assert!(element.has_attribute("DATA-T-MOUNT"));

		element.remove_attribute("data-t-mount").unwrap();
		assert!(!element.has_attribute("data-t-mount"));
	}

	#[rstest]
	#[case("")]
	#[case("data t")]
	#[case("a=b")]
	fn test_set_attribute_rejects_invalid_names(#[case] name: &str) {
		let element = Document::new().create_element("div");
		assert!(matches!(
			element.set_attribute(name, "x"),
			Err(DomError::InvalidAttributeName(_))
		));
	}

	#[test]
	fn test_query_all_with_attribute_uses_document_order() {
		let (document, outer, inner, leaf) = tree();
		let sibling = document.create_element("p");
		document.body().unwrap().append_child(&sibling).unwrap();
		for element in [&sibling, &leaf, &outer] {
			element.set_attribute("data-x", "").unwrap();
		}

		assert_eq!(
			document.query_all_with_attribute("data-x"),
			vec![outer.clone(), leaf.clone(), sibling]
		);
		assert_eq!(outer.query_all_with_attribute("data-x"), vec![leaf.clone()]);
		assert!(inner.query_all_with_attribute("data-y").is_empty());
	}

	#[test]
	fn test_contains_and_connection() {
		let (document, outer, inner, leaf) = tree();
		assert!(outer.contains(&leaf));
		assert!(leaf.contains(&leaf));
		assert!(!leaf.contains(&outer));
		assert!(leaf.is_connected());

		inner.remove();
		assert!(!leaf.is_connected());
		assert!(inner.contains(&leaf));
		assert!(!outer.contains(&leaf));
		assert!(document.query_all_with_attribute("data-x").is_empty());
	}

	#[test]
	fn test_append_child_rejects_cycles_and_foreign_nodes() {
		let (_, outer, _, leaf) = tree();
		assert_eq!(leaf.append_child(&outer), Err(DomError::Hierarchy));

		let foreign = Document::new().create_element("div");
		assert_eq!(outer.append_child(&foreign), Err(DomError::WrongDocument));
	}

	#[test]
	fn test_hidden_boundaries() {
		let document = Document::new();
		let dialog = document.create_element("dialog");
		let popover = document.create_element("div");
		popover.set_attribute("popover", "").unwrap();
		let hidden = document.create_element("div");
		hidden.set_attribute("aria-hidden", "true").unwrap();
		let child = document.create_element("span");
		dialog.append_child(&child).unwrap();

		assert!(dialog.is_hidden_boundary());
		assert!(popover.is_hidden_boundary());
		assert!(hidden.is_hidden_boundary());
		assert_eq!(child.closest_hidden_boundary(), Some(dialog.clone()));

		dialog.show_modal().unwrap();
		popover.show_popover().unwrap();
		assert!(!dialog.is_hidden_boundary());
		assert!(!popover.is_hidden_boundary());
		assert_eq!(child.closest_hidden_boundary(), None);

		dialog.close().unwrap();
		dialog.show().unwrap();
		assert!(dialog.is_hidden_boundary());
	}

	#[test]
	fn test_show_popover_requires_attribute() {
		let element = Document::new().create_element("div");
		assert!(matches!(
			element.show_popover(),
			Err(DomError::InvalidState(_))
		));
	}

	#[test]
	fn test_dispatch_builds_composed_path() {
		let (document, outer, inner, leaf) = tree();
		let seen = Rc::new(RefCell::new(Vec::new()));
		let seen_clone = Rc::clone(&seen);
		document
			.add_event_listener(
				"click",
				false,
				Rc::new(move |event: &Event| {
					seen_clone.borrow_mut().extend(event.composed_path());
				}),
			)
			.unwrap();

		assert!(leaf.dispatch_event(&Event::new("click")).unwrap());

		let seen = seen.borrow();
		assert_eq!(seen.len(), 7);
		assert_eq!(seen[0], EventTarget::Element(leaf));
		assert_eq!(seen[1], EventTarget::Element(inner));
		assert_eq!(seen[2], EventTarget::Element(outer));
		assert_eq!(seen[5], EventTarget::Document(document));
		assert_eq!(seen[6], EventTarget::Window);
	}

	#[test]
	fn test_bubble_listeners_skip_non_bubbling_events() {
		let (document, _, _, leaf) = tree();
		let log = Rc::new(RefCell::new(Vec::new()));
		for capture in [true, false] {
			let log = Rc::clone(&log);
			document
				.add_event_listener(
					"toggle",
					capture,
					Rc::new(move |_: &Event| log.borrow_mut().push(capture)),
				)
				.unwrap();
		}

		leaf.dispatch_event(&Event::new_with_init("toggle", EventInit::default()))
			.unwrap();
		assert_eq!(*log.borrow(), vec![true]);

		leaf.dispatch_event(&Event::new("toggle")).unwrap();
		assert_eq!(*log.borrow(), vec![true, true, false]);
	}

	#[test]
	fn test_detached_targets_do_not_reach_the_document() {
		let document = Document::new();
		let detached = document.create_element("div");
		let fired = Rc::new(Cell::new(false));
		let fired_clone = Rc::clone(&fired);
		document
			.add_event_listener("click", false, Rc::new(move |_: &Event| fired_clone.set(true)))
			.unwrap();

		detached.dispatch_event(&Event::new("click")).unwrap();
		assert!(!fired.get());
	}

	#[test]
	fn test_redispatch_during_dispatch_is_rejected() {
		let (document, _, _, leaf) = tree();
		let result = Rc::new(RefCell::new(None));
		let result_clone = Rc::clone(&result);
		let leaf_clone = leaf.clone();
		document
			.add_event_listener(
				"click",
				false,
				Rc::new(move |event: &Event| {
					*result_clone.borrow_mut() = Some(leaf_clone.dispatch_event(event));
				}),
			)
			.unwrap();

		leaf.dispatch_event(&Event::new("click")).unwrap();
		assert!(matches!(
			*result.borrow(),
			Some(Err(DomError::InvalidState(_)))
		));
	}

	#[test]
	fn test_prevent_default_and_flag_reset() {
		let (document, _, _, leaf) = tree();
		document
			.add_event_listener(
				"submit",
				false,
				Rc::new(|event: &Event| {
					event.prevent_default();
					event.stop_propagation();
				}),
			)
			.unwrap();

		let event = Event::new("submit");
		assert!(!leaf.dispatch_event(&event).unwrap());
		assert!(event.default_prevented());
		assert!(!event.is_propagation_stopped());
		assert!(event.composed_path().is_empty());
		assert_eq!(event.target(), Some(leaf));
	}

	#[test]
	fn test_duplicate_listener_is_ignored() {
		let document = Document::new();
		let callback: Rc<dyn Fn(&Event)> = Rc::new(|_: &Event| {});
		document
			.add_event_listener("click", false, Rc::clone(&callback))
			.unwrap();
		document.add_event_listener("click", false, callback).unwrap();
		assert_eq!(document.listener_count("click"), 1);
	}

	#[test]
	fn test_animation_frames_run_in_order_and_defer_nested_requests() {
		let document = Document::new();
		let log = Rc::new(RefCell::new(Vec::new()));

		let first = Rc::clone(&log);
		let nested_document = document.clone();
		document
			.request_animation_frame(Box::new(move || {
				first.borrow_mut().push(1);
				let nested = Rc::clone(&first);
				nested_document
					.request_animation_frame(Box::new(move || nested.borrow_mut().push(3)))
					.unwrap();
			}))
			.unwrap();
		let second = Rc::clone(&log);
		document
			.request_animation_frame(Box::new(move || second.borrow_mut().push(2)))
			.unwrap();

		assert_eq!(document.run_animation_frames(), 2);
		assert_eq!(*log.borrow(), vec![1, 2]);
		assert_eq!(document.pending_animation_frames(), 1);
		assert_eq!(document.run_animation_frames(), 1);
		assert_eq!(*log.borrow(), vec![1, 2, 3]);
	}
}
