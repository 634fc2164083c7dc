use std::cell::{Cell, RefCell};

use tessel_dom::{Element, Event};

/// The event handed to delegated handlers.
///
/// Wraps the native event with the state that a real per-element listener would
/// have: the element currently being visited and the propagation flags. Stopping
/// propagation also stops the native event.
#[derive(Debug)]
pub struct DelegatedEvent {
	event: Event,
	current_target: RefCell<Option<Element>>,
	propagation_stopped: Cell<bool>,
	immediate_propagation_stopped: Cell<bool>,
}

impl DelegatedEvent {
	/// Wraps `event` with fresh propagation state.
	pub fn new(event: Event) -> Self {
		Self {
			event,
			current_target: RefCell::new(None),
			propagation_stopped: Cell::new(false),
			immediate_propagation_stopped: Cell::new(false),
		}
	}

	/// Returns the native event.
	pub fn event(&self) -> &Event {
		&self.event
	}

	/// Returns the event type.
	pub fn event_type(&self) -> String {
		self.event.event_type()
	}

	/// Returns the element the event was dispatched at.
	pub fn target(&self) -> Option<Element> {
		self.event.target()
	}

	/// Returns the element whose handlers are running.
	pub fn current_target(&self) -> Option<Element> {
		self.current_target.borrow().clone()
	}

	pub(crate) fn set_current_target(&self, element: Option<Element>) {
		*self.current_target.borrow_mut() = element;
	}

	/// Stops the walk after the current element's remaining handlers.
	pub fn stop_propagation(&self) {
		self.propagation_stopped.set(true);
		self.event.stop_propagation();
	}

	/// Stops the walk immediately, skipping the current element's remaining handlers.
	pub fn stop_immediate_propagation(&self) {
		self.propagation_stopped.set(true);
		self.immediate_propagation_stopped.set(true);
		self.event.stop_immediate_propagation();
	}

	/// Returns whether a handler stopped propagation.
	pub fn is_propagation_stopped(&self) -> bool {
		self.propagation_stopped.get()
	}

	/// Returns whether a handler stopped immediate propagation.
	pub fn is_immediate_propagation_stopped(&self) -> bool {
		self.immediate_propagation_stopped.get()
	}

	/// Cancels the event's default action.
	pub fn prevent_default(&self) {
		self.event.prevent_default();
	}

	/// Returns whether the default action was cancelled.
	pub fn default_prevented(&self) -> bool {
		self.event.default_prevented()
	}
}
