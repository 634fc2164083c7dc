use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tessel_dom::{Document, Element, Event};

use super::delegated::DelegatedEvent;
use super::phase::{Phase, phase_for, validate_event_type};
use crate::config::RuntimeConfig;
use crate::error::{BehaviorError, HandlerResult, IntoHandlerResult};
use crate::registry::{CallbackRegistry, Descriptor};
use crate::{debug_log, error_log};

/// Function type of a delegated event handler.
pub type EventHandlerFn = dyn Fn(&DelegatedEvent) -> HandlerResult;

/// Registry of the handlers for one event type.
pub type EventRegistry = CallbackRegistry<EventHandlerFn>;

/// Descriptor returned by [`EventDelegator::create_handler`].
pub type EventDescriptor = Descriptor<EventHandlerFn>;

/// Owns one registry per event type and the document listeners feeding them.
#[derive(Debug)]
pub struct EventDelegator {
	config: RuntimeConfig,
	registries: RefCell<HashMap<String, Rc<EventRegistry>>>,
	documents: RefCell<Vec<Document>>,
	listening: RefCell<Vec<(Document, String)>>,
}

impl EventDelegator {
	/// Creates a delegator using `config`'s attribute prefix.
	pub fn new(config: &RuntimeConfig) -> Self {
		Self {
			config: config.clone(),
			registries: RefCell::new(HashMap::new()),
			documents: RefCell::new(Vec::new()),
			listening: RefCell::new(Vec::new()),
		}
	}

	/// Returns the attribute holding ids for `event_type`.
	pub fn attribute_name(&self, event_type: &str) -> String {
		self.config.event_attribute(event_type)
	}

	/// Returns the registry for `event_type`, creating it on first use.
	///
	/// A new registry is wired to every observed document right away.
	pub fn registry(&self, event_type: &str) -> Result<Rc<EventRegistry>, BehaviorError> {
		validate_event_type(event_type)?;
		if let Some(registry) = self.registries.borrow().get(event_type) {
			return Ok(Rc::clone(registry));
		}

		let registry = Rc::new(
			CallbackRegistry::new(self.attribute_name(event_type))
				.with_duplicate_warnings(self.config.warn_on_duplicate_ids),
		);
		self.registries
			.borrow_mut()
			.insert(event_type.to_string(), Rc::clone(&registry));

		let documents = self.documents.borrow().clone();
		for document in &documents {
			self.listen(document, event_type, &registry)?;
		}
		Ok(registry)
	}

	/// Registers `handler` for `event_type` under `id`.
	///
	/// The handler runs for every `event_type` event whose composed path contains an
	/// element listing `id` in its `<prefix>on-<event_type>` attribute.
	pub fn create_handler<F, R>(
		&self,
		event_type: &str,
		id: &str,
		handler: F,
	) -> Result<EventDescriptor, BehaviorError>
	where
		F: Fn(&DelegatedEvent) -> R + 'static,
		R: IntoHandlerResult,
	{
		let registry = self.registry(event_type)?;
		let handler: Rc<EventHandlerFn> = Rc::new(move |event: &DelegatedEvent| handler(event).into_handler_result());
		registry.create(id, handler)
	}

	/// Starts delegating events of `document`.
	///
	/// Listeners for every known event type are attached now; later types are
	/// attached when first registered. Observing a document twice has no effect.
	pub fn observe(&self, document: &Document) -> Result<(), BehaviorError> {
		if self.is_observing(document) {
			return Ok(());
		}
		self.documents.borrow_mut().push(document.clone());

		let registries: Vec<(String, Rc<EventRegistry>)> = self
			.registries
			.borrow()
			.iter()
			.map(|(event_type, registry)| (event_type.clone(), Rc::clone(registry)))
			.collect();
		for (event_type, registry) in &registries {
			self.listen(document, event_type, registry)?;
		}
		Ok(())
	}

	/// Returns whether `document` is observed.
	pub fn is_observing(&self, document: &Document) -> bool {
		self.documents.borrow().iter().any(|observed| observed == document)
	}

	/// Returns whether a listener for `event_type` is attached to `document`.
	pub fn is_listening(&self, document: &Document, event_type: &str) -> bool {
		self.listening
			.borrow()
			.iter()
			.any(|(observed, listened)| observed == document && listened == event_type)
	}

	/// Returns the number of document listeners attached so far.
	pub fn listener_count(&self) -> usize {
		self.listening.borrow().len()
	}

	/// Returns the event types with a registry, sorted.
	pub fn event_types(&self) -> Vec<String> {
		let mut types: Vec<String> = self.registries.borrow().keys().cloned().collect();
		types.sort();
		types
	}

	fn listen(
		&self,
		document: &Document,
		event_type: &str,
		registry: &Rc<EventRegistry>,
	) -> Result<(), BehaviorError> {
		if self.is_listening(document, event_type) {
			return Ok(());
		}
		let phase = phase_for(event_type);
		let registry = Rc::clone(registry);
		document.add_event_listener(
			event_type,
			phase.is_capture(),
			Rc::new(move |event: &Event| dispatch(&registry, phase, event)),
		)?;
		self.listening
			.borrow_mut()
			.push((document.clone(), event_type.to_string()));
		debug_log!("delegating '{}' events ({:?} phase)", event_type, phase);
		Ok(())
	}
}

/// Replays `event` along its composed path, running the handlers of `registry`.
///
/// Elements are visited innermost first; path entries that are not elements are
/// skipped. For [`Phase::Target`] only the event target is visited. A handler
/// error is logged and the walk continues.
pub fn dispatch(registry: &EventRegistry, phase: Phase, event: &Event) {
	let delegated = DelegatedEvent::new(event.clone());
	let elements: Vec<Element> = if phase.walks_path() {
		event
			.composed_path()
			.iter()
			.filter_map(|target| target.as_element())
			.collect()
	} else {
		event.target().into_iter().collect()
	};

	for element in elements {
		if delegated.is_propagation_stopped() {
			break;
		}
		let handlers = registry.iter(&element);
		if handlers.is_empty() {
			continue;
		}
		delegated.set_current_target(Some(element));
		for (id, handler) in handlers {
			if let Err(error) = handler(&delegated) {
				error_log!(
					"'{}' handler '{}' failed: {}",
					delegated.event_type(),
					id,
					error
				);
			}
			if delegated.is_immediate_propagation_stopped() {
				return;
			}
		}
	}
}
