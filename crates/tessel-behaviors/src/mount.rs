//! Mount Processor
//!
//! Mounters are one-shot initializers. An element lists mounter ids in its
//! `<prefix>mount` attribute; processing runs them once, marks the element in an
//! out-of-band side table and strips the attribute. A renderer that later rewrites
//! the same attribute value cannot trigger the mounters again, because the marker
//! does not live in the attributes.
//!
//! ## Scheduling
//!
//! [`MountProcessor::schedule_process_root`] batches bursts of DOM insertions into
//! a single [`process_root`](MountProcessor::process_root) on the next animation
//! frame. One frame is outstanding per document at a time.
//!
//! ```ignore
//! let init = create_mounter("tooltip__init", |element| {
//!     element.set_attribute("role", "tooltip")
//! })?;
//!
//! AttrProps::new().attach(&init).apply_to(&tooltip)?;
//! schedule_process_root(&document)?;
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use tessel_dom::{Document, Element, ElementMarks, Root};

use crate::config::RuntimeConfig;
use crate::error::{BehaviorError, HandlerResult, IntoHandlerResult};
use crate::registry::{CallbackRegistry, Descriptor};
use crate::{debug_log, error_log, warn_log};

/// Function type of a mounter.
pub type MountFn = dyn Fn(&Element) -> HandlerResult;

/// Registry of mounters.
pub type MountRegistry = CallbackRegistry<MountFn>;

/// Descriptor returned by [`MountProcessor::create_mounter`].
pub type MountDescriptor = Descriptor<MountFn>;

/// Runs mounters at most once per element.
#[derive(Debug)]
pub struct MountProcessor {
	registry: Rc<MountRegistry>,
	processed: ElementMarks,
	pending: RefCell<Vec<Document>>,
}

impl MountProcessor {
	/// Creates a processor reading `config`'s mount attribute.
	pub fn new(config: &RuntimeConfig) -> Self {
		Self {
			registry: Rc::new(
				CallbackRegistry::new(config.mount_attribute())
					.with_duplicate_warnings(config.warn_on_duplicate_ids),
			),
			processed: ElementMarks::new(),
			pending: RefCell::new(Vec::new()),
		}
	}

	/// Returns the mount attribute name.
	pub fn attribute_name(&self) -> &str {
		self.registry.attribute()
	}

	/// Returns the mounter registry.
	pub fn registry(&self) -> &Rc<MountRegistry> {
		&self.registry
	}

	/// Registers `mounter` under `id`.
	pub fn create_mounter<F, R>(&self, id: &str, mounter: F) -> Result<MountDescriptor, BehaviorError>
	where
		F: Fn(&Element) -> R + 'static,
		R: IntoHandlerResult,
	{
		let mounter: Rc<MountFn> =
			Rc::new(move |element: &Element| mounter(element).into_handler_result());
		self.registry.create(id, mounter)
	}

	/// Returns whether `element` has been processed.
	pub fn is_processed(&self, element: &Element) -> bool {
		self.processed.contains(element)
	}

	/// Runs the mounters listed on `element`, then strips the mount attribute.
	///
	/// Returns `false` without doing anything when the element was processed
	/// before, has no mount attribute or is not connected. A failing mounter is
	/// logged and skips the element's remaining mounters; the element is marked
	/// and its attribute stripped regardless.
	pub fn process(&self, element: &Element) -> bool {
		if self.processed.contains(element) {
			return false;
		}
		let attribute = self.registry.attribute();
		if !element.has_attribute(attribute) || !element.is_connected() {
			return false;
		}

		// Marked up front so mounters that re-enter processing skip this element.
		self.processed.insert(element);
		let mounters = self.registry.iter(element);
		let _strip = scopeguard::guard((), |()| {
			if let Err(error) = element.remove_attribute(attribute) {
				warn_log!("failed to remove '{}': {}", attribute, error);
			}
		});

		for (id, mounter) in mounters {
			if let Err(error) = mounter(element) {
				error_log!("mounter '{}' failed: {}", id, error);
				break;
			}
		}
		true
	}

	/// Processes the root element, if any, and then every descendant still
	/// carrying the mount attribute, in document order.
	///
	/// Returns the number of elements processed.
	pub fn process_root(&self, root: impl Into<Root>) -> usize {
		let root = root.into();
		let mut processed = 0;
		if let Some(element) = root.element() {
			processed += usize::from(self.process(element));
		}
		for element in root.query_all_with_attribute(self.attribute_name()) {
			processed += usize::from(self.process(&element));
		}
		debug_log!("processed {} mount element(s)", processed);
		processed
	}

	/// Schedules `process_root(document)` for the next animation frame.
	///
	/// Returns `false` when a frame is already pending for `document`. Once
	/// requested, the batched run always executes; the pending entry is cleared
	/// before it starts, so mounters may schedule again.
	pub fn schedule_process_root(self: &Rc<Self>, document: &Document) -> Result<bool, BehaviorError> {
		if self.is_scheduled(document) {
			return Ok(false);
		}
		let processor = Rc::downgrade(self);
		let target = document.clone();
		document.request_animation_frame(Box::new(move || {
			if let Some(processor) = processor.upgrade() {
				processor.clear_pending(&target);
				processor.process_root(&target);
			}
		}))?;
		self.pending.borrow_mut().push(document.clone());
		Ok(true)
	}

	/// Returns whether a batched run is pending for `document`.
	pub fn is_scheduled(&self, document: &Document) -> bool {
		self.pending
			.borrow()
			.iter()
			.any(|pending| pending == document)
	}

	fn clear_pending(&self, document: &Document) {
		self.pending.borrow_mut().retain(|queued| queued != document);
	}
}
