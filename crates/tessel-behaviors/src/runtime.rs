//! Behavior Runtime
//!
//! A [`Runtime`] bundles the event delegator, the mount processor and the
//! visibility runner built from one [`RuntimeConfig`]. Most applications use the
//! per-thread default runtime through the free functions of this module; separate
//! runtimes are useful for tests and for embedding with a different attribute
//! prefix.
//!
//! ## Bootstrapping
//!
//! ```ignore
//! use tessel_behaviors::runtime;
//!
//! // wasm: the default runtime already observes the current document
//! runtime::process_root(&document);
//!
//! // native or custom runtimes
//! let runtime = Runtime::new(RuntimeConfig::default())?;
//! runtime.boot(&document)?;
//! ```

use std::rc::Rc;

use tessel_dom::{Document, Element, Root};

use crate::config::RuntimeConfig;
use crate::error::{BehaviorError, IntoHandlerResult};
use crate::events::{DelegatedEvent, EventDelegator, EventDescriptor};
use crate::mount::{MountDescriptor, MountProcessor};
use crate::visibility::{VisibilityDescriptor, VisibilityRunner};

/// The delegator, mount processor and visibility runner of one configuration.
#[derive(Debug)]
pub struct Runtime {
	config: RuntimeConfig,
	events: EventDelegator,
	mounts: Rc<MountProcessor>,
	visibility: VisibilityRunner,
}

impl Runtime {
	/// Validates `config` and builds a runtime.
	pub fn new(config: RuntimeConfig) -> Result<Self, BehaviorError> {
		config.validate()?;
		Ok(Self::build(config))
	}

	fn build(config: RuntimeConfig) -> Self {
		Self {
			events: EventDelegator::new(&config),
			mounts: Rc::new(MountProcessor::new(&config)),
			visibility: VisibilityRunner::new(&config),
			config,
		}
	}

	/// Returns the configuration.
	pub fn config(&self) -> &RuntimeConfig {
		&self.config
	}

	/// Returns the event delegator.
	pub fn events(&self) -> &EventDelegator {
		&self.events
	}

	/// Returns the mount processor.
	pub fn mounts(&self) -> &Rc<MountProcessor> {
		&self.mounts
	}

	/// Returns the visibility runner.
	pub fn visibility(&self) -> &VisibilityRunner {
		&self.visibility
	}

	/// Starts delegating events of `document`.
	pub fn observe(&self, document: &Document) -> Result<(), BehaviorError> {
		self.events.observe(document)
	}

	/// Observes `document` and processes its mount attributes once.
	///
	/// Returns the number of elements processed.
	pub fn boot(&self, document: &Document) -> Result<usize, BehaviorError> {
		self.observe(document)?;
		Ok(self.mounts.process_root(document))
	}

	/// See [`EventDelegator::create_handler`].
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
		self.events.create_handler(event_type, id, handler)
	}

	/// See [`MountProcessor::create_mounter`].
	pub fn create_mounter<F, R>(&self, id: &str, mounter: F) -> Result<MountDescriptor, BehaviorError>
	where
		F: Fn(&Element) -> R + 'static,
		R: IntoHandlerResult,
	{
		self.mounts.create_mounter(id, mounter)
	}

	/// See [`VisibilityRunner::create_before_show_callback`].
	pub fn create_before_show_callback<F, R>(
		&self,
		id: &str,
		callback: F,
	) -> Result<VisibilityDescriptor, BehaviorError>
	where
		F: Fn(&Element, &Element) -> R + 'static,
		R: IntoHandlerResult,
	{
		self.visibility.create_before_show_callback(id, callback)
	}

	/// See [`VisibilityRunner::create_after_hide_callback`].
	pub fn create_after_hide_callback<F, R>(
		&self,
		id: &str,
		callback: F,
	) -> Result<VisibilityDescriptor, BehaviorError>
	where
		F: Fn(&Element, &Element) -> R + 'static,
		R: IntoHandlerResult,
	{
		self.visibility.create_after_hide_callback(id, callback)
	}

	/// See [`MountProcessor::process`].
	pub fn process(&self, element: &Element) -> bool {
		self.mounts.process(element)
	}

	/// See [`MountProcessor::process_root`].
	pub fn process_root(&self, root: impl Into<Root>) -> usize {
		self.mounts.process_root(root)
	}

	/// See [`MountProcessor::schedule_process_root`].
	pub fn schedule_process_root(&self, document: &Document) -> Result<bool, BehaviorError> {
		self.mounts.schedule_process_root(document)
	}

	/// See [`VisibilityRunner::run_before_show_callbacks`].
	pub fn run_before_show_callbacks(&self, container: &Element) -> usize {
		self.visibility.run_before_show_callbacks(container)
	}

	/// See [`VisibilityRunner::run_after_hide_callbacks`].
	pub fn run_after_hide_callbacks(&self, container: &Element) -> usize {
		self.visibility.run_after_hide_callbacks(container)
	}
}

impl Default for Runtime {
	fn default() -> Self {
		Self::build(RuntimeConfig::default())
	}
}

thread_local! {
	static RUNTIME: Rc<Runtime> = default_runtime();
}

#[cfg(target_arch = "wasm32")]
fn default_runtime() -> Rc<Runtime> {
	let runtime = Runtime::default();
	match Document::current() {
		Ok(document) => {
			if let Err(error) = runtime.observe(&document) {
				crate::error_log!("failed to observe the current document: {}", error);
			}
		}
		Err(error) => crate::warn_log!("no document to observe: {}", error),
	}
	Rc::new(runtime)
}

#[cfg(not(target_arch = "wasm32"))]
fn default_runtime() -> Rc<Runtime> {
	Rc::new(Runtime::default())
}

/// Returns this thread's default runtime.
pub fn runtime() -> Rc<Runtime> {
	RUNTIME.with(Rc::clone)
}

/// Registers an event handler on the default runtime.
pub fn create_handler<F, R>(event_type: &str, id: &str, handler: F) -> Result<EventDescriptor, BehaviorError>
where
	F: Fn(&DelegatedEvent) -> R + 'static,
	R: IntoHandlerResult,
{
	runtime().create_handler(event_type, id, handler)
}

/// Registers a mounter on the default runtime.
pub fn create_mounter<F, R>(id: &str, mounter: F) -> Result<MountDescriptor, BehaviorError>
where
	F: Fn(&Element) -> R + 'static,
	R: IntoHandlerResult,
{
	runtime().create_mounter(id, mounter)
}

/// Registers a before-show callback on the default runtime.
pub fn create_before_show_callback<F, R>(id: &str, callback: F) -> Result<VisibilityDescriptor, BehaviorError>
where
	F: Fn(&Element, &Element) -> R + 'static,
	R: IntoHandlerResult,
{
	runtime().create_before_show_callback(id, callback)
}

/// Registers an after-hide callback on the default runtime.
pub fn create_after_hide_callback<F, R>(id: &str, callback: F) -> Result<VisibilityDescriptor, BehaviorError>
where
	F: Fn(&Element, &Element) -> R + 'static,
	R: IntoHandlerResult,
{
	runtime().create_after_hide_callback(id, callback)
}

/// Starts delegating events of `document` on the default runtime.
pub fn observe(document: &Document) -> Result<(), BehaviorError> {
	runtime().observe(document)
}

/// Runs mounters for one element on the default runtime.
pub fn process(element: &Element) -> bool {
	runtime().process(element)
}

/// Processes a document or subtree on the default runtime.
pub fn process_root(root: impl Into<Root>) -> usize {
	runtime().process_root(root)
}

/// Schedules a batched `process_root(document)` on the default runtime.
pub fn schedule_process_root(document: &Document) -> Result<bool, BehaviorError> {
	runtime().schedule_process_root(document)
}

/// Runs before-show callbacks on the default runtime.
pub fn run_before_show_callbacks(container: &Element) -> usize {
	runtime().run_before_show_callbacks(container)
}

/// Runs after-hide callbacks on the default runtime.
pub fn run_after_hide_callbacks(container: &Element) -> usize {
	runtime().run_after_hide_callbacks(container)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::cell::Cell;
	use tessel_dom::Event;

	#[rstest]
	fn test_new_rejects_invalid_config() {
		let result = Runtime::new(RuntimeConfig::new().with_attribute_prefix("t-"));
		assert!(matches!(result, Err(BehaviorError::Config(_))));
	}

	#[rstest]
	fn test_custom_prefix_flows_into_attributes() {
		let runtime = Runtime::new(RuntimeConfig::new().with_attribute_prefix("data-ui-")).unwrap();
		assert_eq!(runtime.events().attribute_name("click"), "data-ui-on-click");
		assert_eq!(runtime.mounts().attribute_name(), "data-ui-mount");
		assert_eq!(
			runtime.visibility().before_show_registry().attribute(),
			"data-ui-before-show"
		);
		assert_eq!(
			runtime.visibility().after_hide_registry().attribute(),
			"data-ui-after-hide"
		);
	}

	#[rstest]
	fn test_boot_observes_and_processes() {
		let document = Document::new();
		let runtime = Runtime::default();
		let mounted = Rc::new(Cell::new(0));
		let clicked = Rc::new(Cell::new(0));
		{
			let mounted = Rc::clone(&mounted);
			runtime
				.create_mounter("init", move |_: &Element| mounted.set(mounted.get() + 1))
				.unwrap();
			let clicked = Rc::clone(&clicked);
			runtime
				.create_handler("click", "press", move |_: &DelegatedEvent| clicked.set(clicked.get() + 1))
				.unwrap();
		}
		let button = document.create_element("button");
		button.set_attribute("data-t-mount", "init").unwrap();
		button.set_attribute("data-t-on-click", "press").unwrap();
		document.body().unwrap().append_child(&button).unwrap();

		assert_eq!(runtime.boot(&document).unwrap(), 1);
		assert_eq!(runtime.boot(&document).unwrap(), 0);
		button.dispatch_event(&Event::new("click")).unwrap();

		assert_eq!(mounted.get(), 1);
		assert_eq!(clicked.get(), 1);
		assert_eq!(document.listener_count("click"), 1);
	}

	#[rstest]
	fn test_free_functions_share_the_default_runtime() {
		let document = Document::new();
		observe(&document).unwrap();
		let count = Rc::new(Cell::new(0));
		{
			let count = Rc::clone(&count);
			create_handler("dblclick", "runtime_test__count", move |_: &DelegatedEvent| {
				count.set(count.get() + 1)
			})
			.unwrap();
		}
		let target = document.create_element("div");
		target
			.set_attribute("data-t-on-dblclick", "runtime_test__count")
			.unwrap();
		document.body().unwrap().append_child(&target).unwrap();

		target.dispatch_event(&Event::new("dblclick")).unwrap();
		assert_eq!(count.get(), 1);
		assert!(Rc::ptr_eq(&runtime(), &runtime()));
		assert!(runtime().events().is_observing(&document));
	}

	#[rstest]
	fn test_default_runtime_is_per_thread() {
		create_mounter("thread_test__init", |_: &Element| {}).unwrap();
		assert!(runtime().mounts().registry().contains("thread_test__init"));

		let seen_elsewhere = std::thread::spawn(|| {
			runtime().mounts().registry().contains("thread_test__init")
		})
		.join()
		.unwrap();
		assert!(!seen_elsewhere);
	}

	#[rstest]
	fn test_default_matches_validated_new() {
		let built = Runtime::new(RuntimeConfig::default()).unwrap();
		let defaulted = Runtime::default();
		assert_eq!(built.config(), defaulted.config());
		assert_eq!(built.mounts().attribute_name(), defaulted.mounts().attribute_name());
	}
}
