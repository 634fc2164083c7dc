//! Visibility Boundary Runner
//!
//! Before-show and after-hide callbacks let widgets react when a container is
//! about to become visible or has just been hidden (a dialog opening, a popover
//! closing, a panel losing `aria-hidden`). The code flipping visibility calls the
//! matching `run_*` function on the container; callbacks run on the container
//! itself and on every descendant that is not hidden by another boundary inside
//! the container.
//!
//! A boundary is an element matching
//! [`HIDDEN_BOUNDARY_SELECTOR`](tessel_dom::HIDDEN_BOUNDARY_SELECTOR):
//! `aria-hidden="true"`, a dialog that is not modal, or a popover that is not open.

use std::rc::Rc;

use tessel_dom::Element;

use crate::config::RuntimeConfig;
use crate::error::{BehaviorError, HandlerResult, IntoHandlerResult};
use crate::registry::{CallbackRegistry, Descriptor};
use crate::error_log;

/// Function type of a visibility callback: `(element, container)`.
pub type VisibilityFn = dyn Fn(&Element, &Element) -> HandlerResult;

/// Registry of visibility callbacks.
pub type VisibilityRegistry = CallbackRegistry<VisibilityFn>;

/// Descriptor returned by the visibility `create_*` functions.
pub type VisibilityDescriptor = Descriptor<VisibilityFn>;

/// Owns the before-show and after-hide registries.
#[derive(Debug)]
pub struct VisibilityRunner {
	before_show: Rc<VisibilityRegistry>,
	after_hide: Rc<VisibilityRegistry>,
}

impl VisibilityRunner {
	/// Creates a runner reading `config`'s visibility attributes.
	pub fn new(config: &RuntimeConfig) -> Self {
		let registry = |attribute: String| -> Rc<VisibilityRegistry> {
			Rc::new(
				CallbackRegistry::new(attribute)
					.with_duplicate_warnings(config.warn_on_duplicate_ids),
			)
		};
		Self {
			before_show: registry(config.before_show_attribute()),
			after_hide: registry(config.after_hide_attribute()),
		}
	}

	/// Returns the before-show registry.
	pub fn before_show_registry(&self) -> &Rc<VisibilityRegistry> {
		&self.before_show
	}

	/// Returns the after-hide registry.
	pub fn after_hide_registry(&self) -> &Rc<VisibilityRegistry> {
		&self.after_hide
	}

	/// Registers a callback run before a container is shown.
	pub fn create_before_show_callback<F, R>(
		&self,
		id: &str,
		callback: F,
	) -> Result<VisibilityDescriptor, BehaviorError>
	where
		F: Fn(&Element, &Element) -> R + 'static,
		R: IntoHandlerResult,
	{
		self.before_show.create(id, wrap(callback))
	}

	/// Registers a callback run after a container is hidden.
	pub fn create_after_hide_callback<F, R>(
		&self,
		id: &str,
		callback: F,
	) -> Result<VisibilityDescriptor, BehaviorError>
	where
		F: Fn(&Element, &Element) -> R + 'static,
		R: IntoHandlerResult,
	{
		self.after_hide.create(id, wrap(callback))
	}

	/// Runs before-show callbacks for `container`. Returns the number run.
	pub fn run_before_show_callbacks(&self, container: &Element) -> usize {
		run_callbacks(&self.before_show, container)
	}

	/// Runs after-hide callbacks for `container`. Returns the number run.
	pub fn run_after_hide_callbacks(&self, container: &Element) -> usize {
		run_callbacks(&self.after_hide, container)
	}
}

fn wrap<F, R>(callback: F) -> Rc<VisibilityFn>
where
	F: Fn(&Element, &Element) -> R + 'static,
	R: IntoHandlerResult,
{
	Rc::new(move |element: &Element, container: &Element| {
		callback(element, container).into_handler_result()
	})
}

/// Returns whether a hidden boundary strictly inside `container` hides `element`.
pub fn is_hidden_within(element: &Element, container: &Element) -> bool {
	match element.closest_hidden_boundary() {
		Some(boundary) => boundary != *container && container.contains(&boundary),
		None => false,
	}
}

fn run_callbacks(registry: &VisibilityRegistry, container: &Element) -> usize {
	let mut count = invoke(registry, container, container);
	for element in container.query_all_with_attribute(registry.attribute()) {
		if is_hidden_within(&element, container) {
			continue;
		}
		count += invoke(registry, &element, container);
	}
	count
}

fn invoke(registry: &VisibilityRegistry, element: &Element, container: &Element) -> usize {
	let callbacks = registry.iter(element);
	for (id, callback) in &callbacks {
		if let Err(error) = callback(element, container) {
			error_log!("'{}' callback '{}' failed: {}", registry.attribute(), id, error);
		}
	}
	callbacks.len()
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::cell::RefCell;
	use tessel_dom::Document;

	struct Fixture {
		document: Document,
		runner: VisibilityRunner,
		log: Rc<RefCell<Vec<String>>>,
	}

	impl Fixture {
		fn new() -> Self {
			let runner = VisibilityRunner::new(&RuntimeConfig::default());
			let log = Rc::new(RefCell::new(Vec::new()));
			{
				let log = Rc::clone(&log);
				runner
					.create_before_show_callback("record", move |element: &Element, _: &Element| {
						let name = element.get_attribute("id").unwrap_or_default();
						log.borrow_mut().push(name);
					})
					.unwrap();
			}
			Self {
				document: Document::new(),
				runner,
				log,
			}
		}

		fn child(&self, parent: &Element, tag: &str, id: &str) -> Element {
			let element = self.document.create_element(tag);
			element.set_attribute("id", id).unwrap();
			element.set_attribute("data-t-before-show", "record").unwrap();
			parent.append_child(&element).unwrap();
			element
		}

		fn seen(&self) -> Vec<String> {
			self.log.borrow_mut().drain(..).collect()
		}
	}

	#[rstest]
	fn test_runs_container_then_descendants() {
		let fixture = Fixture::new();
		let container = fixture.child(&fixture.document.body().unwrap(), "section", "container");
		let inner = fixture.child(&container, "div", "inner");
		fixture.child(&inner, "span", "leaf");

		assert_eq!(fixture.runner.run_before_show_callbacks(&container), 3);
		assert_eq!(fixture.seen(), vec!["container", "inner", "leaf"]);
	}

	#[rstest]
	#[case::aria_hidden("div", true)]
	#[case::closed_dialog("dialog", false)]
	#[case::closed_popover("div", false)]
	fn test_skips_behind_inner_boundary(#[case] tag: &str, #[case] aria: bool) {
		let fixture = Fixture::new();
		let container = fixture.child(&fixture.document.body().unwrap(), "section", "container");
		let boundary = fixture.child(&container, tag, "boundary");
		if aria {
			boundary.set_attribute("aria-hidden", "true").unwrap();
		} else if tag != "dialog" {
			boundary.set_attribute("popover", "").unwrap();
		}
		fixture.child(&boundary, "span", "hidden");
		fixture.child(&container, "span", "visible");

		fixture.runner.run_before_show_callbacks(&container);
		assert_eq!(fixture.seen(), vec!["container", "visible"]);
	}

	#[rstest]
	fn test_open_dialog_and_popover_are_not_boundaries() {
		let fixture = Fixture::new();
		let container = fixture.child(&fixture.document.body().unwrap(), "section", "container");
		let dialog = fixture.child(&container, "dialog", "dialog");
		dialog.show_modal().unwrap();
		fixture.child(&dialog, "span", "in-dialog");
		let popover = fixture.child(&container, "div", "popover");
		popover.set_attribute("popover", "").unwrap();
		popover.show_popover().unwrap();
		fixture.child(&popover, "span", "in-popover");

		fixture.runner.run_before_show_callbacks(&container);
		assert_eq!(
			fixture.seen(),
			vec!["container", "dialog", "in-dialog", "popover", "in-popover"]
		);
	}

	#[rstest]
	fn test_container_boundary_does_not_hide_its_own_subtree() {
		let fixture = Fixture::new();
		let container = fixture.child(&fixture.document.body().unwrap(), "dialog", "dialog");
		fixture.child(&container, "span", "content");

		// A closed dialog is a boundary, but it is the container being shown
		fixture.runner.run_before_show_callbacks(&container);
		assert_eq!(fixture.seen(), vec!["dialog", "content"]);
	}

	#[rstest]
	fn test_boundary_above_container_is_ignored() {
		let fixture = Fixture::new();
		let hidden = fixture.child(&fixture.document.body().unwrap(), "div", "outer");
		hidden.set_attribute("aria-hidden", "true").unwrap();
		let container = fixture.child(&hidden, "section", "container");
		fixture.child(&container, "span", "content");

		fixture.runner.run_before_show_callbacks(&container);
		assert_eq!(fixture.seen(), vec!["container", "content"]);
	}

	#[rstest]
	fn test_failing_callback_is_isolated() {
		let fixture = Fixture::new();
		fixture
			.runner
			.create_before_show_callback("broken", |_: &Element, _: &Element| -> Result<(), String> {
				Err("boom".to_string())
			})
			.unwrap();
		let container = fixture.child(&fixture.document.body().unwrap(), "section", "container");
		container
			.set_attribute("data-t-before-show", "broken record")
			.unwrap();
		fixture.child(&container, "span", "content");

		assert_eq!(fixture.runner.run_before_show_callbacks(&container), 3);
		assert_eq!(fixture.seen(), vec!["container", "content"]);
	}

	#[rstest]
	fn test_after_hide_receives_container() {
		let document = Document::new();
		let runner = VisibilityRunner::new(&RuntimeConfig::default());
		let seen = Rc::new(RefCell::new(Vec::new()));
		{
			let seen = Rc::clone(&seen);
			runner
				.create_after_hide_callback("reset", move |element: &Element, container: &Element| {
					seen.borrow_mut().push((element.clone(), container.clone()));
				})
				.unwrap();
		}
		let panel = document.create_element("div");
		let field = document.create_element("input");
		field.set_attribute("data-t-after-hide", "reset").unwrap();
		document.body().unwrap().append_child(&panel).unwrap();
		panel.append_child(&field).unwrap();

		assert_eq!(runner.run_before_show_callbacks(&panel), 0);
		assert_eq!(runner.run_after_hide_callbacks(&panel), 1);
		assert_eq!(*seen.borrow(), vec![(field, panel)]);
	}
}
