//! # Tessel
//!
//! Attribute-encoded DOM behaviors for Rust and WebAssembly.
//!
//! Tessel attaches behavior to markup through `data-t-*` attributes that list
//! registered handler ids. The same attributes work whether the markup was built
//! by a client renderer or streamed from a server template.
//!
//! ## Crates
//!
//! - [`dom`]: the DOM surface. `web-sys` on wasm, a headless document elsewhere
//! - [`behaviors`]: registries, delegated events, mounters and visibility hooks
//!
//! ## Example
//!
//! ```rust,ignore
//! use tessel::prelude::*;
//!
//! let open = create_handler("click", "menu__open", |event: &DelegatedEvent| {
//!     event.stop_propagation();
//! })?;
//! let init = create_mounter("menu__init", |menu: &Element| {
//!     menu.set_attribute("role", "menu")
//! })?;
//!
//! let props = AttrProps::new().attach(&open).attach(&init);
//! props.apply_to(&element)?;
//! schedule_process_root(&document)?;
//! ```

pub use tessel_behaviors as behaviors;
pub use tessel_dom as dom;

pub use tessel_behaviors::{
	AsHandlerId, Attachable, AttrProps, BehaviorError, CallbackRegistry, DEFAULT_ATTRIBUTE_PREFIX,
	DelegatedEvent, Descriptor, EventDelegator, EventDescriptor, HandlerError, HandlerId,
	HandlerResult, IdList, IntoHandlerResult, MountDescriptor, MountProcessor, Phase, Runtime,
	RuntimeConfig, VisibilityDescriptor, VisibilityRunner, create_after_hide_callback,
	create_before_show_callback, create_handler, create_mounter, observe, process, process_root,
	run_after_hide_callbacks, run_before_show_callbacks, runtime, schedule_process_root,
};
pub use tessel_behaviors::{debug_log, error_log, info_log, warn_log};
pub use tessel_dom::{Document, DomError, Element, Event};

/// Commonly used items.
pub mod prelude {
	pub use crate::{
		AttrProps, BehaviorError, DelegatedEvent, Descriptor, Document, Element, Event,
		HandlerResult, Runtime, RuntimeConfig, create_after_hide_callback,
		create_before_show_callback, create_handler, create_mounter, observe, process_root,
		run_after_hide_callbacks, run_before_show_callbacks, schedule_process_root,
	};
}
