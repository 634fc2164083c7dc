//! Tessel Behaviors - attribute-encoded DOM behaviors
//!
//! Behaviors are plain Rust functions registered once under a stable id. Elements
//! opt into a behavior by listing its id in an attribute, so markup produced by a
//! client renderer and markup produced by a server template work the same way, with
//! no hydration step tying functions to nodes.
//!
//! ## Features
//!
//! - **Delegated events**: one document listener per event type replays native
//!   bubble order, `stopPropagation` and `stopImmediatePropagation`
//! - **Mounters**: one-shot initializers that run exactly once per element, even
//!   when a renderer re-adds the attribute
//! - **Visibility hooks**: before-show / after-hide callbacks that skip subtrees
//!   hidden by `aria-hidden`, closed dialogs and closed popovers
//! - **Props composition**: merge ids from several registries into one attribute map
//!
//! ## Architecture
//!
//! - [`codec`]: the space-delimited id list stored in attributes
//! - [`registry`]: id → handler maps, one per attribute
//! - [`props`]: attribute maps built from descriptors
//! - [`events`]: delegated event dispatch
//! - [`mount`]: the mount processor and its frame scheduler
//! - [`visibility`]: boundary-aware visibility callbacks
//! - [`runtime`]: the per-thread default runtime and free functions
//! - [`config`]: attribute prefix and diagnostics settings
//!
//! ## Example
//!
//! ```ignore
//! use tessel_behaviors::{AttrProps, create_handler, create_mounter};
//!
//! let toggle = create_handler("click", "disclosure__toggle", |event| {
//!     let Some(button) = event.current_target() else { return Ok(()) };
//!     let expanded = button.get_attribute("aria-expanded").as_deref() == Some("true");
//!     button.set_attribute("aria-expanded", if expanded { "false" } else { "true" })
//! })?;
//! let init = create_mounter("disclosure__init", |button| {
//!     button.set_attribute("aria-expanded", "false")
//! })?;
//!
//! let props = AttrProps::new().attach(&toggle).attach(&init);
//! // {"data-t-mount": "disclosure__init", "data-t-on-click": "disclosure__toggle"}
//! ```

#![warn(missing_docs)]

pub mod codec;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod mount;
pub mod props;
pub mod registry;
pub mod runtime;
pub mod visibility;

pub use codec::IdList;
pub use config::{DEFAULT_ATTRIBUTE_PREFIX, RuntimeConfig};
pub use error::{BehaviorError, HandlerError, HandlerResult, IntoHandlerResult};
pub use events::{DelegatedEvent, EventDelegator, EventDescriptor, EventHandlerFn, Phase};
pub use mount::{MountDescriptor, MountFn, MountProcessor};
pub use props::{Attachable, AttrProps};
pub use registry::{AsHandlerId, CallbackRegistry, Descriptor, HandlerId};
pub use runtime::{
	Runtime, create_after_hide_callback, create_before_show_callback, create_handler,
	create_mounter, observe, process, process_root, run_after_hide_callbacks,
	run_before_show_callbacks, runtime, schedule_process_root,
};
pub use visibility::{VisibilityDescriptor, VisibilityFn, VisibilityRunner};

#[doc(hidden)]
pub mod __private {
	pub use tracing;
	#[cfg(target_arch = "wasm32")]
	pub use web_sys;
}
