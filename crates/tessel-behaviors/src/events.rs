//! Delegated Events
//!
//! Handlers are registered per event type and attached to elements by id through
//! the `<prefix>on-<type>` attribute. Instead of one native listener per element,
//! each observed document gets exactly one listener per event type, created the
//! first time the type is used. On dispatch, that listener replays the event along
//! `composedPath()` and runs the handlers found on each element, innermost first.
//!
//! ## Features
//!
//! - **Bubble order**: a descendant's handlers all run before an ancestor's
//! - **Propagation control**: [`DelegatedEvent::stop_propagation`] finishes the
//!   current element, [`DelegatedEvent::stop_immediate_propagation`] stops at once
//! - **`current_target`**: handlers see the element that carries their id
//! - **Non-bubbling events**: `toggle`, `close`, `focusin` and friends are
//!   observed in the capture phase and replayed the same way
//! - **Per-element events**: `focus`, `mouseenter` and other events the browser
//!   fires on each element separately only run the target's handlers
//!
//! ## Usage
//!
//! ```ignore
//! use tessel_behaviors::{AttrProps, create_handler};
//!
//! let close = create_handler("click", "menu__close", |event| {
//!     if let Some(menu) = event.current_target() {
//!         menu.set_attribute("aria-hidden", "true")?;
//!     }
//!     Ok::<_, tessel_dom::DomError>(())
//! })?;
//!
//! AttrProps::new().attach(&close).apply_to(&button)?;
//! ```

mod delegated;
mod delegator;
mod phase;

pub use delegated::DelegatedEvent;
pub use delegator::{EventDelegator, EventDescriptor, EventHandlerFn, EventRegistry, dispatch};
pub use phase::{Phase, phase_for, validate_event_type};
