//! Tessel DOM - the DOM surface behaviors run against
//!
//! Tessel behaviors only need a handful of DOM capabilities: reading and writing
//! attributes, walking ancestors, querying attribute-carrying descendants, a
//! document-level listener per event type, `composedPath()`, and an animation
//! frame. This crate exposes exactly that surface with one API and two backends:
//!
//! - **web** (`wasm32`): thin wrappers around `web-sys` types.
//! - **memory** (every other target): a headless document used by tests and
//!   native tooling. It implements capture/bubble listener phases, composed paths,
//!   the `:modal` / `:popover-open` states, and a manual animation-frame queue.
//!
//! ## Architecture
//!
//! ```text
//! tessel-behaviors
//!        │
//!        ▼
//! Document / Element / Event / EventTarget / ElementMarks / Root
//!        │
//!        ├── wasm32 ──▶ web-sys (window.requestAnimationFrame, WeakSet, ...)
//!        └── native ──▶ memory (arena of nodes, frame queue)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use tessel_dom::Document;
//!
//! let document = Document::new();
//! let button = document.create_element("button");
//! button.set_attribute("data-t-on-click", "menu__close")?;
//! if let Some(body) = document.body() {
//!     body.append_child(&button)?;
//! }
//! assert_eq!(document.query_all_with_attribute("data-t-on-click"), vec![button]);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod marks;
pub mod root;

#[cfg(not(target_arch = "wasm32"))]
pub mod memory;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::DomError;
pub use marks::ElementMarks;
pub use root::Root;

#[cfg(not(target_arch = "wasm32"))]
pub use memory::{Document, Element, Event, EventInit, EventTarget, FrameCallback};

#[cfg(target_arch = "wasm32")]
pub use web::{Document, Element, Event, EventTarget, FrameCallback};

/// Selector matching elements that hide their subtree from lifecycle callbacks.
///
/// An element is a visibility boundary when it is explicitly ARIA-hidden, a dialog
/// that is not open as a modal, or a popover that is not showing.
pub const HIDDEN_BOUNDARY_SELECTOR: &str =
	r#"[aria-hidden="true"], dialog:not(:modal), [popover]:not(:popover-open)"#;

/// Handle returned by an animation frame request.
///
/// Mirrors the integer id returned by `window.requestAnimationFrame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

impl FrameHandle {
	/// Returns the raw frame id.
	pub fn id(self) -> i32 {
		self.0
	}
}
