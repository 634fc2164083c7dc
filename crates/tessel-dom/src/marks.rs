//! Out-of-band element markers.
//!
//! An [`ElementMarks`] is a weak set of elements, kept outside the attribute
//! surface so renderers rewriting attributes cannot reset it. On wasm it is a
//! `WeakSet`; the headless document stores the mark on the node itself, so marks
//! go away with the node in both backends.

#[cfg(not(target_arch = "wasm32"))]
use std::sync::atomic::{AtomicU64, Ordering};

use crate::Element;

#[cfg(not(target_arch = "wasm32"))]
static NEXT_MARK: AtomicU64 = AtomicU64::new(1);

/// A side table recording which elements have been marked.
#[derive(Debug)]
pub struct ElementMarks {
	#[cfg(not(target_arch = "wasm32"))]
	key: u64,
	#[cfg(target_arch = "wasm32")]
	set: js_sys::WeakSet,
}

impl Default for ElementMarks {
	fn default() -> Self {
		Self::new()
	}
}

impl ElementMarks {
	/// Creates an empty side table.
	#[cfg(not(target_arch = "wasm32"))]
	pub fn new() -> Self {
		Self {
			key: NEXT_MARK.fetch_add(1, Ordering::Relaxed),
		}
	}

	/// Creates an empty side table.
	#[cfg(target_arch = "wasm32")]
	pub fn new() -> Self {
		Self {
			set: js_sys::WeakSet::new(),
		}
	}

	/// Returns whether `element` is marked.
	#[cfg(not(target_arch = "wasm32"))]
	pub fn contains(&self, element: &Element) -> bool {
		element.has_mark(self.key)
	}

	/// Returns whether `element` is marked.
	#[cfg(target_arch = "wasm32")]
	pub fn contains(&self, element: &Element) -> bool {
		self.set.has(element.as_raw().as_ref())
	}

	/// Marks `element`. Returns `false` if it was already marked.
	#[cfg(not(target_arch = "wasm32"))]
	pub fn insert(&self, element: &Element) -> bool {
		element.insert_mark(self.key)
	}

	/// Marks `element`. Returns `false` if it was already marked.
	#[cfg(target_arch = "wasm32")]
	pub fn insert(&self, element: &Element) -> bool {
		let object: &js_sys::Object = element.as_raw().as_ref();
		if self.set.has(object) {
			return false;
		}
		self.set.add(object);
		true
	}
}
