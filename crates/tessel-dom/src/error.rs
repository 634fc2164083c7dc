//! Errors raised by DOM operations.

/// Error returned when the underlying DOM rejects an operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
	/// No `window` is reachable from the document (e.g. a detached document).
	#[error("no window available for this document")]
	NoWindow,
	/// No document is reachable from the current global scope.
	#[error("no document available")]
	NoDocument,
	/// An attribute name the DOM refuses (empty, or containing whitespace).
	#[error("invalid attribute name: {0:?}")]
	InvalidAttributeName(String),
	/// The nodes involved belong to different documents.
	#[error("node belongs to a different document")]
	WrongDocument,
	/// Inserting the node would make it its own ancestor.
	#[error("cannot insert a node into its own subtree")]
	Hierarchy,
	/// The object is not in a state that allows the operation.
	#[error("invalid state: {0}")]
	InvalidState(String),
	/// An exception thrown by the JavaScript host.
	#[error("javascript error: {0}")]
	Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for DomError {
	fn from(value: wasm_bindgen::JsValue) -> Self {
		let message = value
			.as_string()
			.or_else(|| {
				js_sys::Reflect::get(&value, &"message".into())
					.ok()
					.and_then(|message| message.as_string())
			})
			.unwrap_or_else(|| format!("{:?}", value));
		Self::Js(message)
	}
}
