//! Error types for behavior registration and processing.

use tessel_dom::DomError;

/// Errors returned by registries, the dispatcher, the mount processor and config.
#[derive(Debug, thiserror::Error)]
pub enum BehaviorError {
	/// Handler ids are space-delimited in attributes, so they must be non-empty
	/// and free of whitespace.
	#[error("invalid handler id {0:?}: ids must be non-empty and contain no whitespace")]
	InvalidHandlerId(String),
	/// Event types become part of an attribute name.
	#[error("invalid event type {0:?}")]
	InvalidEventType(String),
	/// The id is already registered (only raised by `create_unique`).
	#[error("handler id '{id}' is already registered on '{attribute}'")]
	AlreadyRegistered {
		/// The conflicting id.
		id: String,
		/// The registry's attribute.
		attribute: String,
	},
	/// The runtime configuration is invalid.
	#[error("invalid configuration: {0}")]
	Config(String),
	/// The runtime configuration could not be parsed.
	#[error("failed to parse configuration: {0}")]
	ConfigParse(#[from] serde_json::Error),
	/// The DOM rejected an operation.
	#[error(transparent)]
	Dom(#[from] DomError),
}

/// Error produced by a behavior handler.
pub type HandlerError = Box<dyn std::error::Error + 'static>;

/// Result of running a behavior handler.
pub type HandlerResult = Result<(), HandlerError>;

/// Conversion from a handler's return value into a [`HandlerResult`].
///
/// Lets handlers return either `()` or `Result<(), E>` for any error that converts
/// into a boxed error (including `&str` and `String`).
///
/// ## Example
///
/// ```ignore
/// create_handler("click", "menu__close", |event| {
///     event.stop_propagation();
/// })?;
///
/// create_mounter("chart__draw", |element| -> Result<(), String> {
///     let data = element.get_attribute("data-points").ok_or("missing data-points")?;
///     draw(element, &data);
///     Ok(())
/// })?;
/// ```
pub trait IntoHandlerResult {
	/// Converts `self` into a [`HandlerResult`].
	fn into_handler_result(self) -> HandlerResult;
}

impl IntoHandlerResult for () {
	fn into_handler_result(self) -> HandlerResult {
		Ok(())
	}
}

impl<E> IntoHandlerResult for Result<(), E>
where
	E: Into<HandlerError>,
{
	fn into_handler_result(self) -> HandlerResult {
		self.map_err(Into::into)
	}
}
