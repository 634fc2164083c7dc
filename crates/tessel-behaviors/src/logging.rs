//! Logging abstraction layer for tessel behaviors
//!
//! These macros work across WASM and native targets. In the browser they write to
//! the developer console; natively they forward to `tracing`, so servers and tests
//! pick the output up through whatever subscriber they install.
//!
//! ## Macro Overview
//!
//! | Macro | WASM | Native |
//! |-------|------|--------|
//! | `debug_log!` | `console.debug` (`debug-hooks` + debug assertions) | `tracing::debug!` |
//! | `info_log!` | `console.info` (debug assertions) | `tracing::info!` |
//! | `warn_log!` | `console.warn` (debug assertions) | `tracing::warn!` |
//! | `error_log!` | `console.error` (always) | `tracing::error!` |
//!
//! `error_log!` stays on in release builds: it reports failing behavior handlers,
//! which should be loud.
//!
//! ## Example
//!
//! ```ignore
//! use tessel_behaviors::{error_log, warn_log};
//!
//! warn_log!("handler id '{}' registered twice", id);
//! error_log!("mounter '{}' failed: {}", id, error);
//! ```

/// Logs a debug message
#[macro_export]
#[cfg(all(debug_assertions, feature = "debug-hooks", target_arch = "wasm32"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::__private::web_sys::console::debug_1(&format!($($arg)*).into());
	}};
}

/// No-op debug_log when conditions are not met
#[macro_export]
#[cfg(all(
	target_arch = "wasm32",
	not(all(debug_assertions, feature = "debug-hooks"))
))]
macro_rules! debug_log {
	($($arg:tt)*) => {{}};
}

/// Logs a debug message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::debug!($($arg)*);
	}};
}

/// Logs an info message (requires `debug_assertions` on wasm)
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::__private::web_sys::console::info_1(&format!($($arg)*).into());
	}};
}

/// No-op info_log in release wasm builds
#[macro_export]
#[cfg(all(not(debug_assertions), target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{}};
}

/// Logs an info message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::info!($($arg)*);
	}};
}

/// Logs a warning message (requires `debug_assertions` on wasm)
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::__private::web_sys::console::warn_1(&format!($($arg)*).into());
	}};
}

/// No-op warn_log in release wasm builds
#[macro_export]
#[cfg(all(not(debug_assertions), target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{}};
}

/// Logs a warning message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::warn!($($arg)*);
	}};
}

/// Logs an error message
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::__private::web_sys::console::error_1(&format!($($arg)*).into());
	}};
}

/// Logs an error message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::error!($($arg)*);
	}};
}
