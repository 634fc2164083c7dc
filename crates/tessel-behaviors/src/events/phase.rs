//! Listener phase selection.

use crate::error::BehaviorError;

/// How a document-level listener observes an event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
	/// Capture phase, replayed along the composed path. For events that never
	/// bubble to the document.
	Capture,
	/// Bubble phase, replayed along the composed path.
	Bubble,
	/// Capture phase, visiting only the event target. For events the browser
	/// fires separately on each element they concern.
	Target,
}

impl Phase {
	/// Returns the `useCapture` flag for `addEventListener`.
	pub fn is_capture(self) -> bool {
		matches!(self, Self::Capture | Self::Target)
	}

	/// Returns whether dispatch walks the ancestors of the target.
	pub fn walks_path(self) -> bool {
		!matches!(self, Self::Target)
	}
}

/// Returns the phase used to observe `event_type` at the document.
pub fn phase_for(event_type: &str) -> Phase {
	match event_type {
		// Non-bubbling events with one dispatch per occasion
		"toggle" | "beforetoggle" | "close" | "cancel" => Phase::Capture,
		"focusin" | "focusout" => Phase::Capture,
		"invalid" => Phase::Capture,
		// Fired on each element separately
		"focus" | "blur" => Phase::Target,
		"load" | "error" | "scroll" | "scrollend" => Phase::Target,
		"mouseenter" | "mouseleave" | "pointerenter" | "pointerleave" => Phase::Target,
		_ => Phase::Bubble,
	}
}

/// Checks that `event_type` can be used in an attribute name.
pub fn validate_event_type(event_type: &str) -> Result<(), BehaviorError> {
	let valid = !event_type.is_empty()
		&& event_type
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'));
	if valid {
		Ok(())
	} else {
		Err(BehaviorError::InvalidEventType(event_type.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("toggle", Phase::Capture)]
	#[case("beforetoggle", Phase::Capture)]
	#[case("focusin", Phase::Capture)]
	#[case("focusout", Phase::Capture)]
	#[case("close", Phase::Capture)]
	#[case("invalid", Phase::Capture)]
	#[case("cancel", Phase::Capture)]
	#[case("focus", Phase::Target)]
	#[case("blur", Phase::Target)]
	#[case("mouseenter", Phase::Target)]
	#[case("pointerleave", Phase::Target)]
	#[case("scroll", Phase::Target)]
	#[case("click", Phase::Bubble)]
	#[case("keydown", Phase::Bubble)]
	#[case("input", Phase::Bubble)]
	#[case("my-widget:change", Phase::Bubble)]
	fn test_phase_for(#[case] event_type: &str, #[case] expected: Phase) {
		assert_eq!(phase_for(event_type), expected);
	}

	#[rstest]
	#[case(Phase::Capture, true, true)]
	#[case(Phase::Bubble, false, true)]
	#[case(Phase::Target, true, false)]
	fn test_phase_flags(#[case] phase: Phase, #[case] capture: bool, #[case] walks: bool) {
		assert_eq!(phase.is_capture(), capture);
		assert_eq!(phase.walks_path(), walks);
	}

	#[rstest]
	#[case("click", true)]
	#[case("my-widget:change", true)]
	#[case("", false)]
	#[case("two words", false)]
	#[case("a=b", false)]
	fn test_validate_event_type(#[case] event_type: &str, #[case] valid: bool) {
		assert_eq!(validate_event_type(event_type).is_ok(), valid);
	}
}
