// Error types for the particle background.
//
// The simulation itself cannot fail; these cover the browser surface and
// host calls around it, plus rejected configuration.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// The canvas 2d context could not be acquired.
    SurfaceUnavailable,
    /// A host call (animation frame, timer, listener) failed.
    Host(String),
    /// A configuration value is out of range.
    InvalidConfig(&'static str),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::SurfaceUnavailable => write!(f, "Drawing surface unavailable: no 2d context"),
            FieldError::Host(msg) => write!(f, "Host call failed: {}", msg),
            FieldError::InvalidConfig(msg) => write!(f, "Invalid field config: {}", msg),
        }
    }
}

impl std::error::Error for FieldError {}

impl From<wasm_bindgen::JsValue> for FieldError {
    fn from(e: wasm_bindgen::JsValue) -> Self {
        FieldError::Host(format!("{:?}", e))
    }
}
