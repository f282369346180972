//! Shared crate-wide constants for Patchplan.
//!
//! Centralizes magic values used across modules. Adjusting these here will
//! propagate through the crate.

/// UUIDv5 namespace tag for deterministic plan/step IDs.
pub const NS_TAG: &str = "https://patchplan/edit-plan";

/// Maximum number of payload bytes echoed into facts as `content_preview`.
/// Full payloads stay out of the audit stream; previews are for humans.
pub const CONTENT_PREVIEW_MAX: usize = 80;

/// Separator written between existing file content and appended content when
/// the existing content does not already end with a newline.
pub const APPEND_SEPARATOR: char = '\n';
