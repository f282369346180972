use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid root: {0}")]
    InvalidRoot(String),
    #[error("filesystem error: {0}")]
    FilesystemError(String),
}

impl From<crate::types::errors::Error> for ApiError {
    fn from(e: crate::types::errors::Error) -> Self {
        ApiError::FilesystemError(e.msg)
    }
}

// Stable identifiers included in failure summary facts so downstream tooling
// can route on them without parsing detail strings.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorId {
    E_UNKNOWN_ACTION,
    E_PATH_ESCAPE,
    E_CHAIN_EXHAUSTED,
    E_MALFORMED_STEP,
    E_IO,
    E_GENERIC,
}

#[must_use]
pub const fn id_str(id: ErrorId) -> &'static str {
    match id {
        ErrorId::E_UNKNOWN_ACTION => "E_UNKNOWN_ACTION",
        ErrorId::E_PATH_ESCAPE => "E_PATH_ESCAPE",
        ErrorId::E_CHAIN_EXHAUSTED => "E_CHAIN_EXHAUSTED",
        ErrorId::E_MALFORMED_STEP => "E_MALFORMED_STEP",
        ErrorId::E_IO => "E_IO",
        ErrorId::E_GENERIC => "E_GENERIC",
    }
}

#[must_use]
pub const fn exit_code_for(id: ErrorId) -> i32 {
    match id {
        ErrorId::E_UNKNOWN_ACTION => 10,
        ErrorId::E_PATH_ESCAPE => 20,
        ErrorId::E_CHAIN_EXHAUSTED => 30,
        ErrorId::E_MALFORMED_STEP => 40,
        ErrorId::E_IO => 50,
        ErrorId::E_GENERIC => 1,
    }
}

/// Best-effort mapping from failed-step detail strings to a chain of stable
/// summary error IDs. Always includes a top-level classification.
#[must_use]
pub fn infer_summary_error_ids(details: &[String]) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    let joined = details.join("; ").to_lowercase();
    if joined.contains("unknown action") {
        out.push(id_str(ErrorId::E_UNKNOWN_ACTION));
    }
    if joined.contains("escapes root") || joined.contains("dotdot") {
        out.push(id_str(ErrorId::E_PATH_ESCAPE));
    }
    if joined.contains("exhausted") {
        out.push(id_str(ErrorId::E_CHAIN_EXHAUSTED));
    }
    if joined.contains("malformed") {
        out.push(id_str(ErrorId::E_MALFORMED_STEP));
    }
    if joined.contains("io error") || joined.contains("permission") {
        out.push(id_str(ErrorId::E_IO));
    }
    if out.is_empty() {
        out.push(id_str(ErrorId::E_GENERIC));
    }
    out
}
