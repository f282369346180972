#![forbid(unsafe_code)]
//! Patchplan: a best-effort executor for declarative filesystem edit plans.
//!
//! Model highlights:
//! - A `Plan` is an ordered list of `Step`s (create/rewrite/append/delete plus
//!   exact-substring text edits); order is significant and preserved.
//! - Preconditions that do not hold (file already exists, match text absent)
//!   are not errors: they route to the step's `alternative` chain or skip.
//! - `apply` never aborts a plan; every step lands in the `ExecutionReport`
//!   as `applied`, `skipped`, `fell_back`, or `failed`.
//! - All step paths resolve through `SafePath`, confined to the caller's root.

pub mod constants;
pub mod api;
pub mod fs;
pub mod logging;
pub mod policy;
pub mod types;

pub use api::*;
