//! Per-step execution and alternative resolution.
//!
//! A step first runs its primary action. Three things can come of that:
//! applied, failed (I/O, malformed, unknown action, escaping path), or
//! precondition-not-met. Only the last routes into the `alternative` chain;
//! each link of the chain is attempted at most once, so resolution is bounded
//! by the (finite) depth of the step value itself.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::fs::{
    append_with_separator, create_dir_all, delete_recursive, find_and_replace_first,
    insert_after_line, insert_before_line, write_file,
};
use crate::constants::APPEND_SEPARATOR;
use crate::policy::Policy;
use crate::types::safepath::SafePath;
use crate::types::step::{ActionKind, Alternative, Step};
use crate::types::StepOutcome;

/// Outcome of one action attempt, before alternative resolution.
pub(crate) enum Eval {
    Applied(String),
    /// Precondition not met: file already exists, match text absent, file
    /// missing for a text edit. Not an error.
    NotApplicable(String),
    Failed(String),
}

/// Outcome of a full chain (a step plus its nested alternatives).
enum ChainEval {
    Applied(String),
    Exhausted(String),
    Failed(String),
}

/// Run one plan step to completion, including its alternative chain.
pub(crate) fn run_step(policy: &Policy, root: &Path, step: &Step, dry: bool) -> (StepOutcome, String) {
    match eval_primary(root, step, dry) {
        Eval::Applied(d) => (StepOutcome::Applied, d),
        Eval::Failed(e) => (StepOutcome::Failed, e),
        Eval::NotApplicable(reason) => match &step.alternative {
            None => (StepOutcome::Skipped, reason),
            Some(alt) => match eval_alternative(root, step, alt, dry) {
                ChainEval::Applied(d) => {
                    (StepOutcome::FellBack, format!("{reason}; fallback: {d}"))
                }
                ChainEval::Exhausted(d) => {
                    let detail = format!("{reason}; alternatives exhausted: {d}");
                    if policy.exhausted_alternatives_fail {
                        (StepOutcome::Failed, detail)
                    } else {
                        (StepOutcome::Skipped, detail)
                    }
                }
                ChainEval::Failed(e) => (StepOutcome::Failed, e),
            },
        },
    }
}

fn eval_alternative(root: &Path, origin: &Step, alt: &Alternative, dry: bool) -> ChainEval {
    match alt {
        Alternative::One(step) => eval_chain(root, step, dry),
        Alternative::Many(seq) => eval_sequence(root, origin, seq, dry),
    }
}

/// A single alternative step is applied as if it were the original step and
/// is recursively eligible for its own alternative.
fn eval_chain(root: &Path, step: &Step, dry: bool) -> ChainEval {
    match eval_primary(root, step, dry) {
        Eval::Applied(d) => ChainEval::Applied(d),
        Eval::Failed(e) => ChainEval::Failed(e),
        Eval::NotApplicable(reason) => match &step.alternative {
            None => ChainEval::Exhausted(reason),
            Some(alt) => eval_alternative(root, step, alt, dry),
        },
    }
}

/// Scratch state for a sequence alternative: the originating step's file,
/// held in memory so every same-path content change accumulates into one
/// final write.
struct SeqBuf {
    abs: PathBuf,
    rel: PathBuf,
    content: String,
    /// Whether the file logically exists at this point of the sequence
    /// (on disk at entry, or created/deleted by an earlier element).
    present: bool,
    dirty: bool,
}

/// A sequence alternative runs each element in order against the same file
/// content, accumulating changes before a single final write.
///
/// Every content-bearing action addressing the originating step's path runs
/// against the in-memory buffer — text edits, appends, create, rewrite —
/// including any such action reached through nested alternatives. Elements
/// addressing other paths (or folder creation) run as standalone chains
/// against the tree; a same-path delete drops both the file and the buffer.
fn eval_sequence(root: &Path, origin: &Step, seq: &[Step], dry: bool) -> ChainEval {
    let abs = match resolve(root, &origin.path) {
        Ok(p) => p,
        Err(e) => return ChainEval::Failed(e),
    };
    let (content, present) = match read_opt(&abs) {
        Ok(Some(s)) => (s, true),
        Ok(None) => (String::new(), false),
        Err(e) => {
            return ChainEval::Failed(format!(
                "io error reading {}: {e}",
                origin.path.display()
            ))
        }
    };
    let mut buf = SeqBuf {
        abs,
        rel: origin.path.clone(),
        content,
        present,
        dirty: false,
    };
    let mut applied: Vec<String> = Vec::new();
    let mut missed: Vec<String> = Vec::new();

    for step in seq {
        match eval_in_sequence(root, &mut buf, step, dry) {
            ChainEval::Applied(d) => applied.push(d),
            ChainEval::Exhausted(reason) => missed.push(reason),
            ChainEval::Failed(e) => return ChainEval::Failed(e),
        }
    }

    if applied.is_empty() {
        let reason = if missed.is_empty() {
            "empty alternative sequence".to_string()
        } else {
            missed.join("; ")
        };
        return ChainEval::Exhausted(reason);
    }
    if buf.dirty && !dry {
        if let Err(e) = write_file(&buf.abs, &buf.content) {
            return ChainEval::Failed(format!(
                "io error writing {}: {e}",
                origin.path.display()
            ));
        }
    }
    ChainEval::Applied(applied.join("; "))
}

/// One sequence element, or a nested alternative reached through one. Same
/// resolution rules as a standalone chain, except that content changes to the
/// buffered path stay in memory.
fn eval_in_sequence(root: &Path, buf: &mut SeqBuf, step: &Step, dry: bool) -> ChainEval {
    match eval_element(root, buf, step, dry) {
        Eval::Applied(d) => ChainEval::Applied(d),
        Eval::Failed(e) => ChainEval::Failed(e),
        Eval::NotApplicable(reason) => match &step.alternative {
            None => ChainEval::Exhausted(reason),
            Some(Alternative::One(alt)) => eval_in_sequence(root, buf, alt, dry),
            Some(Alternative::Many(inner)) => {
                let mut any = false;
                let mut details: Vec<String> = Vec::new();
                for alt in inner {
                    match eval_in_sequence(root, buf, alt, dry) {
                        ChainEval::Applied(d) => {
                            any = true;
                            details.push(d);
                        }
                        ChainEval::Exhausted(r) => details.push(r),
                        ChainEval::Failed(e) => return ChainEval::Failed(e),
                    }
                }
                if any {
                    ChainEval::Applied(details.join("; "))
                } else if details.is_empty() {
                    ChainEval::Exhausted(reason)
                } else {
                    ChainEval::Exhausted(format!("{reason}; {}", details.join("; ")))
                }
            }
        },
    }
}

/// Dispatch one element: buffered when it mutates the originating file's
/// content, standalone otherwise.
fn eval_element(root: &Path, buf: &mut SeqBuf, step: &Step, dry: bool) -> Eval {
    if step.path == buf.rel {
        if is_buffered_action(&step.action) {
            return eval_on_buffer(buf, step);
        }
        if step.action == ActionKind::Delete {
            let r = eval_primary(root, step, dry);
            if matches!(r, Eval::Applied(_)) {
                buf.content.clear();
                buf.present = false;
                buf.dirty = false;
            }
            return r;
        }
    }
    eval_primary(root, step, dry)
}

fn is_buffered_action(action: &ActionKind) -> bool {
    action.is_text_edit()
        || matches!(
            action,
            ActionKind::CreateFile
                | ActionKind::RewriteFile
                | ActionKind::AppendFile
                | ActionKind::AppendContent
        )
}

/// Apply a content-bearing action to the in-memory buffer. Mirrors the
/// on-disk semantics of `eval_primary`, including preconditions.
fn eval_on_buffer(buf: &mut SeqBuf, step: &Step) -> Eval {
    match step.action {
        ActionKind::CreateFile => {
            if buf.present {
                return Eval::NotApplicable(format!("file exists: {}", step.path.display()));
            }
            buf.content = step.content.clone().unwrap_or_default();
            buf.present = true;
            buf.dirty = true;
            Eval::Applied(format!("file created: {}", step.path.display()))
        }
        ActionKind::RewriteFile => {
            buf.content = step.content.clone().unwrap_or_default();
            buf.present = true;
            buf.dirty = true;
            Eval::Applied(format!("file rewritten: {}", step.path.display()))
        }
        ActionKind::AppendFile | ActionKind::AppendContent => {
            let content = match require(step, step.content.as_deref(), "content") {
                Ok(c) => c,
                Err(e) => return Eval::Failed(e),
            };
            if !buf.content.is_empty() && !buf.content.ends_with(APPEND_SEPARATOR) {
                buf.content.push(APPEND_SEPARATOR);
            }
            buf.content.push_str(content);
            buf.present = true;
            buf.dirty = true;
            Eval::Applied(format!("content appended to {}", step.path.display()))
        }
        ActionKind::FindAndReplace | ActionKind::InsertAfter | ActionKind::InsertBefore => {
            if !buf.present {
                return Eval::NotApplicable(format!("file missing: {}", step.path.display()));
            }
            match eval_text(&buf.content, step) {
                Err(e) => Eval::Failed(e),
                Ok(None) => Eval::NotApplicable(text_miss_reason(step)),
                Ok(Some((next, d))) => {
                    buf.content = next;
                    buf.dirty = true;
                    Eval::Applied(d)
                }
            }
        }
        _ => Eval::Failed(format!(
            "internal: {} is not a buffered action",
            step.action.as_str()
        )),
    }
}

/// Pure transform for a text-edit action. `Ok(None)` means the anchor/find
/// text is absent.
fn eval_text(content: &str, step: &Step) -> Result<Option<(String, String)>, String> {
    match step.action {
        ActionKind::FindAndReplace => {
            let find = require(step, step.find.as_deref(), "find")?;
            let replace = step.replace.as_deref().unwrap_or_default();
            Ok(find_and_replace_first(content, find, replace)
                .map(|next| (next, format!("replaced first occurrence of `{find}`"))))
        }
        ActionKind::InsertAfter => {
            let target = require(step, step.target.as_deref(), "target")?;
            let payload = require(step, step.content.as_deref(), "content")?;
            Ok(insert_after_line(content, target, payload)
                .map(|next| (next, format!("inserted after `{target}`"))))
        }
        ActionKind::InsertBefore => {
            let target = require(step, step.target.as_deref(), "target")?;
            let payload = require(step, step.content.as_deref(), "content")?;
            Ok(insert_before_line(content, target, payload)
                .map(|next| (next, format!("inserted before `{target}`"))))
        }
        _ => Err(format!(
            "internal: {} is not a text edit",
            step.action.as_str()
        )),
    }
}

fn text_miss_reason(step: &Step) -> String {
    match step.action {
        ActionKind::FindAndReplace => format!(
            "`find` text not present in {}",
            step.path.display()
        ),
        _ => format!("target text not present in {}", step.path.display()),
    }
}

/// Evaluate a step's primary action against the tree. Non-mutating when
/// `dry` is set; precondition checks still read the current state.
pub(crate) fn eval_primary(root: &Path, step: &Step, dry: bool) -> Eval {
    let abs = match resolve(root, &step.path) {
        Ok(p) => p,
        Err(e) => return Eval::Failed(e),
    };
    match step.action {
        ActionKind::CreateFolder => {
            if dry {
                return Eval::Applied(format!("would create folder {}", step.path.display()));
            }
            match create_dir_all(&abs) {
                Ok(()) => Eval::Applied(format!("folder created: {}", step.path.display())),
                Err(e) => io_failed("creating folder", step, &e),
            }
        }
        ActionKind::CreateFile => {
            if abs.exists() {
                return Eval::NotApplicable(format!("file exists: {}", step.path.display()));
            }
            let content = step.content.as_deref().unwrap_or_default();
            if dry {
                return Eval::Applied(format!("would create file {}", step.path.display()));
            }
            match write_file(&abs, content) {
                Ok(()) => Eval::Applied(format!("file created: {}", step.path.display())),
                Err(e) => io_failed("creating file", step, &e),
            }
        }
        ActionKind::RewriteFile => {
            let content = step.content.as_deref().unwrap_or_default();
            if dry {
                return Eval::Applied(format!("would rewrite {}", step.path.display()));
            }
            match write_file(&abs, content) {
                Ok(()) => Eval::Applied(format!("file rewritten: {}", step.path.display())),
                Err(e) => io_failed("rewriting file", step, &e),
            }
        }
        ActionKind::AppendFile | ActionKind::AppendContent => {
            let content = match require(step, step.content.as_deref(), "content") {
                Ok(c) => c,
                Err(e) => return Eval::Failed(e),
            };
            if dry {
                return Eval::Applied(format!("would append to {}", step.path.display()));
            }
            match append_with_separator(&abs, content) {
                Ok(()) => Eval::Applied(format!("content appended to {}", step.path.display())),
                Err(e) => io_failed("appending to file", step, &e),
            }
        }
        ActionKind::Delete => {
            if dry {
                return Eval::Applied(format!("would delete {}", step.path.display()));
            }
            match delete_recursive(&abs) {
                Ok(()) => Eval::Applied(format!("deleted: {}", step.path.display())),
                Err(e) => io_failed("deleting", step, &e),
            }
        }
        ActionKind::FindAndReplace | ActionKind::InsertAfter | ActionKind::InsertBefore => {
            let content = match read_opt(&abs) {
                Ok(Some(s)) => s,
                Ok(None) => {
                    return Eval::NotApplicable(format!("file missing: {}", step.path.display()))
                }
                Err(e) => return io_failed("reading file", step, &e),
            };
            match eval_text(&content, step) {
                Err(e) => Eval::Failed(e),
                Ok(None) => Eval::NotApplicable(text_miss_reason(step)),
                Ok(Some((next, d))) => {
                    if dry {
                        return Eval::Applied(format!("would edit {}: {d}", step.path.display()));
                    }
                    match write_file(&abs, &next) {
                        Ok(()) => Eval::Applied(d),
                        Err(e) => io_failed("writing file", step, &e),
                    }
                }
            }
        }
        ActionKind::Unknown => Eval::Failed("unknown action".to_string()),
    }
}

fn resolve(root: &Path, path: &Path) -> Result<PathBuf, String> {
    SafePath::from_rooted(root, path)
        .map(|sp| sp.as_path())
        .map_err(|e| format!("path rejected ({}): {e}", path.display()))
}

fn read_opt(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn require<'a>(step: &Step, field: Option<&'a str>, name: &str) -> Result<&'a str, String> {
    field.ok_or_else(|| {
        format!(
            "malformed step: {} requires `{name}`",
            step.action.as_str()
        )
    })
}

fn io_failed(doing: &str, step: &Step, e: &io::Error) -> Eval {
    Eval::Failed(format!(
        "io error {doing} {}: {e}",
        step.path.display()
    ))
}
