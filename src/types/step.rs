//! Step: a single declarative edit instruction.
//!
//! Steps arrive either hand-authored or parsed from a model's JSON output;
//! both normalize to the same shape. The `alternative` field is the recursive
//! fallback: a single nested step or an ordered sequence of steps tried when
//! the primary precondition does not hold.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Action kinds understood by the executor.
///
/// Unrecognized `action` strings deserialize to `Unknown` so that one
/// malformed step fails at apply time without sinking the whole plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    CreateFolder,
    CreateFile,
    RewriteFile,
    AppendFile,
    /// Alias accepted on the wire; same semantics as `append_file`.
    AppendContent,
    Delete,
    FindAndReplace,
    InsertAfter,
    InsertBefore,
    #[serde(other)]
    Unknown,
}

impl ActionKind {
    /// Stable wire name, used in facts and report rows.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::CreateFolder => "create_folder",
            ActionKind::CreateFile => "create_file",
            ActionKind::RewriteFile => "rewrite_file",
            ActionKind::AppendFile => "append_file",
            ActionKind::AppendContent => "append_content",
            ActionKind::Delete => "delete",
            ActionKind::FindAndReplace => "find_and_replace",
            ActionKind::InsertAfter => "insert_after",
            ActionKind::InsertBefore => "insert_before",
            ActionKind::Unknown => "unknown",
        }
    }

    /// True for actions that edit text in place and can therefore run against
    /// accumulated in-memory content inside an alternative sequence.
    #[must_use]
    pub fn is_text_edit(&self) -> bool {
        matches!(
            self,
            ActionKind::FindAndReplace | ActionKind::InsertAfter | ActionKind::InsertBefore
        )
    }
}

/// Fallback invoked when a step's primary precondition is not met.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Alternative {
    One(Box<Step>),
    Many(Vec<Step>),
}

/// A single requested mutation. Field meaning depends on `action`; unused
/// fields are simply absent on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub action: ActionKind,
    /// Path relative to the project root (absolute paths inside the root are
    /// also accepted and re-rooted by `SafePath`).
    pub path: PathBuf,
    /// Payload for create/rewrite/append, inserted text for insert_*.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Exact-match source text for `find_and_replace`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub find: Option<String>,
    /// Replacement text for `find_and_replace`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<String>,
    /// Anchor substring for `insert_after` / `insert_before`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Short human description, carried through to report rows when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative: Option<Alternative>,
}

impl Step {
    /// Minimal constructor; payload fields start empty.
    #[must_use]
    pub fn new(action: ActionKind, path: impl Into<PathBuf>) -> Self {
        Self {
            action,
            path: path.into(),
            content: None,
            find: None,
            replace: None,
            target: None,
            desc: None,
            alternative: None,
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn with_find_replace(mut self, find: impl Into<String>, replace: impl Into<String>) -> Self {
        self.find = Some(find.into());
        self.replace = Some(replace.into());
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[must_use]
    pub fn with_alternative(mut self, alt: Step) -> Self {
        self.alternative = Some(Alternative::One(Box::new(alt)));
        self
    }

    #[must_use]
    pub fn with_alternatives(mut self, alts: Vec<Step>) -> Self {
        self.alternative = Some(Alternative::Many(alts));
        self
    }

    /// Depth of the alternative chain hanging off this step. Chains are data,
    /// so this is always finite; the executor attempts each level at most once.
    #[must_use]
    pub fn alternative_depth(&self) -> usize {
        match &self.alternative {
            None => 0,
            Some(Alternative::One(s)) => 1 + s.alternative_depth(),
            Some(Alternative::Many(seq)) => {
                1 + seq.iter().map(Step::alternative_depth).max().unwrap_or(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_action_deserializes_without_error() {
        let s: Step =
            serde_json::from_str(r#"{"action":"transmogrify","path":"src/App.js"}"#).unwrap();
        assert_eq!(s.action, ActionKind::Unknown);
    }

    #[test]
    fn alternative_accepts_single_step_or_sequence() {
        let single: Step = serde_json::from_str(
            r#"{"action":"create_file","path":"a.js","content":"x",
                "alternative":{"action":"append_file","path":"a.js","content":"x"}}"#,
        )
        .unwrap();
        assert!(matches!(single.alternative, Some(Alternative::One(_))));

        let seq: Step = serde_json::from_str(
            r#"{"action":"insert_after","path":"a.js","target":"<div>","content":"y",
                "alternative":[{"action":"append_file","path":"a.js","content":"y"}]}"#,
        )
        .unwrap();
        assert!(matches!(seq.alternative, Some(Alternative::Many(ref v)) if v.len() == 1));
    }

    #[test]
    fn alternative_depth_counts_nested_chain() {
        let s = Step::new(ActionKind::InsertAfter, "a.js")
            .with_target("t")
            .with_content("c")
            .with_alternative(
                Step::new(ActionKind::FindAndReplace, "a.js")
                    .with_find_replace("f", "r")
                    .with_alternative(Step::new(ActionKind::AppendFile, "a.js").with_content("c")),
            );
        assert_eq!(s.alternative_depth(), 2);
    }
}
