// error.rs - Error types for policy composition.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::Topic;
use crate::validator::RuleViolation;

/// Coarse classification used by callers to decide how to surface a failure.
///
/// `Input` errors are the caller's fault and can be fixed by changing the
/// questionnaire. `Template` errors are defects in the built-in catalog or
/// layout. `Io` errors come from the filesystem and may succeed on retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Input,
    Template,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Input => "input",
            ErrorKind::Template => "template",
            ErrorKind::Io => "io",
        };
        f.write_str(label)
    }
}

/// Errors that can occur while turning a questionnaire into a document tree.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A profile field is empty or otherwise unusable.
    #[error("organization profile field '{field}' is invalid: {reason}")]
    InvalidProfile { field: &'static str, reason: String },

    /// A question with no fallback was left unanswered.
    #[error("required answer '{question}' is missing")]
    MissingRequiredAnswer { question: String },

    /// A supplied answer has the wrong shape or an unknown option.
    #[error("answer to '{question}' is invalid ({value}): {reason}")]
    InvalidAnswer {
        question: String,
        value: String,
        reason: String,
    },

    /// One or more consistency rules failed. Every failing rule is listed.
    #[error("conflicting answers: {}", describe_violations(.violations))]
    ConflictingAnswers { violations: Vec<RuleViolation> },

    /// A clause template references a token nobody provides, or has a stray marker.
    #[error("clause '{topic}/{variant}' has unresolved token '{token}'")]
    UnresolvedToken {
        topic: Topic,
        variant: String,
        token: String,
    },

    /// The catalog has no decision table for a topic.
    #[error("no decision table for topic '{topic}'")]
    MissingDecisionTable { topic: Topic },

    /// A decision table selected a variant the catalog does not define.
    #[error("catalog has no variant '{variant}' for topic '{topic}'")]
    UnknownVariant { topic: Topic, variant: String },

    /// A resolved clause has no slot in the section layout.
    #[error("topic '{topic}' has no slot in section layout {layout}")]
    UnplacedTopic { topic: Topic, layout: &'static str },

    /// The section layout expects a clause that was never resolved.
    #[error("section layout {layout} expects a clause for topic '{topic}'")]
    MissingClause { topic: Topic, layout: &'static str },
}

impl PolicyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PolicyError::InvalidProfile { .. }
            | PolicyError::MissingRequiredAnswer { .. }
            | PolicyError::InvalidAnswer { .. }
            | PolicyError::ConflictingAnswers { .. } => ErrorKind::Input,
            PolicyError::UnresolvedToken { .. }
            | PolicyError::MissingDecisionTable { .. }
            | PolicyError::UnknownVariant { .. }
            | PolicyError::UnplacedTopic { .. }
            | PolicyError::MissingClause { .. } => ErrorKind::Template,
        }
    }

    /// Names of the failing consistency rules, empty for every other error.
    pub fn violated_rules(&self) -> Vec<&str> {
        match self {
            PolicyError::ConflictingAnswers { violations } => {
                violations.iter().map(|v| v.rule.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn describe_violations(violations: &[RuleViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("[{}] {}", v.rule, v.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_and_template_errors_are_classified() {
        let missing = PolicyError::MissingRequiredAnswer {
            question: "q23_byod".into(),
        };
        assert_eq!(missing.kind(), ErrorKind::Input);

        let unknown = PolicyError::UnknownVariant {
            topic: Topic::Byod,
            variant: "nope".into(),
        };
        assert_eq!(unknown.kind(), ErrorKind::Template);
    }

    #[test]
    fn conflict_message_lists_every_rule() {
        let err = PolicyError::ConflictingAnswers {
            violations: vec![
                RuleViolation {
                    rule: "a".into(),
                    reason: "first".into(),
                },
                RuleViolation {
                    rule: "b".into(),
                    reason: "second".into(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("[a] first"));
        assert!(msg.contains("[b] second"));
        assert_eq!(err.violated_rules(), vec!["a", "b"]);
    }

    #[test]
    fn kind_displays_lowercase() {
        assert_eq!(ErrorKind::Template.to_string(), "template");
    }
}
