// validator.rs - Consistency Validator: cross-field checks before resolution.
//
// Every registered rule runs against the normalized answers, even after
// one fails, so a single rejection lists every contradiction at once.

use serde::{Deserialize, Serialize};

use crate::answers::AnswerModel;
use crate::error::PolicyError;
use crate::questions::ids;

pub const BYOD_REQUIRES_MDM: &str = "byod-requires-mdm";

/// Result of one rule check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Pass,
    Fail(String),
}

/// A failed rule, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub rule: String,
    pub reason: String,
}

/// A named predicate over the Answer Model.
#[derive(Debug, Clone, Copy)]
pub struct ConsistencyRule {
    pub name: &'static str,
    pub description: &'static str,
    pub check: fn(&AnswerModel) -> RuleOutcome,
}

pub static BUILTIN_RULES: &[ConsistencyRule] = &[ConsistencyRule {
    name: BYOD_REQUIRES_MDM,
    description: "BYOD with MDM enrollment requires an available MDM solution",
    check: byod_requires_mdm,
}];

fn byod_requires_mdm(model: &AnswerModel) -> RuleOutcome {
    if model.choice(ids::BYOD) == Some("Allowed with MDM") && !model.has_mdm() {
        RuleOutcome::Fail(
            "Cannot allow BYOD with MDM enrollment when MDM solution is not available".to_string(),
        )
    } else {
        RuleOutcome::Pass
    }
}

#[derive(Debug, Clone)]
pub struct ConsistencyValidator {
    rules: Vec<ConsistencyRule>,
}

impl Default for ConsistencyValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsistencyValidator {
    /// Validator with the built-in rule set.
    pub fn new() -> Self {
        Self {
            rules: BUILTIN_RULES.to_vec(),
        }
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: ConsistencyRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[ConsistencyRule] {
        &self.rules
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    /// All failing rules, in registration order.
    pub fn evaluate(&self, model: &AnswerModel) -> Vec<RuleViolation> {
        self.rules
            .iter()
            .filter_map(|rule| match (rule.check)(model) {
                RuleOutcome::Pass => None,
                RuleOutcome::Fail(reason) => Some(RuleViolation {
                    rule: rule.name.to_string(),
                    reason,
                }),
            })
            .collect()
    }

    pub fn check(&self, model: &AnswerModel) -> Result<(), PolicyError> {
        let violations = self.evaluate(model);
        if violations.is_empty() {
            return Ok(());
        }
        for v in &violations {
            tracing::warn!(org = %model.profile().org_key(), rule = %v.rule, reason = %v.reason, "conflicting answers");
        }
        Err(PolicyError::ConflictingAnswers { violations })
    }
}
