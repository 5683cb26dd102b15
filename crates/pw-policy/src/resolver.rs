// resolver.rs - Clause Resolver: picks one catalog variant per topic.
//
// For every topic in canonical order the resolver walks that topic's
// decision table, takes the first rule whose condition holds (or the
// table default) and looks the variant up in the catalog. Every step is
// recorded in a trace so a generated document can be explained after
// the fact.

use serde::Serialize;

use crate::answers::AnswerModel;
use crate::catalog::{Catalog, ClauseVariant, Topic};
use crate::decision::Condition;
use crate::error::PolicyError;

impl Condition {
    /// Evaluate this condition against a normalized Answer Model.
    pub fn holds(&self, model: &AnswerModel) -> bool {
        match self {
            Condition::Flag(q, expected) => model.flag(q) == Some(*expected),
            Condition::ChoiceIs(q, label) => model.choice(q) == Some(*label),
            Condition::Includes(q, label) => model.choices(q).contains(label),
            Condition::SelectedAtLeast(q, n) => model.choices(q).len() >= *n,
            Condition::Answered(q) => model.is_answered(q),
            Condition::SizeAtLeast(class) => model.size_class() >= *class,
            Condition::IndustryIn(industries) => industries.contains(&model.profile().industry),
            Condition::All(parts) => parts.iter().all(|c| c.holds(model)),
            Condition::Any(parts) => parts.iter().any(|c| c.holds(model)),
            Condition::Not(inner) => !inner.holds(model),
        }
    }
}

/// The variant chosen for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClauseSelection {
    pub topic: Topic,
    pub heading: &'static str,
    pub variant: ClauseVariant,
    /// Label of the rule that matched; `None` when the default applied.
    pub matched_rule: Option<String>,
}

/// One rule check recorded during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleCheck {
    pub rule: String,
    pub variant: &'static str,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicTrace {
    pub topic: Topic,
    pub checks: Vec<RuleCheck>,
    pub selected: &'static str,
    pub defaulted: bool,
}

/// Record of every rule evaluated while resolving a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionTrace {
    pub topics: Vec<TopicTrace>,
}

impl ResolutionTrace {
    pub fn for_topic(&self, topic: Topic) -> Option<&TopicTrace> {
        self.topics.iter().find(|t| t.topic == topic)
    }

    /// Topics that fell through to their default variant.
    pub fn defaulted_topics(&self) -> Vec<Topic> {
        self.topics.iter().filter(|t| t.defaulted).map(|t| t.topic).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub selections: Vec<ClauseSelection>,
    pub trace: ResolutionTrace,
}

pub struct ClauseResolver<'c> {
    catalog: &'c Catalog,
}

impl<'c> ClauseResolver<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    /// One selection per topic, in `Topic::ALL` order.
    pub fn resolve(&self, model: &AnswerModel) -> Result<Vec<ClauseSelection>, PolicyError> {
        Ok(self.resolve_with_trace(model)?.selections)
    }

    pub fn resolve_with_trace(&self, model: &AnswerModel) -> Result<Resolution, PolicyError> {
        let mut selections = Vec::with_capacity(Topic::ALL.len());
        let mut trace = ResolutionTrace::default();
        for topic in Topic::ALL {
            let (selection, topic_trace) = self.resolve_topic(topic, model)?;
            selections.push(selection);
            trace.topics.push(topic_trace);
        }
        Ok(Resolution { selections, trace })
    }

    pub fn resolve_topic(
        &self,
        topic: Topic,
        model: &AnswerModel,
    ) -> Result<(ClauseSelection, TopicTrace), PolicyError> {
        let table = self.catalog.table(topic).ok_or_else(|| {
            tracing::error!(%topic, "no decision table for topic");
            PolicyError::MissingDecisionTable { topic }
        })?;

        let mut checks = Vec::new();
        let mut matched = None;
        for rule in table.rules {
            let holds = rule.when.holds(model);
            checks.push(RuleCheck {
                rule: rule.when.to_string(),
                variant: rule.variant,
                matched: holds,
            });
            if holds {
                matched = Some(rule);
                break;
            }
        }

        let variant_id = matched.map_or(table.default_variant, |r| r.variant);
        let entry = self.catalog.entry(topic);
        let variant = self.catalog.variant(topic, variant_id).ok_or_else(|| {
            tracing::error!(%topic, variant = variant_id, "decision table selected unknown variant");
            PolicyError::UnknownVariant {
                topic,
                variant: variant_id.to_string(),
            }
        })?;

        let matched_rule = matched.map(|r| r.when.to_string());
        tracing::debug!(
            %topic,
            variant = variant.id,
            matched_rule = matched_rule.as_deref().unwrap_or("default"),
            "resolved clause"
        );

        let selection = ClauseSelection {
            topic,
            heading: entry.map_or("", |e| e.heading),
            variant: *variant,
            matched_rule,
        };
        let topic_trace = TopicTrace {
            topic,
            checks,
            selected: variant.id,
            defaulted: matched.is_none(),
        };
        Ok((selection, topic_trace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::QuestionnaireAnswers;
    use crate::catalog::CLAUSE_CATALOG;
    use crate::decision::{DecisionRule, DecisionTable, DECISION_TABLES};
    use crate::profile::{Industry, OrganizationProfile, SizeClass};
    use crate::questions::ids;

    fn model(profile: OrganizationProfile, answers: QuestionnaireAnswers) -> AnswerModel {
        AnswerModel::normalize(profile, &answers).unwrap()
    }

    fn acme() -> OrganizationProfile {
        OrganizationProfile::new("Acme Co", Industry::Technology, SizeClass::Ig1)
    }

    fn byod(choice: &str) -> QuestionnaireAnswers {
        QuestionnaireAnswers::new().with(ids::BYOD, choice)
    }

    fn selected(model: &AnswerModel, topic: Topic) -> &'static str {
        let catalog = Catalog::builtin();
        let resolver = ClauseResolver::new(&catalog);
        resolver.resolve_topic(topic, model).unwrap().0.variant.id
    }

    #[test]
    fn resolves_every_topic_once_in_order() {
        let catalog = Catalog::builtin();
        let m = model(acme(), byod("Not allowed"));
        let selections = ClauseResolver::new(&catalog).resolve(&m).unwrap();
        let topics: Vec<Topic> = selections.iter().map(|s| s.topic).collect();
        assert_eq!(topics, Topic::ALL.to_vec());
    }

    #[test]
    fn mfa_follows_profile_capability() {
        let with_mfa = model(acme().with_mfa(true), byod("Not allowed"));
        assert_eq!(selected(&with_mfa, Topic::MfaRequirements), "required");

        let scoped = model(
            acme().with_mfa(true),
            byod("Not allowed").with(ids::MFA_SCOPE, "Administrative accounts only"),
        );
        assert_eq!(selected(&scoped, Topic::MfaRequirements), "required-privileged");

        let small = model(acme(), byod("Not allowed"));
        assert_eq!(selected(&small, Topic::MfaRequirements), "recommended");

        let large = model(acme().with_employee_count(700), byod("Not allowed"));
        assert_eq!(selected(&large, Topic::MfaRequirements), "required-planned");
    }

    #[test]
    fn byod_with_mdm_needs_mdm() {
        let enrolled = model(acme().with_mdm(true), byod("Allowed with MDM enrollment"));
        assert_eq!(selected(&enrolled, Topic::Byod), "mdm-enrollment");

        let guest = model(acme(), byod("Guest network only"));
        assert_eq!(selected(&guest, Topic::Byod), "guest-network-only");
    }

    #[test]
    fn compliance_prefers_multiple_frameworks() {
        let many = model(acme(), byod("Not allowed").with(ids::COMPLIANCE, vec!["GDPR", "SOC2"]));
        assert_eq!(selected(&many, Topic::RegulatoryCompliance), "multiple-frameworks");

        let one = model(acme(), byod("Not allowed").with(ids::COMPLIANCE, vec!["PCI-DSS"]));
        assert_eq!(selected(&one, Topic::RegulatoryCompliance), "pci-dss");

        let clinic = OrganizationProfile::new("Clinic", Industry::Healthcare, SizeClass::Ig1);
        let by_industry = model(clinic, byod("Not allowed"));
        assert_eq!(selected(&by_industry, Topic::RegulatoryCompliance), "hipaa");
        assert_eq!(selected(&by_industry, Topic::PurposeScope), "regulated");
    }

    #[test]
    fn incident_contact_only_counts_real_answers() {
        let named = model(acme(), byod("Not allowed").with(ids::INCIDENT_MANAGER_NAME, "Dana Lee"));
        assert_eq!(selected(&named, Topic::IncidentReporting), "named-manager");

        let external = model(
            acme(),
            byod("Not allowed")
                .with(ids::INCIDENT_MANAGER_NAME, "Dana Lee")
                .with(ids::EXTERNAL_IR_SUPPORT, "Yes"),
        );
        assert_eq!(selected(&external, Topic::IncidentReporting), "external-responder");

        let unnamed = model(acme(), byod("Not allowed"));
        assert_eq!(selected(&unnamed, Topic::IncidentReporting), "contact-role");
    }

    #[test]
    fn trace_records_checks_up_to_the_match() {
        let catalog = Catalog::builtin();
        let m = model(acme(), byod("Not allowed"));
        let resolution = ClauseResolver::new(&catalog).resolve_with_trace(&m).unwrap();

        let byod_trace = resolution.trace.for_topic(Topic::Byod).unwrap();
        assert_eq!(byod_trace.checks.len(), 3);
        assert!(byod_trace.checks[2].matched);
        assert!(!byod_trace.defaulted);

        let remote = resolution.trace.for_topic(Topic::RemoteWork).unwrap();
        assert!(remote.defaulted);
        assert_eq!(remote.selected, "office-only");
        assert!(resolution.trace.defaulted_topics().contains(&Topic::RemoteWork));
    }

    #[test]
    fn missing_table_is_a_template_error() {
        let tables: Vec<DecisionTable> = DECISION_TABLES
            .iter()
            .filter(|t| t.topic != Topic::Monitoring)
            .copied()
            .collect();
        let catalog = Catalog::from_parts(CLAUSE_CATALOG.to_vec(), tables);
        let m = model(acme(), byod("Not allowed"));
        let err = ClauseResolver::new(&catalog).resolve(&m).unwrap_err();
        assert!(matches!(err, PolicyError::MissingDecisionTable { topic: Topic::Monitoring }));
        assert_eq!(err.kind(), crate::error::ErrorKind::Template);
    }

    #[test]
    fn unknown_variant_is_a_template_error() {
        static BROKEN_RULES: &[DecisionRule] = &[DecisionRule {
            when: Condition::Flag(ids::CYBER_INSURANCE, false),
            variant: "does-not-exist",
        }];
        let tables: Vec<DecisionTable> = DECISION_TABLES
            .iter()
            .map(|t| {
                if t.topic == Topic::Enforcement {
                    DecisionTable {
                        rules: BROKEN_RULES,
                        ..*t
                    }
                } else {
                    *t
                }
            })
            .collect();
        let catalog = Catalog::from_parts(CLAUSE_CATALOG.to_vec(), tables);
        let m = model(acme(), byod("Not allowed"));
        match ClauseResolver::new(&catalog).resolve(&m).unwrap_err() {
            PolicyError::UnknownVariant { topic, variant } => {
                assert_eq!(topic, Topic::Enforcement);
                assert_eq!(variant, "does-not-exist");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
