// decision.rs - Per-topic decision tables.
//
// Each topic has an ordered list of (condition, variant) rules. The first
// rule whose condition holds selects the variant; when none holds the
// table's default applies. Conditions are plain data so tables can be
// listed, traced and tested without running the resolver.

use std::fmt;

use crate::catalog::Topic;
use crate::profile::{Industry, SizeClass};
use crate::questions::ids;

/// A predicate over the Answer Model, evaluated by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Yes/no question has the given answer.
    Flag(&'static str, bool),
    /// Single-choice question has the given canonical label.
    ChoiceIs(&'static str, &'static str),
    /// Multi-choice question includes the given label.
    Includes(&'static str, &'static str),
    /// Multi-choice question has at least this many selections.
    SelectedAtLeast(&'static str, usize),
    /// The caller supplied an answer (fallbacks do not count).
    Answered(&'static str),
    SizeAtLeast(SizeClass),
    IndustryIn(&'static [Industry]),
    All(&'static [Condition]),
    Any(&'static [Condition]),
    Not(&'static Condition),
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Flag(q, value) => write!(f, "{} = {}", q, if *value { "Yes" } else { "No" }),
            Condition::ChoiceIs(q, label) => write!(f, "{} = {}", q, label),
            Condition::Includes(q, label) => write!(f, "{} includes {}", q, label),
            Condition::SelectedAtLeast(q, n) => write!(f, "{} has at least {} selections", q, n),
            Condition::Answered(q) => write!(f, "{} answered", q),
            Condition::SizeAtLeast(class) => write!(f, "size class >= {}", class),
            Condition::IndustryIn(industries) => {
                let labels: Vec<&str> = industries.iter().map(Industry::label).collect();
                write!(f, "industry in [{}]", labels.join(", "))
            }
            Condition::All(parts) => write!(f, "({})", join(parts, " AND ")),
            Condition::Any(parts) => write!(f, "({})", join(parts, " OR ")),
            Condition::Not(inner) => write!(f, "NOT {}", inner),
        }
    }
}

fn join(parts: &[Condition], sep: &str) -> String {
    parts
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionRule {
    pub when: Condition,
    pub variant: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionTable {
    pub topic: Topic,
    pub rules: &'static [DecisionRule],
    pub default_variant: &'static str,
}

const fn rule(when: Condition, variant: &'static str) -> DecisionRule {
    DecisionRule { when, variant }
}

const REGULATED_INDUSTRIES: &[Industry] = &[Industry::Healthcare, Industry::Finance, Industry::Government];

pub static DECISION_TABLES: &[DecisionTable] = &[
    DecisionTable {
        topic: Topic::PurposeScope,
        rules: &[rule(Condition::IndustryIn(REGULATED_INDUSTRIES), "regulated")],
        default_variant: "standard",
    },
    DecisionTable {
        topic: Topic::AcceptableUse,
        rules: &[
            rule(Condition::ChoiceIs(ids::PERSONAL_USE, "Prohibited"), "no-personal-use"),
            rule(Condition::ChoiceIs(ids::PERSONAL_USE, "Minimal"), "minimal-personal-use"),
            rule(Condition::ChoiceIs(ids::PERSONAL_USE, "Limited"), "limited-personal-use"),
            rule(Condition::ChoiceIs(ids::PERSONAL_USE, "Reasonable"), "reasonable-personal-use"),
        ],
        default_variant: "no-personal-use",
    },
    DecisionTable {
        topic: Topic::PersonalEmail,
        rules: &[
            rule(Condition::Flag(ids::PERSONAL_EMAIL, true), "permitted-with-care"),
            rule(Condition::Flag(ids::PERSONAL_EMAIL, false), "prohibited"),
        ],
        default_variant: "prohibited",
    },
    DecisionTable {
        topic: Topic::WebBrowsing,
        rules: &[
            rule(Condition::Flag(ids::PERSONAL_WEBSITES, true), "incidental-browsing"),
            rule(Condition::Flag(ids::PERSONAL_WEBSITES, false), "business-only"),
        ],
        default_variant: "business-only",
    },
    DecisionTable {
        topic: Topic::SocialMedia,
        rules: &[
            rule(Condition::ChoiceIs(ids::SOCIAL_MEDIA, "Authorized only"), "authorized-spokespeople"),
            rule(Condition::ChoiceIs(ids::SOCIAL_MEDIA, "No one"), "no-official-posting"),
            rule(Condition::ChoiceIs(ids::SOCIAL_MEDIA, "All with guidelines"), "all-with-guidelines"),
        ],
        default_variant: "authorized-spokespeople",
    },
    DecisionTable {
        topic: Topic::CloudStorage,
        rules: &[
            rule(Condition::ChoiceIs(ids::CLOUD_STORAGE, "Prohibited"), "prohibited"),
            rule(Condition::ChoiceIs(ids::CLOUD_STORAGE, "Approved platforms only"), "approved-platforms"),
            rule(Condition::ChoiceIs(ids::CLOUD_STORAGE, "Allowed"), "allowed-with-classification"),
        ],
        default_variant: "approved-platforms",
    },
    DecisionTable {
        topic: Topic::BrowserSync,
        rules: &[
            rule(Condition::ChoiceIs(ids::BROWSER_SYNC, "Prohibited"), "prohibited"),
            rule(Condition::ChoiceIs(ids::BROWSER_SYNC, "Enterprise accounts only"), "enterprise-accounts"),
            rule(Condition::ChoiceIs(ids::BROWSER_SYNC, "Allowed"), "allowed"),
        ],
        default_variant: "prohibited",
    },
    DecisionTable {
        topic: Topic::RegulatoryCompliance,
        rules: &[
            rule(Condition::SelectedAtLeast(ids::COMPLIANCE, 2), "multiple-frameworks"),
            rule(Condition::Includes(ids::COMPLIANCE, "HIPAA"), "hipaa"),
            rule(Condition::Includes(ids::COMPLIANCE, "PCI-DSS"), "pci-dss"),
            rule(Condition::Includes(ids::COMPLIANCE, "GDPR"), "gdpr"),
            rule(Condition::Includes(ids::COMPLIANCE, "SOC2"), "soc2"),
            rule(Condition::IndustryIn(&[Industry::Healthcare]), "hipaa"),
            rule(Condition::Answered(ids::OTHER_NOTIFICATIONS), "notification-obligations"),
        ],
        default_variant: "general",
    },
    DecisionTable {
        topic: Topic::PasswordRequirements,
        rules: &[
            rule(Condition::Flag(ids::PASSWORD_MANAGER, true), "manager-provided"),
            rule(Condition::SizeAtLeast(SizeClass::Ig2), "manager-required"),
        ],
        default_variant: "manager-recommended",
    },
    DecisionTable {
        topic: Topic::MfaRequirements,
        rules: &[
            rule(
                Condition::All(&[
                    Condition::Flag(ids::MFA, true),
                    Condition::ChoiceIs(ids::MFA_SCOPE, "Administrative accounts only"),
                ]),
                "required-privileged",
            ),
            rule(Condition::Flag(ids::MFA, true), "required"),
            rule(Condition::SizeAtLeast(SizeClass::Ig2), "required-planned"),
        ],
        default_variant: "recommended",
    },
    DecisionTable {
        topic: Topic::AccountManagement,
        rules: &[rule(Condition::Flag(ids::SEPARATE_ADMIN_ACCOUNTS, true), "separate-privileged-accounts")],
        default_variant: "shared-accounts-reviewed",
    },
    DecisionTable {
        topic: Topic::DeviceManagement,
        rules: &[
            rule(Condition::Flag(ids::MDM, true), "mdm-enrolled"),
            rule(Condition::SizeAtLeast(SizeClass::Ig2), "mdm-planned"),
        ],
        default_variant: "baseline-hardening",
    },
    DecisionTable {
        topic: Topic::Byod,
        rules: &[
            rule(
                Condition::All(&[
                    Condition::ChoiceIs(ids::BYOD, "Allowed with MDM"),
                    Condition::Flag(ids::MDM, true),
                ]),
                "mdm-enrollment",
            ),
            rule(Condition::ChoiceIs(ids::BYOD, "Guest network only"), "guest-network-only"),
            rule(Condition::ChoiceIs(ids::BYOD, "Not allowed"), "not-permitted"),
        ],
        default_variant: "not-permitted",
    },
    DecisionTable {
        topic: Topic::RemoteWork,
        rules: &[
            rule(Condition::ChoiceIs(ids::REMOTE_WORK, "Fully remote"), "remote-first"),
            rule(Condition::ChoiceIs(ids::REMOTE_WORK, "Hybrid"), "hybrid"),
            rule(Condition::ChoiceIs(ids::REMOTE_WORK, "Office only"), "office-only"),
            rule(Condition::ChoiceIs(ids::REMOTE_WORK, "Not allowed"), "not-permitted"),
        ],
        default_variant: "office-only",
    },
    DecisionTable {
        topic: Topic::Monitoring,
        rules: &[
            rule(Condition::ChoiceIs(ids::MONITORING, "Yes, actively"), "active-monitoring"),
            rule(Condition::ChoiceIs(ids::MONITORING, "Yes, for investigations"), "investigative-monitoring"),
            rule(Condition::ChoiceIs(ids::MONITORING, "No"), "no-routine-monitoring"),
        ],
        default_variant: "reserved-right",
    },
    DecisionTable {
        topic: Topic::IncidentReporting,
        rules: &[
            rule(Condition::Flag(ids::EXTERNAL_IR_SUPPORT, true), "external-responder"),
            rule(Condition::Answered(ids::INCIDENT_MANAGER_NAME), "named-manager"),
        ],
        default_variant: "contact-role",
    },
    DecisionTable {
        topic: Topic::Enforcement,
        rules: &[rule(Condition::Flag(ids::CYBER_INSURANCE, true), "insured")],
        default_variant: "standard",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::questions::{self, QuestionKind};

    fn conditions(c: &Condition) -> Vec<Condition> {
        match c {
            Condition::All(parts) | Condition::Any(parts) => parts.iter().flat_map(conditions).collect(),
            Condition::Not(inner) => conditions(inner),
            other => vec![*other],
        }
    }

    #[test]
    fn one_table_per_topic() {
        for topic in Topic::ALL {
            let count = DECISION_TABLES.iter().filter(|t| t.topic == topic).count();
            assert_eq!(count, 1, "topic {} has {} tables", topic, count);
        }
    }

    #[test]
    fn every_selectable_variant_exists_in_catalog() {
        let catalog = Catalog::builtin();
        for table in DECISION_TABLES {
            let variants = table.rules.iter().map(|r| r.variant).chain([table.default_variant]);
            for v in variants {
                assert!(
                    catalog.variant(table.topic, v).is_some(),
                    "{} selects unknown variant {}",
                    table.topic,
                    v
                );
            }
        }
    }

    #[test]
    fn conditions_reference_known_questions_and_labels() {
        for table in DECISION_TABLES {
            for r in table.rules {
                for c in conditions(&r.when) {
                    let (q, label) = match c {
                        Condition::Flag(q, _) | Condition::Answered(q) | Condition::SelectedAtLeast(q, _) => (q, None),
                        Condition::ChoiceIs(q, l) | Condition::Includes(q, l) => (q, Some(l)),
                        _ => continue,
                    };
                    let spec = questions::lookup(q)
                        .unwrap_or_else(|| panic!("{} references unknown question {}", table.topic, q));
                    if let Some(label) = label {
                        assert!(
                            spec.kind.options().iter().any(|o| o.label == label),
                            "{}: '{}' is not an option of {}",
                            table.topic,
                            label,
                            q
                        );
                    }
                    if let Condition::Flag(..) = c {
                        assert_eq!(spec.kind, QuestionKind::YesNo, "{} is not yes/no", q);
                    }
                }
            }
        }
    }

    #[test]
    fn labels_read_like_rules() {
        let c = Condition::All(&[
            Condition::Flag(ids::MFA, true),
            Condition::ChoiceIs(ids::MFA_SCOPE, "Administrative accounts only"),
        ]);
        assert_eq!(
            c.to_string(),
            "(q9_mfa = Yes AND q27_mfa_scope = Administrative accounts only)"
        );
        assert_eq!(Condition::SizeAtLeast(SizeClass::Ig2).to_string(), "size class >= IG2");
        assert_eq!(
            Condition::Not(&Condition::Answered(ids::INCIDENT_MANAGER_NAME)).to_string(),
            "NOT q34_incident_manager_name answered"
        );
    }
}
