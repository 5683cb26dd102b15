// questions.rs - Static registry of questionnaire questions.
//
// Each question declares its answer shape and what happens when the caller
// leaves it blank. The Answer Model walks this table once per generation, so
// every fallback in the document is visible here rather than scattered
// through template code.

use crate::profile::OrganizationProfile;

/// Stable question identifiers, as submitted by the questionnaire.
pub mod ids {
    pub const COMPLIANCE: &str = "q5_compliance";
    pub const HAS_IT: &str = "q6_has_it";
    pub const IT_EMAIL: &str = "q7_it_email";
    pub const IT_PHONE: &str = "q8_it_phone";
    pub const MFA: &str = "q9_mfa";
    pub const MFA_NAME: &str = "q10_mfa_name";
    pub const PASSWORD_MANAGER: &str = "q11_password_manager";
    pub const PASSWORD_MANAGER_NAME: &str = "q12_password_manager_name";
    pub const MDM: &str = "q13_mdm";
    pub const REMOTE_WORK: &str = "q14_remote_work";
    pub const CYBER_INSURANCE: &str = "q15_cyber_insurance";
    pub const PERSONAL_USE: &str = "q16_personal_use";
    pub const PERSONAL_EMAIL: &str = "q17_personal_email";
    pub const PERSONAL_WEBSITES: &str = "q18_personal_websites";
    pub const BROWSER_SYNC: &str = "q19_browser_sync";
    pub const CLOUD_STORAGE: &str = "q20_cloud_storage";
    pub const MONITORING: &str = "q21_monitoring";
    pub const SOCIAL_MEDIA: &str = "q22_social_media";
    pub const BYOD: &str = "q23_byod";
    pub const PASSWORD_LENGTH_WITH_MFA: &str = "q24_password_length_with_mfa";
    pub const PASSWORD_LENGTH_WITHOUT_MFA: &str = "q25_password_length_without_mfa";
    pub const PASSWORDS_EXPIRE: &str = "q26_passwords_expire";
    pub const PASSWORD_EXPIRY_DAYS: &str = "q26_password_expiry_days";
    pub const MFA_SCOPE: &str = "q27_mfa_scope";
    pub const SEPARATE_ADMIN_ACCOUNTS: &str = "q28_separate_admin_accounts";
    pub const ACCOUNT_REVIEW_FREQUENCY: &str = "q29_account_review_frequency";
    pub const DORMANT_ACCOUNT_DAYS: &str = "q30_dormant_account_days";
    pub const EXTENDED_LEAVE: &str = "q31_extended_leave_policy";
    pub const CREDENTIAL_REVOCATION: &str = "q32_credential_revocation_timeline";
    pub const ACCOUNT_INVENTORY: &str = "q33_maintain_account_inventory";
    pub const INCIDENT_MANAGER_NAME: &str = "q34_incident_manager_name";
    pub const INCIDENT_MANAGER_EMAIL: &str = "q35_incident_manager_email";
    pub const INCIDENT_MANAGER_PHONE: &str = "q36_incident_manager_phone";
    pub const BACKUP_INCIDENT_MANAGER: &str = "q38_backup_incident_manager";
    pub const REPORTING_METHODS: &str = "q39_incident_reporting_methods";
    pub const REPORT_RECIPIENTS: &str = "q40_incident_report_recipients";
    pub const REPORTING_TIMEFRAME: &str = "q41_incident_reporting_timeframe";
    pub const EXTERNAL_IR_SUPPORT: &str = "q42_external_ir_support";
    pub const IR_COMPANY_NAME: &str = "q42_ir_company_name";
    pub const HIPAA_NOTIFICATION: &str = "q43_hipaa_notification";
    pub const GDPR_NOTIFICATION: &str = "q44_gdpr_notification";
    pub const OTHER_NOTIFICATIONS: &str = "q45_other_regulatory_notifications";
}

/// Selecting this option in a multi-choice question clears the selection.
pub const NONE_SELECTION: &str = "None";

/// One selectable option: its canonical label plus accepted alternatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: &'static str,
    pub aliases: &'static [&'static str],
}

impl ChoiceOption {
    pub fn matches(&self, raw: &str) -> bool {
        let raw = raw.trim();
        self.label.eq_ignore_ascii_case(raw) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(raw))
    }
}

const fn option(label: &'static str) -> ChoiceOption {
    ChoiceOption { label, aliases: &[] }
}

const fn aliased(label: &'static str, aliases: &'static [&'static str]) -> ChoiceOption {
    ChoiceOption { label, aliases }
}

/// Canonical label for a raw choice, if it matches any option.
pub fn canonical_choice(options: &[ChoiceOption], raw: &str) -> Option<&'static str> {
    options.iter().find(|o| o.matches(raw)).map(|o| o.label)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    YesNo,
    Choice(&'static [ChoiceOption]),
    MultiChoice(&'static [ChoiceOption]),
    Text,
    TextList,
    Count,
}

impl QuestionKind {
    pub fn describe(&self) -> &'static str {
        match self {
            QuestionKind::YesNo => "yes/no",
            QuestionKind::Choice(_) => "choice",
            QuestionKind::MultiChoice(_) => "multi-choice",
            QuestionKind::Text => "text",
            QuestionKind::TextList => "text list",
            QuestionKind::Count => "count",
        }
    }

    pub fn options(&self) -> &'static [ChoiceOption] {
        match self {
            QuestionKind::Choice(options) | QuestionKind::MultiChoice(options) => options,
            _ => &[],
        }
    }
}

/// What a blank answer turns into.
#[derive(Debug, Clone, Copy)]
pub enum Fallback {
    /// No fallback; a blank answer aborts generation.
    Required,
    Flag(bool),
    Choice(&'static str),
    Text(&'static str),
    Count(u32),
    /// An empty selection or list.
    Empty,
    /// A capability flag read from the organization profile.
    FromProfile(fn(&OrganizationProfile) -> bool),
    /// Stays absent; decision tables and token providers apply their own default.
    Unanswered,
}

impl Fallback {
    pub fn describe(&self) -> String {
        match self {
            Fallback::Required => "required".to_string(),
            Fallback::Flag(true) => "Yes".to_string(),
            Fallback::Flag(false) => "No".to_string(),
            Fallback::Choice(label) | Fallback::Text(label) => format!("\"{}\"", label),
            Fallback::Count(n) => n.to_string(),
            Fallback::Empty => "empty".to_string(),
            Fallback::FromProfile(_) => "from profile".to_string(),
            Fallback::Unanswered => "unanswered".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QuestionSpec {
    pub id: &'static str,
    pub kind: QuestionKind,
    pub fallback: Fallback,
}

const fn question(id: &'static str, kind: QuestionKind, fallback: Fallback) -> QuestionSpec {
    QuestionSpec { id, kind, fallback }
}

pub const COMPLIANCE_OPTIONS: &[ChoiceOption] = &[
    option("HIPAA"),
    option("PCI-DSS"),
    option("GDPR"),
    option("SOC2"),
    option(NONE_SELECTION),
];

pub const REMOTE_WORK_OPTIONS: &[ChoiceOption] = &[
    option("Fully remote"),
    option("Hybrid"),
    option("Office only"),
    option("Not allowed"),
];

pub const PERSONAL_USE_OPTIONS: &[ChoiceOption] = &[
    option("Prohibited"),
    option("Minimal"),
    option("Limited"),
    option("Reasonable"),
];

pub const BROWSER_SYNC_OPTIONS: &[ChoiceOption] = &[
    option("Prohibited"),
    option("Enterprise accounts only"),
    option("Allowed"),
];

pub const CLOUD_STORAGE_OPTIONS: &[ChoiceOption] = &[
    option("Prohibited"),
    option("Approved platforms only"),
    option("Allowed"),
];

pub const MONITORING_OPTIONS: &[ChoiceOption] = &[
    option("Yes, actively"),
    option("Yes, for investigations"),
    option("No"),
];

pub const SOCIAL_MEDIA_OPTIONS: &[ChoiceOption] = &[
    aliased("Authorized only", &["Authorized personnel only"]),
    option("No one"),
    aliased("All with guidelines", &["All employees with guidelines"]),
];

pub const BYOD_OPTIONS: &[ChoiceOption] = &[
    option("Not allowed"),
    aliased("Allowed with MDM", &["Allowed with MDM enrollment"]),
    option("Guest network only"),
];

pub const MFA_SCOPE_OPTIONS: &[ChoiceOption] = &[
    option("All accounts"),
    option("Remote and external access"),
    option("Administrative accounts only"),
];

pub const REVIEW_FREQUENCY_OPTIONS: &[ChoiceOption] = &[
    option("Monthly"),
    option("Quarterly"),
    option("Semi-annually"),
    option("Annually"),
];

pub const EXTENDED_LEAVE_OPTIONS: &[ChoiceOption] = &[
    aliased("Disable during leave", &["Disable accounts during leave"]),
    aliased("Review before leave", &["Review access before leave"]),
    option("No change"),
];

// Timelines are written so they read inside a sentence once lowercased.
pub const HIPAA_NOTIFICATION_OPTIONS: &[ChoiceOption] = &[
    aliased("Within 60 days", &["60 days", "Within 60 days of discovery"]),
    aliased("Within 30 days", &["30 days"]),
    aliased("Within 10 days", &["10 days"]),
];

pub const GDPR_NOTIFICATION_OPTIONS: &[ChoiceOption] = &[
    aliased("Within 72 hours", &["72 hours"]),
    aliased("Within 48 hours", &["48 hours"]),
    aliased("Within 24 hours", &["24 hours"]),
];

fn profile_has_mfa(profile: &OrganizationProfile) -> bool {
    profile.has_mfa
}

fn profile_has_password_manager(profile: &OrganizationProfile) -> bool {
    profile.has_password_manager
}

fn profile_has_mdm(profile: &OrganizationProfile) -> bool {
    profile.has_mdm
}

/// Every question the engine reads, in questionnaire order.
pub static QUESTIONS: &[QuestionSpec] = &[
    question(ids::COMPLIANCE, QuestionKind::MultiChoice(COMPLIANCE_OPTIONS), Fallback::Empty),
    question(ids::HAS_IT, QuestionKind::YesNo, Fallback::Flag(false)),
    question(ids::IT_EMAIL, QuestionKind::Text, Fallback::Unanswered),
    question(ids::IT_PHONE, QuestionKind::Text, Fallback::Unanswered),
    question(ids::MFA, QuestionKind::YesNo, Fallback::FromProfile(profile_has_mfa)),
    question(ids::MFA_NAME, QuestionKind::Text, Fallback::Unanswered),
    question(
        ids::PASSWORD_MANAGER,
        QuestionKind::YesNo,
        Fallback::FromProfile(profile_has_password_manager),
    ),
    question(ids::PASSWORD_MANAGER_NAME, QuestionKind::Text, Fallback::Unanswered),
    question(ids::MDM, QuestionKind::YesNo, Fallback::FromProfile(profile_has_mdm)),
    question(ids::REMOTE_WORK, QuestionKind::Choice(REMOTE_WORK_OPTIONS), Fallback::Unanswered),
    question(ids::CYBER_INSURANCE, QuestionKind::YesNo, Fallback::Flag(false)),
    question(ids::PERSONAL_USE, QuestionKind::Choice(PERSONAL_USE_OPTIONS), Fallback::Unanswered),
    question(ids::PERSONAL_EMAIL, QuestionKind::YesNo, Fallback::Unanswered),
    question(ids::PERSONAL_WEBSITES, QuestionKind::YesNo, Fallback::Unanswered),
    question(ids::BROWSER_SYNC, QuestionKind::Choice(BROWSER_SYNC_OPTIONS), Fallback::Unanswered),
    question(ids::CLOUD_STORAGE, QuestionKind::Choice(CLOUD_STORAGE_OPTIONS), Fallback::Unanswered),
    question(ids::MONITORING, QuestionKind::Choice(MONITORING_OPTIONS), Fallback::Unanswered),
    question(ids::SOCIAL_MEDIA, QuestionKind::Choice(SOCIAL_MEDIA_OPTIONS), Fallback::Unanswered),
    question(ids::BYOD, QuestionKind::Choice(BYOD_OPTIONS), Fallback::Required),
    question(ids::PASSWORD_LENGTH_WITH_MFA, QuestionKind::Count, Fallback::Count(8)),
    question(ids::PASSWORD_LENGTH_WITHOUT_MFA, QuestionKind::Count, Fallback::Count(14)),
    question(ids::PASSWORDS_EXPIRE, QuestionKind::YesNo, Fallback::Flag(false)),
    question(ids::PASSWORD_EXPIRY_DAYS, QuestionKind::Count, Fallback::Count(90)),
    question(ids::MFA_SCOPE, QuestionKind::Choice(MFA_SCOPE_OPTIONS), Fallback::Unanswered),
    question(ids::SEPARATE_ADMIN_ACCOUNTS, QuestionKind::YesNo, Fallback::Flag(true)),
    question(
        ids::ACCOUNT_REVIEW_FREQUENCY,
        QuestionKind::Choice(REVIEW_FREQUENCY_OPTIONS),
        Fallback::Choice("Quarterly"),
    ),
    question(ids::DORMANT_ACCOUNT_DAYS, QuestionKind::Count, Fallback::Count(45)),
    question(ids::EXTENDED_LEAVE, QuestionKind::Choice(EXTENDED_LEAVE_OPTIONS), Fallback::Unanswered),
    question(
        ids::CREDENTIAL_REVOCATION,
        QuestionKind::Text,
        Fallback::Text("within 24 hours of separation"),
    ),
    question(ids::ACCOUNT_INVENTORY, QuestionKind::YesNo, Fallback::Flag(false)),
    question(ids::INCIDENT_MANAGER_NAME, QuestionKind::Text, Fallback::Unanswered),
    question(ids::INCIDENT_MANAGER_EMAIL, QuestionKind::Text, Fallback::Unanswered),
    question(ids::INCIDENT_MANAGER_PHONE, QuestionKind::Text, Fallback::Unanswered),
    question(ids::BACKUP_INCIDENT_MANAGER, QuestionKind::Text, Fallback::Unanswered),
    question(ids::REPORTING_METHODS, QuestionKind::TextList, Fallback::Empty),
    question(ids::REPORT_RECIPIENTS, QuestionKind::Text, Fallback::Unanswered),
    question(ids::REPORTING_TIMEFRAME, QuestionKind::Text, Fallback::Text("within 24 hours")),
    question(ids::EXTERNAL_IR_SUPPORT, QuestionKind::YesNo, Fallback::Flag(false)),
    question(ids::IR_COMPANY_NAME, QuestionKind::Text, Fallback::Unanswered),
    // Statutory timelines fill in when these are blank; see breach_notifications.
    question(
        ids::HIPAA_NOTIFICATION,
        QuestionKind::Choice(HIPAA_NOTIFICATION_OPTIONS),
        Fallback::Unanswered,
    ),
    question(
        ids::GDPR_NOTIFICATION,
        QuestionKind::Choice(GDPR_NOTIFICATION_OPTIONS),
        Fallback::Unanswered,
    ),
    question(ids::OTHER_NOTIFICATIONS, QuestionKind::TextList, Fallback::Empty),
];

pub fn lookup(id: &str) -> Option<&'static QuestionSpec> {
    QUESTIONS.iter().find(|q| q.id == id)
}

/// Ids of questions that abort generation when left blank.
pub fn required_questions() -> Vec<&'static str> {
    QUESTIONS
        .iter()
        .filter(|q| matches!(q.fallback, Fallback::Required))
        .map(|q| q.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn question_ids_are_unique() {
        let mut seen = HashSet::new();
        for q in QUESTIONS {
            assert!(seen.insert(q.id), "duplicate question id {}", q.id);
        }
    }

    #[test]
    fn byod_is_the_only_required_question() {
        assert_eq!(required_questions(), vec![ids::BYOD]);
    }

    #[test]
    fn aliases_resolve_to_canonical_labels() {
        assert_eq!(
            canonical_choice(BYOD_OPTIONS, "allowed with mdm enrollment"),
            Some("Allowed with MDM")
        );
        assert_eq!(canonical_choice(BYOD_OPTIONS, " Not Allowed "), Some("Not allowed"));
        assert_eq!(
            canonical_choice(SOCIAL_MEDIA_OPTIONS, "All employees with guidelines"),
            Some("All with guidelines")
        );
        assert_eq!(canonical_choice(BYOD_OPTIONS, "Sometimes"), None);
        assert_eq!(
            canonical_choice(GDPR_NOTIFICATION_OPTIONS, "72 hours"),
            Some("Within 72 hours")
        );
    }

    #[test]
    fn choice_fallbacks_are_valid_options() {
        for q in QUESTIONS {
            if let Fallback::Choice(label) = q.fallback {
                assert!(
                    q.kind.options().iter().any(|o| o.label == label),
                    "fallback '{}' of {} is not an option",
                    label,
                    q.id
                );
            }
        }
    }

    #[test]
    fn profile_fallbacks_read_the_matching_flag() {
        use crate::profile::{Industry, SizeClass};
        let profile = OrganizationProfile::new("Acme", Industry::Other, SizeClass::Ig1)
            .with_mdm(true);
        let mdm = lookup(ids::MDM).unwrap();
        let mfa = lookup(ids::MFA).unwrap();
        match (mdm.fallback, mfa.fallback) {
            (Fallback::FromProfile(read_mdm), Fallback::FromProfile(read_mfa)) => {
                assert!(read_mdm(&profile));
                assert!(!read_mfa(&profile));
            }
            other => panic!("unexpected fallbacks {:?}", other),
        }
    }
}
