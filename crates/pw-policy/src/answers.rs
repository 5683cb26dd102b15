// answers.rs - Raw questionnaire answers and the normalized Answer Model.
//
// `QuestionnaireAnswers` is the opaque mapping a caller submits.
// `AnswerModel::normalize` walks the question registry once, coerces every
// known answer to its typed form, applies the documented fallback for blank
// answers and rejects values of the wrong shape. Unknown keys are never read.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::profile::{OrganizationProfile, SizeClass};
use crate::questions::{self, canonical_choice, Fallback, QuestionKind, QuestionSpec, NONE_SELECTION};

/// One submitted answer, in whatever shape the questionnaire sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Integer(i64),
    Text(String),
    List(Vec<String>),
    Other(serde_json::Value),
}

impl AnswerValue {
    /// Blank strings, empty lists and `null` count as unanswered.
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Text(s) => s.trim().is_empty(),
            AnswerValue::List(items) => items.iter().all(|i| i.trim().is_empty()),
            AnswerValue::Other(v) => v.is_null(),
            AnswerValue::Bool(_) | AnswerValue::Integer(_) => false,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Bool(b) => write!(f, "{}", b),
            AnswerValue::Integer(i) => write!(f, "{}", i),
            AnswerValue::Text(s) => write!(f, "\"{}\"", s),
            AnswerValue::List(items) => write!(f, "[{}]", items.join(", ")),
            AnswerValue::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        AnswerValue::Text(s.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        AnswerValue::Text(s)
    }
}

impl From<bool> for AnswerValue {
    fn from(b: bool) -> Self {
        AnswerValue::Bool(b)
    }
}

impl From<i64> for AnswerValue {
    fn from(i: i64) -> Self {
        AnswerValue::Integer(i)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(items: Vec<&str>) -> Self {
        AnswerValue::List(items.into_iter().map(str::to_string).collect())
    }
}

/// Question id → submitted value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionnaireAnswers {
    entries: BTreeMap<String, AnswerValue>,
}

impl QuestionnaireAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.insert(id, value);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<AnswerValue>) {
        self.entries.insert(id.into(), value.into());
    }

    pub fn remove(&mut self, id: &str) -> Option<AnswerValue> {
        self.entries.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&AnswerValue> {
        self.entries.get(id)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<AnswerValue>> FromIterator<(K, V)> for QuestionnaireAnswers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut answers = QuestionnaireAnswers::new();
        for (k, v) in iter {
            answers.insert(k, v);
        }
        answers
    }
}

/// A typed answer after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Flag(bool),
    Choice(&'static str),
    /// Multi-choice selection in option-table order.
    Choices(Vec<&'static str>),
    Text(String),
    Texts(Vec<String>),
    Count(u32),
}

/// Where a normalized answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    Answered,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Entry {
    answer: Answer,
    source: AnswerSource,
}

/// Typed, validated view of a profile plus questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerModel {
    profile: OrganizationProfile,
    size_class: SizeClass,
    entries: BTreeMap<&'static str, Entry>,
}

impl AnswerModel {
    pub fn normalize(
        profile: OrganizationProfile,
        raw: &QuestionnaireAnswers,
    ) -> Result<Self, PolicyError> {
        profile.validate()?;
        let size_class = profile.effective_size_class();

        let mut entries = BTreeMap::new();
        for spec in questions::QUESTIONS {
            match raw.get(spec.id).filter(|v| !v.is_blank()) {
                Some(value) => {
                    let answer = coerce(spec, value)?;
                    entries.insert(
                        spec.id,
                        Entry {
                            answer,
                            source: AnswerSource::Answered,
                        },
                    );
                }
                None => {
                    if let Some(answer) = fallback(spec, &profile)? {
                        entries.insert(
                            spec.id,
                            Entry {
                                answer,
                                source: AnswerSource::Fallback,
                            },
                        );
                    }
                }
            }
        }

        let ignored = raw.keys().filter(|k| questions::lookup(k).is_none()).count();
        let model = Self {
            profile,
            size_class,
            entries,
        };
        tracing::debug!(
            org = %model.profile.org_key(),
            size_class = %size_class,
            fallbacks = ?model.fallbacks(),
            ignored_keys = ignored,
            "normalized questionnaire answers"
        );
        Ok(model)
    }

    pub fn profile(&self) -> &OrganizationProfile {
        &self.profile
    }

    /// Effective size class: the stricter of declared and headcount-derived.
    pub fn size_class(&self) -> SizeClass {
        self.size_class
    }

    pub fn get(&self, id: &str) -> Option<&Answer> {
        self.entries.get(id).map(|e| &e.answer)
    }

    pub fn source(&self, id: &str) -> Option<AnswerSource> {
        self.entries.get(id).map(|e| e.source)
    }

    pub fn flag(&self, id: &str) -> Option<bool> {
        match self.get(id) {
            Some(Answer::Flag(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn choice(&self, id: &str) -> Option<&'static str> {
        match self.get(id) {
            Some(Answer::Choice(label)) => Some(*label),
            _ => None,
        }
    }

    /// Selected options; empty when unanswered.
    pub fn choices(&self, id: &str) -> &[&'static str] {
        match self.get(id) {
            Some(Answer::Choices(labels)) => labels,
            _ => &[],
        }
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        match self.get(id) {
            Some(Answer::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// List items; empty when unanswered.
    pub fn texts(&self, id: &str) -> &[String] {
        match self.get(id) {
            Some(Answer::Texts(items)) => items,
            _ => &[],
        }
    }

    pub fn count(&self, id: &str) -> Option<u32> {
        match self.get(id) {
            Some(Answer::Count(n)) => Some(*n),
            _ => None,
        }
    }

    /// True only when the caller supplied the answer.
    pub fn is_answered(&self, id: &str) -> bool {
        self.source(id) == Some(AnswerSource::Answered)
    }

    /// Ids whose value came from a fallback, in id order.
    pub fn fallbacks(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|(_, e)| e.source == AnswerSource::Fallback)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn has_mfa(&self) -> bool {
        self.flag(questions::ids::MFA).unwrap_or(self.profile.has_mfa)
    }

    pub fn has_password_manager(&self) -> bool {
        self.flag(questions::ids::PASSWORD_MANAGER)
            .unwrap_or(self.profile.has_password_manager)
    }

    pub fn has_mdm(&self) -> bool {
        self.flag(questions::ids::MDM).unwrap_or(self.profile.has_mdm)
    }
}

fn fallback(spec: &QuestionSpec, profile: &OrganizationProfile) -> Result<Option<Answer>, PolicyError> {
    let answer = match spec.fallback {
        Fallback::Required => {
            tracing::warn!(question = spec.id, "required answer missing");
            return Err(PolicyError::MissingRequiredAnswer {
                question: spec.id.to_string(),
            });
        }
        Fallback::Flag(b) => Answer::Flag(b),
        Fallback::Choice(label) => Answer::Choice(label),
        Fallback::Text(text) => Answer::Text(text.to_string()),
        Fallback::Count(n) => Answer::Count(n),
        Fallback::Empty => match spec.kind {
            QuestionKind::MultiChoice(_) => Answer::Choices(Vec::new()),
            _ => Answer::Texts(Vec::new()),
        },
        Fallback::FromProfile(read) => Answer::Flag(read(profile)),
        Fallback::Unanswered => return Ok(None),
    };
    Ok(Some(answer))
}

fn coerce(spec: &QuestionSpec, value: &AnswerValue) -> Result<Answer, PolicyError> {
    let invalid = |reason: String| {
        tracing::warn!(question = spec.id, value = %value, %reason, "rejected answer");
        PolicyError::InvalidAnswer {
            question: spec.id.to_string(),
            value: value.to_string(),
            reason,
        }
    };

    match (spec.kind, value) {
        (QuestionKind::YesNo, AnswerValue::Bool(b)) => Ok(Answer::Flag(*b)),
        (QuestionKind::YesNo, AnswerValue::Text(s)) => parse_yes_no(s)
            .map(Answer::Flag)
            .ok_or_else(|| invalid("expected Yes or No".to_string())),

        (QuestionKind::Choice(options), AnswerValue::Text(s)) => canonical_choice(options, s)
            .map(Answer::Choice)
            .ok_or_else(|| invalid(expected_one_of(options))),

        (QuestionKind::MultiChoice(options), AnswerValue::Text(s)) => {
            select_many(options, std::slice::from_ref(s)).map_err(|bad| invalid(unknown_option(&bad, options)))
        }
        (QuestionKind::MultiChoice(options), AnswerValue::List(items)) => {
            select_many(options, items).map_err(|bad| invalid(unknown_option(&bad, options)))
        }

        (QuestionKind::Text, AnswerValue::Text(s)) => Ok(Answer::Text(s.trim().to_string())),
        (QuestionKind::Text, AnswerValue::Integer(i)) => Ok(Answer::Text(i.to_string())),

        (QuestionKind::TextList, AnswerValue::List(items)) => Ok(Answer::Texts(non_blank(items.iter().map(String::as_str)))),
        (QuestionKind::TextList, AnswerValue::Text(s)) => Ok(Answer::Texts(non_blank(s.split(',')))),

        (QuestionKind::Count, AnswerValue::Integer(i)) => u32::try_from(*i)
            .map(Answer::Count)
            .map_err(|_| invalid("expected a non-negative whole number".to_string())),
        (QuestionKind::Count, AnswerValue::Text(s)) => s
            .trim()
            .parse::<u32>()
            .map(Answer::Count)
            .map_err(|_| invalid("expected a non-negative whole number".to_string())),

        (kind, _) => Err(invalid(format!("expected a {} answer", kind.describe()))),
    }
}

fn parse_yes_no(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" => Some(true),
        "no" | "n" | "false" => Some(false),
        _ => None,
    }
}

/// Canonical labels in option-table order; `None` clears the selection.
fn select_many(
    options: &'static [questions::ChoiceOption],
    raw: &[String],
) -> Result<Answer, String> {
    let mut picked = vec![false; options.len()];
    for item in raw.iter().filter(|i| !i.trim().is_empty()) {
        match options.iter().position(|o| o.matches(item)) {
            Some(idx) => picked[idx] = true,
            None => return Err(item.trim().to_string()),
        }
    }
    let labels = options
        .iter()
        .zip(picked)
        .filter(|(o, p)| *p && o.label != NONE_SELECTION)
        .map(|(o, _)| o.label)
        .collect();
    Ok(Answer::Choices(labels))
}

fn non_blank<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn expected_one_of(options: &[questions::ChoiceOption]) -> String {
    let labels: Vec<&str> = options.iter().map(|o| o.label).collect();
    format!("expected one of: {}", labels.join(", "))
}

fn unknown_option(bad: &str, options: &[questions::ChoiceOption]) -> String {
    format!("unknown option '{}'; {}", bad, expected_one_of(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Industry;
    use crate::questions::ids;

    fn acme() -> OrganizationProfile {
        OrganizationProfile::new("Acme Co", Industry::Technology, SizeClass::Ig1).with_mfa(true)
    }

    fn minimal() -> QuestionnaireAnswers {
        QuestionnaireAnswers::new().with(ids::BYOD, "Not allowed")
    }

    #[test]
    fn yes_no_strings_become_flags() {
        let answers = minimal().with(ids::MDM, "No").with(ids::CYBER_INSURANCE, "yes");
        let model = AnswerModel::normalize(acme(), &answers).unwrap();
        assert_eq!(model.flag(ids::MDM), Some(false));
        assert_eq!(model.flag(ids::CYBER_INSURANCE), Some(true));
        assert!(model.is_answered(ids::MDM));
    }

    #[test]
    fn profile_flags_fill_blank_capability_answers() {
        let model = AnswerModel::normalize(acme(), &minimal()).unwrap();
        assert_eq!(model.flag(ids::MFA), Some(true));
        assert_eq!(model.flag(ids::MDM), Some(false));
        assert!(!model.is_answered(ids::MFA));
        assert!(model.fallbacks().contains(&ids::MFA));
    }

    #[test]
    fn documented_defaults_apply() {
        let model = AnswerModel::normalize(acme(), &minimal()).unwrap();
        assert_eq!(model.count(ids::PASSWORD_LENGTH_WITH_MFA), Some(8));
        assert_eq!(model.count(ids::PASSWORD_LENGTH_WITHOUT_MFA), Some(14));
        assert_eq!(model.choice(ids::ACCOUNT_REVIEW_FREQUENCY), Some("Quarterly"));
        assert_eq!(model.flag(ids::SEPARATE_ADMIN_ACCOUNTS), Some(true));
        assert_eq!(model.text(ids::REPORTING_TIMEFRAME), Some("within 24 hours"));
        assert_eq!(model.choice(ids::REMOTE_WORK), None);
        assert!(model.choices(ids::COMPLIANCE).is_empty());
    }

    #[test]
    fn blank_strings_count_as_absent() {
        let answers = minimal()
            .with(ids::INCIDENT_MANAGER_NAME, "   ")
            .with(ids::REPORTING_METHODS, AnswerValue::List(vec![]));
        let model = AnswerModel::normalize(acme(), &answers).unwrap();
        assert_eq!(model.text(ids::INCIDENT_MANAGER_NAME), None);
        assert!(!model.is_answered(ids::REPORTING_METHODS));
    }

    #[test]
    fn missing_byod_is_rejected() {
        let err = AnswerModel::normalize(acme(), &QuestionnaireAnswers::new()).unwrap_err();
        match err {
            PolicyError::MissingRequiredAnswer { question } => assert_eq!(question, ids::BYOD),
            other => panic!("unexpected error {:?}", other),
        }

        let blank = QuestionnaireAnswers::new().with(ids::BYOD, "");
        assert!(matches!(
            AnswerModel::normalize(acme(), &blank),
            Err(PolicyError::MissingRequiredAnswer { .. })
        ));
    }

    #[test]
    fn unknown_choice_is_invalid() {
        let answers = QuestionnaireAnswers::new().with(ids::BYOD, "Sometimes");
        match AnswerModel::normalize(acme(), &answers).unwrap_err() {
            PolicyError::InvalidAnswer { question, reason, .. } => {
                assert_eq!(question, ids::BYOD);
                assert!(reason.contains("Allowed with MDM"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn wrong_shape_is_invalid() {
        let answers = minimal().with(ids::MDM, 3i64);
        assert!(matches!(
            AnswerModel::normalize(acme(), &answers),
            Err(PolicyError::InvalidAnswer { .. })
        ));

        let answers = minimal().with(ids::DORMANT_ACCOUNT_DAYS, -5i64);
        assert!(matches!(
            AnswerModel::normalize(acme(), &answers),
            Err(PolicyError::InvalidAnswer { .. })
        ));
    }

    #[test]
    fn multi_choice_is_canonical_and_ordered() {
        let answers = minimal().with(ids::COMPLIANCE, vec!["gdpr", "HIPAA", "GDPR"]);
        let model = AnswerModel::normalize(acme(), &answers).unwrap();
        assert_eq!(model.choices(ids::COMPLIANCE), &["HIPAA", "GDPR"]);

        let none = minimal().with(ids::COMPLIANCE, vec!["None"]);
        let model = AnswerModel::normalize(acme(), &none).unwrap();
        assert!(model.choices(ids::COMPLIANCE).is_empty());
        assert!(model.is_answered(ids::COMPLIANCE));
    }

    #[test]
    fn counts_accept_numeric_strings() {
        let answers = minimal().with(ids::DORMANT_ACCOUNT_DAYS, "60");
        let model = AnswerModel::normalize(acme(), &answers).unwrap();
        assert_eq!(model.count(ids::DORMANT_ACCOUNT_DAYS), Some(60));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let answers: QuestionnaireAnswers = serde_json::from_str(
            r#"{
                "q23_byod": "Guest network only",
                "q1_company_name": "Ignored Inc",
                "selected_policies": {"acceptable_use": true},
                "q39_incident_reporting_methods": ["Email", "Phone"]
            }"#,
        )
        .unwrap();
        let model = AnswerModel::normalize(acme(), &answers).unwrap();
        assert_eq!(model.choice(ids::BYOD), Some("Guest network only"));
        assert_eq!(model.texts(ids::REPORTING_METHODS), &["Email", "Phone"]);
        assert_eq!(model.profile().company_name, "Acme Co");
    }

    #[test]
    fn headcount_raises_size_class() {
        let profile = acme().with_employee_count(6000);
        let model = AnswerModel::normalize(profile, &minimal()).unwrap();
        assert_eq!(model.size_class(), SizeClass::Ig3);
    }
}
