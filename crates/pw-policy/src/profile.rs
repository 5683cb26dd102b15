// profile.rs - Organization profile supplied alongside the questionnaire.
//
// The profile carries the facts an organization declared when it signed up:
// its name, industry, CIS implementation group and a handful of capability
// flags that act as fallbacks for unanswered questions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Employee-count thresholds for each size class, ascending.
///
/// An organization belongs to the last class whose threshold its headcount
/// reaches.
pub const SIZE_CLASS_BOUNDARIES: &[(u32, SizeClass)] = &[
    (0, SizeClass::Ig1),
    (500, SizeClass::Ig2),
    (5000, SizeClass::Ig3),
];

/// Industry sector. Labels outside the known set are kept as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Industry {
    Healthcare,
    Finance,
    Technology,
    Retail,
    Government,
    Other,
}

impl Industry {
    pub const ALL: [Industry; 6] = [
        Industry::Healthcare,
        Industry::Finance,
        Industry::Technology,
        Industry::Retail,
        Industry::Government,
        Industry::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Industry::Healthcare => "Healthcare",
            Industry::Finance => "Finance",
            Industry::Technology => "Technology",
            Industry::Retail => "Retail",
            Industry::Government => "Government",
            Industry::Other => "Other",
        }
    }

    /// Case-insensitive parse; anything unrecognized becomes `Other`.
    pub fn parse(raw: &str) -> Self {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|i| i.label().eq_ignore_ascii_case(wanted))
            .unwrap_or(Industry::Other)
    }
}

impl From<String> for Industry {
    fn from(raw: String) -> Self {
        Industry::parse(&raw)
    }
}

impl From<Industry> for String {
    fn from(industry: Industry) -> Self {
        industry.label().to_string()
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// CIS Controls implementation group. Ordered from smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SizeClass {
    Ig1,
    Ig2,
    Ig3,
}

impl SizeClass {
    pub fn label(&self) -> &'static str {
        match self {
            SizeClass::Ig1 => "IG1",
            SizeClass::Ig2 => "IG2",
            SizeClass::Ig3 => "IG3",
        }
    }

    /// Size class implied by a headcount.
    pub fn for_employee_count(count: u32) -> Self {
        SIZE_CLASS_BOUNDARIES
            .iter()
            .take_while(|(threshold, _)| count >= *threshold)
            .map(|(_, class)| *class)
            .last()
            .unwrap_or(SizeClass::Ig1)
    }

    /// Accepts "IG2" as well as the long form "IG2 (500-5000 employees)".
    pub fn parse(raw: &str) -> Result<Self, String> {
        let code: String = raw
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        match code.to_ascii_uppercase().as_str() {
            "IG1" => Ok(SizeClass::Ig1),
            "IG2" => Ok(SizeClass::Ig2),
            "IG3" => Ok(SizeClass::Ig3),
            _ => Err(format!(
                "unknown size class '{}': expected IG1, IG2 or IG3",
                raw.trim()
            )),
        }
    }
}

impl TryFrom<String> for SizeClass {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        SizeClass::parse(&raw)
    }
}

impl From<SizeClass> for String {
    fn from(class: SizeClass) -> Self {
        class.label().to_string()
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Organization facts captured outside the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationProfile {
    /// Stable identifier from the account system, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    pub company_name: String,
    pub industry: Industry,
    pub size: SizeClass,
    #[serde(default)]
    pub employee_count: u32,
    #[serde(default)]
    pub has_mfa: bool,
    #[serde(default)]
    pub has_password_manager: bool,
    #[serde(default)]
    pub has_mdm: bool,
}

impl OrganizationProfile {
    pub fn new(company_name: impl Into<String>, industry: Industry, size: SizeClass) -> Self {
        Self {
            org_id: None,
            company_name: company_name.into(),
            industry,
            size,
            employee_count: 0,
            has_mfa: false,
            has_password_manager: false,
            has_mdm: false,
        }
    }

    pub fn with_org_id(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    pub fn with_employee_count(mut self, count: u32) -> Self {
        self.employee_count = count;
        self
    }

    pub fn with_mfa(mut self, has_mfa: bool) -> Self {
        self.has_mfa = has_mfa;
        self
    }

    pub fn with_password_manager(mut self, has_password_manager: bool) -> Self {
        self.has_password_manager = has_password_manager;
        self
    }

    pub fn with_mdm(mut self, has_mdm: bool) -> Self {
        self.has_mdm = has_mdm;
        self
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.company_name.trim().is_empty() {
            return Err(PolicyError::InvalidProfile {
                field: "company_name",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Key used to tell organizations apart in filenames and the ledger:
    /// the org id when present, otherwise the trimmed company name.
    pub fn org_key(&self) -> &str {
        match self.org_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id,
            _ => self.company_name.trim(),
        }
    }

    /// The stricter of the declared size class and the one implied by headcount.
    pub fn effective_size_class(&self) -> SizeClass {
        self.size
            .max(SizeClass::for_employee_count(self.employee_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_class_from_boundaries() {
        assert_eq!(SizeClass::for_employee_count(0), SizeClass::Ig1);
        assert_eq!(SizeClass::for_employee_count(499), SizeClass::Ig1);
        assert_eq!(SizeClass::for_employee_count(500), SizeClass::Ig2);
        assert_eq!(SizeClass::for_employee_count(4999), SizeClass::Ig2);
        assert_eq!(SizeClass::for_employee_count(5000), SizeClass::Ig3);
    }

    #[test]
    fn size_class_accepts_long_labels() {
        assert_eq!(SizeClass::parse("IG1 (<500 employees)"), Ok(SizeClass::Ig1));
        assert_eq!(SizeClass::parse(" ig3"), Ok(SizeClass::Ig3));
        assert!(SizeClass::parse("IG4").is_err());
        assert!(SizeClass::parse("").is_err());
    }

    #[test]
    fn unknown_industry_becomes_other() {
        assert_eq!(Industry::parse("healthcare"), Industry::Healthcare);
        assert_eq!(Industry::parse("Aerospace"), Industry::Other);
    }

    #[test]
    fn effective_size_class_takes_the_stricter() {
        let declared_small = OrganizationProfile::new("Acme", Industry::Retail, SizeClass::Ig1)
            .with_employee_count(800);
        assert_eq!(declared_small.effective_size_class(), SizeClass::Ig2);

        let declared_large = OrganizationProfile::new("Acme", Industry::Retail, SizeClass::Ig3)
            .with_employee_count(10);
        assert_eq!(declared_large.effective_size_class(), SizeClass::Ig3);
    }

    #[test]
    fn empty_company_name_is_rejected() {
        let profile = OrganizationProfile::new("   ", Industry::Other, SizeClass::Ig1);
        let err = profile.validate().unwrap_err();
        assert!(matches!(
            err,
            PolicyError::InvalidProfile {
                field: "company_name",
                ..
            }
        ));
    }

    #[test]
    fn org_key_prefers_org_id() {
        let profile = OrganizationProfile::new(" Acme ", Industry::Other, SizeClass::Ig1);
        assert_eq!(profile.org_key(), "Acme");
        let profile = profile.with_org_id("org-42");
        assert_eq!(profile.org_key(), "org-42");
    }

    #[test]
    fn profile_deserializes_from_signup_json() {
        let json = r#"{
            "company_name": "Northwind",
            "industry": "Finance",
            "size": "IG2 (500-5000 employees)",
            "employee_count": 1200,
            "has_mfa": true
        }"#;
        let profile: OrganizationProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.industry, Industry::Finance);
        assert_eq!(profile.size, SizeClass::Ig2);
        assert!(profile.has_mfa);
        assert!(!profile.has_mdm);
        assert!(profile.org_id.is_none());
    }
}
