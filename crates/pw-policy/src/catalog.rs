// catalog.rs - Clause catalog: topics, headings and wording variants.
//
// Templates use `{{token}}` markers filled in by the assembler. Paragraphs
// are separated by a blank line; lines starting with "- " are list items.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decision::{DecisionTable, DECISION_TABLES};

/// A policy subject area. Every topic appears exactly once in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    PurposeScope,
    AcceptableUse,
    PersonalEmail,
    WebBrowsing,
    SocialMedia,
    CloudStorage,
    BrowserSync,
    RegulatoryCompliance,
    PasswordRequirements,
    MfaRequirements,
    AccountManagement,
    DeviceManagement,
    Byod,
    RemoteWork,
    Monitoring,
    IncidentReporting,
    Enforcement,
}

impl Topic {
    /// Canonical resolution order.
    pub const ALL: [Topic; 17] = [
        Topic::PurposeScope,
        Topic::AcceptableUse,
        Topic::PersonalEmail,
        Topic::WebBrowsing,
        Topic::SocialMedia,
        Topic::CloudStorage,
        Topic::BrowserSync,
        Topic::RegulatoryCompliance,
        Topic::PasswordRequirements,
        Topic::MfaRequirements,
        Topic::AccountManagement,
        Topic::DeviceManagement,
        Topic::Byod,
        Topic::RemoteWork,
        Topic::Monitoring,
        Topic::IncidentReporting,
        Topic::Enforcement,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Topic::PurposeScope => "purpose_scope",
            Topic::AcceptableUse => "acceptable_use",
            Topic::PersonalEmail => "personal_email",
            Topic::WebBrowsing => "web_browsing",
            Topic::SocialMedia => "social_media",
            Topic::CloudStorage => "cloud_storage",
            Topic::BrowserSync => "browser_sync",
            Topic::RegulatoryCompliance => "regulatory_compliance",
            Topic::PasswordRequirements => "password_requirements",
            Topic::MfaRequirements => "mfa_requirements",
            Topic::AccountManagement => "account_management",
            Topic::DeviceManagement => "device_management",
            Topic::Byod => "byod",
            Topic::RemoteWork => "remote_work",
            Topic::Monitoring => "monitoring",
            Topic::IncidentReporting => "incident_reporting",
            Topic::Enforcement => "enforcement",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One alternative wording of a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClauseVariant {
    pub id: &'static str,
    pub template: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub topic: Topic,
    pub heading: &'static str,
    pub variants: &'static [ClauseVariant],
}

const fn variant(id: &'static str, template: &'static str) -> ClauseVariant {
    ClauseVariant { id, template }
}

/// Clause catalog plus the decision tables that select from it.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    tables: Vec<DecisionTable>,
}

impl Catalog {
    /// The built-in acceptable-use catalog.
    pub fn builtin() -> Self {
        Self {
            entries: CLAUSE_CATALOG.to_vec(),
            tables: DECISION_TABLES.to_vec(),
        }
    }

    pub fn from_parts(entries: Vec<CatalogEntry>, tables: Vec<DecisionTable>) -> Self {
        Self { entries, tables }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn tables(&self) -> &[DecisionTable] {
        &self.tables
    }

    pub fn entry(&self, topic: Topic) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.topic == topic)
    }

    pub fn table(&self, topic: Topic) -> Option<&DecisionTable> {
        self.tables.iter().find(|t| t.topic == topic)
    }

    pub fn variant(&self, topic: Topic, id: &str) -> Option<&'static ClauseVariant> {
        self.entry(topic)?.variants.iter().find(|v| v.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// A macro rather than a const so `concat!` can splice it into templates.
macro_rules! prohibited_activities {
    () => {
        "Users must not use company resources to:\n\
         - engage in illegal, harassing or discriminatory activity\n\
         - access, store or distribute offensive material\n\
         - install unapproved software or circumvent security controls\n\
         - conduct personal commercial activity"
    };
}

/// Closing list shared by every acceptable-use variant.
pub const PROHIBITED_ACTIVITIES: &str = prohibited_activities!();

pub static CLAUSE_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        topic: Topic::PurposeScope,
        heading: "Purpose and Scope",
        variants: &[
            variant(
                "standard",
                "This Acceptable Use Policy defines how employees, contractors and other authorized users may use the information systems, devices, networks and data of {{company_name}}. It applies to all company-owned and company-managed technology resources and to any personal device used to access company data.\n\n\
                 This policy takes effect on {{effective_date}}. Questions about this policy should be directed to {{it_contact}}.",
            ),
            variant(
                "regulated",
                "This Acceptable Use Policy defines how employees, contractors and other authorized users may use the information systems, devices, networks and data of {{company_name}}. As an organization in the {{industry}} sector, {{company_name}} is entrusted with {{industry_data}}, and every user shares responsibility for protecting it.\n\n\
                 This policy applies to all company-owned and company-managed technology resources and to any personal device used to access company data. It takes effect on {{effective_date}}. Questions about this policy should be directed to {{it_contact}}.",
            ),
        ],
    },
    CatalogEntry {
        topic: Topic::AcceptableUse,
        heading: "Use of Company Resources",
        variants: &[
            variant(
                "no-personal-use",
                concat!(
                    "Company technology resources are provided for business purposes only. Personal use of company devices, accounts, networks and services is not permitted.\n\n",
                    prohibited_activities!()
                ),
            ),
            variant(
                "minimal-personal-use",
                concat!(
                    "Company technology resources are provided primarily for business purposes. Minimal personal use, such as a brief personal message or checking a personal appointment, is tolerated when it does not interfere with work or consume significant resources.\n\n",
                    prohibited_activities!()
                ),
            ),
            variant(
                "limited-personal-use",
                concat!(
                    "Company technology resources are provided for business purposes. Limited personal use is permitted during breaks and outside working hours, provided it does not interfere with work duties or expose the company to risk.\n\n",
                    prohibited_activities!()
                ),
            ),
            variant(
                "reasonable-personal-use",
                concat!(
                    "{{company_name}} permits reasonable personal use of company technology resources, provided it is lawful, does not interfere with job performance and does not expose the company to security, legal or reputational risk.\n\n",
                    prohibited_activities!()
                ),
            ),
        ],
    },
    CatalogEntry {
        topic: Topic::PersonalEmail,
        heading: "Email",
        variants: &[
            variant(
                "prohibited",
                "Company email accounts must be used for business communication only. Personal email accounts must not be accessed from company devices, used to conduct company business, or used to receive forwarded company information.",
            ),
            variant(
                "permitted-with-care",
                "Users may access personal email accounts from company devices. Personal email must never be used to conduct company business or to receive forwarded company information, and users must treat unexpected attachments and links with suspicion.",
            ),
        ],
    },
    CatalogEntry {
        topic: Topic::WebBrowsing,
        heading: "Internet Use",
        variants: &[
            variant(
                "business-only",
                "Internet access from company devices and networks is provided for business purposes. Browsing unrelated to work is not permitted, and users must not visit sites that host malicious, illegal or inappropriate content.",
            ),
            variant(
                "incidental-browsing",
                "Incidental personal browsing is permitted on company devices when it does not interfere with work. Users must not visit sites that host malicious, illegal or inappropriate content, and must not download software or files from untrusted sources.",
            ),
        ],
    },
    CatalogEntry {
        topic: Topic::SocialMedia,
        heading: "Social Media",
        variants: &[
            variant(
                "authorized-spokespeople",
                "Only personnel authorized by management may post on behalf of {{company_name}} on social media. Other users must not present personal opinions as company positions and must never disclose confidential information or {{industry_data}} online.",
            ),
            variant(
                "no-official-posting",
                "No user may post on behalf of {{company_name}} on social media. Users must not present personal opinions as company positions and must never disclose confidential information or {{industry_data}} online.",
            ),
            variant(
                "all-with-guidelines",
                "Employees may reference {{company_name}} on social media when following the company's communication guidelines. Identify personal opinions as your own, be respectful, and never disclose confidential information or {{industry_data}} online.",
            ),
        ],
    },
    CatalogEntry {
        topic: Topic::CloudStorage,
        heading: "Cloud Storage and File Sharing",
        variants: &[
            variant(
                "prohibited",
                "Company data must be stored only on company-managed systems. Personal or unapproved cloud storage and file-sharing services must not be used for company information.",
            ),
            variant(
                "approved-platforms",
                "Company data may be stored and shared only through cloud platforms approved by {{contact_role}}. Personal cloud storage accounts must not be used for company information.",
            ),
            variant(
                "allowed-with-classification",
                "Users may use cloud storage services for company data, provided confidential information and {{industry_data}} are stored only on platforms approved by {{contact_role}} and sharing links are restricted to intended recipients.",
            ),
        ],
    },
    CatalogEntry {
        topic: Topic::BrowserSync,
        heading: "Browser Synchronization",
        variants: &[
            variant(
                "prohibited",
                "Browser profile synchronization must be disabled on company devices. Users must not sign in to personal browser accounts that synchronize bookmarks, passwords or history from company devices.",
            ),
            variant(
                "enterprise-accounts",
                "Browser synchronization is permitted only with company-managed enterprise accounts. Personal browser accounts must not be synchronized on company devices.",
            ),
            variant(
                "allowed",
                "Browser synchronization is permitted. Users must not save company passwords in browser profiles that are shared with personal devices.",
            ),
        ],
    },
    CatalogEntry {
        topic: Topic::RegulatoryCompliance,
        heading: "Regulatory Compliance",
        variants: &[
            variant(
                "general",
                "{{company_name}} expects every user to handle company and customer information in line with applicable laws, contracts and regulations. When in doubt about how information may be used or shared, ask {{contact_role}} before acting.\n\n\
                 {{breach_notifications}}",
            ),
            variant(
                "hipaa",
                "{{company_name}} is subject to the Health Insurance Portability and Accountability Act (HIPAA). Users may access protected health information only when their job requires it, must apply the minimum necessary standard, and must report any suspected disclosure immediately.\n\n\
                 {{breach_notifications}}",
            ),
            variant(
                "pci-dss",
                "{{company_name}} handles payment card data subject to the Payment Card Industry Data Security Standard (PCI-DSS). Users must never store, transmit or write down full card numbers outside approved payment systems.\n\n\
                 {{breach_notifications}}",
            ),
            variant(
                "gdpr",
                "{{company_name}} processes personal data subject to the General Data Protection Regulation (GDPR). Users must process personal data only for its documented purpose and must report suspected personal data breaches immediately so the company can meet its notification deadline.\n\n\
                 {{breach_notifications}}",
            ),
            variant(
                "soc2",
                "{{company_name}} maintains controls aligned with SOC 2. Users must follow documented security procedures, since their actions form the evidence auditors rely on.\n\n\
                 {{breach_notifications}}",
            ),
            variant(
                "multiple-frameworks",
                "{{company_name}} is subject to the following compliance frameworks: {{compliance_frameworks}}. Users must follow the handling requirements of each framework that applies to the information they work with and report any suspected violation to {{contact_role}} immediately.\n\n\
                 {{breach_notifications}}",
            ),
            variant(
                "notification-obligations",
                "{{company_name}} has regulatory notification obligations for the information it holds. Users must report any suspected loss or disclosure of regulated information to {{contact_role}} immediately so those obligations can be met.\n\n\
                 {{breach_notifications}}",
            ),
        ],
    },
    CatalogEntry {
        topic: Topic::PasswordRequirements,
        heading: "Passwords",
        variants: &[
            variant(
                "manager-provided",
                "Passwords must be at least {{min_password_length}} characters long and unique to each account. {{company_name}} provides {{password_manager}}, which users must use to generate and store work passwords.\n\n\
                 {{password_expiry}}",
            ),
            variant(
                "manager-required",
                "Passwords must be at least {{min_password_length}} characters long and unique to each account. Organizations in CIS Implementation Group {{size_class}} must adopt a password manager; until one is deployed, users must not store passwords in plain text, spreadsheets or browser profiles.\n\n\
                 {{password_expiry}}",
            ),
            variant(
                "manager-recommended",
                "Passwords must be at least {{min_password_length}} characters long and unique to each account. Use of a reputable password manager is recommended, and users must never store passwords in plain text or share them.\n\n\
                 {{password_expiry}}",
            ),
        ],
    },
    CatalogEntry {
        topic: Topic::MfaRequirements,
        heading: "Multi-Factor Authentication",
        variants: &[
            variant(
                "required",
                "Multi-factor authentication (MFA) is required for all company accounts that support it, using {{mfa_provider}}. Users must never approve an MFA prompt they did not initiate and must report unexpected prompts to {{contact_role}}.",
            ),
            variant(
                "required-privileged",
                "Multi-factor authentication (MFA) using {{mfa_provider}} is required for all administrative and privileged accounts and is strongly recommended for all other accounts. Users must never approve an MFA prompt they did not initiate.",
            ),
            variant(
                "required-planned",
                "Multi-factor authentication (MFA) is required for organizations in CIS Implementation Group {{size_class}}. Until MFA is deployed across all systems, users must enable it wherever a service offers it, starting with email, remote access and administrative accounts.",
            ),
            variant(
                "recommended",
                "Multi-factor authentication (MFA) is recommended for all company accounts. Users should enable MFA wherever a service offers it, starting with email and financial accounts.",
            ),
        ],
    },
    CatalogEntry {
        topic: Topic::AccountManagement,
        heading: "Account Management",
        variants: &[
            variant(
                "separate-privileged-accounts",
                "Administrative privileges must be used only through dedicated administrator accounts that are separate from day-to-day user accounts. Account access is reviewed {{account_review_frequency}}, accounts inactive for {{dormant_account_days}} days are disabled, and credentials are revoked {{credential_revocation}}.\n\n\
                 {{account_lifecycle}}",
            ),
            variant(
                "shared-accounts-reviewed",
                "Administrative privileges must be limited to users who need them. Account access is reviewed {{account_review_frequency}}, accounts inactive for {{dormant_account_days}} days are disabled, and credentials are revoked {{credential_revocation}}.\n\n\
                 {{account_lifecycle}}",
            ),
        ],
    },
    CatalogEntry {
        topic: Topic::DeviceManagement,
        heading: "Company Devices",
        variants: &[
            variant(
                "mdm-enrolled",
                "All company-owned laptops, tablets and phones must be enrolled in the company's mobile device management (MDM) solution. Users must not remove management profiles, disable encryption or defer security updates.",
            ),
            variant(
                "mdm-planned",
                "Organizations in CIS Implementation Group {{size_class}} must manage devices centrally. Until a mobile device management (MDM) solution is deployed, company devices must use full-disk encryption, automatic updates and a screen lock, and must be registered with {{contact_role}}.",
            ),
            variant(
                "baseline-hardening",
                "Company devices must use full-disk encryption, automatic security updates and a screen lock of no more than 15 minutes. Lost or stolen devices must be reported to {{contact_role}} immediately.",
            ),
        ],
    },
    CatalogEntry {
        topic: Topic::Byod,
        heading: "Personal Devices (BYOD)",
        variants: &[
            variant(
                "not-permitted",
                "Personal devices are not permitted to access company systems, email or data. All company work must be performed on company-provided devices.",
            ),
            variant(
                "mdm-enrollment",
                "Personal devices may be used to access company systems only after enrollment in the company's mobile device management (MDM) solution. {{company_name}} may remotely wipe company data from an enrolled device when it is lost or stolen, or when the user leaves the company.",
            ),
            variant(
                "guest-network-only",
                "Personal devices may connect only to the guest wireless network. They must not access internal systems, company email or company data.",
            ),
        ],
    },
    CatalogEntry {
        topic: Topic::RemoteWork,
        heading: "Remote Work",
        variants: &[
            variant(
                "remote-first",
                "{{company_name}} operates remotely. Users working outside company premises must use secured home networks, lock devices when unattended, and prevent others from viewing company information.",
            ),
            variant(
                "hybrid",
                "Users may work remotely on a hybrid schedule. Remote work must be performed on company-approved devices over secured networks, and public Wi-Fi may only be used through the company VPN.",
            ),
            variant(
                "office-only",
                "Company work must be performed on company premises. Remote access to company systems requires prior approval from {{contact_role}}.",
            ),
            variant(
                "not-permitted",
                "Remote work is not permitted. Company systems must not be accessed from outside company premises.",
            ),
        ],
    },
    CatalogEntry {
        topic: Topic::Monitoring,
        heading: "Monitoring and Privacy",
        variants: &[
            variant(
                "active-monitoring",
                "{{company_name}} actively monitors the use of company devices, networks, email and accounts to protect its systems and data. Users should have no expectation of privacy when using company resources.",
            ),
            variant(
                "investigative-monitoring",
                "{{company_name}} does not routinely monitor user activity, but may review the use of company devices, networks, email and accounts during security investigations or when required by law.",
            ),
            variant(
                "no-routine-monitoring",
                "{{company_name}} does not monitor user activity on company resources. Security logs collected automatically by company systems are reviewed only to operate and protect those systems.",
            ),
            variant(
                "reserved-right",
                "{{company_name}} reserves the right to monitor and review the use of company devices, networks, email and accounts, subject to applicable law.",
            ),
        ],
    },
    CatalogEntry {
        topic: Topic::IncidentReporting,
        heading: "Reporting Security Incidents",
        variants: &[
            variant(
                "contact-role",
                "Suspected security incidents, including phishing, malware, lost devices and unauthorized access, must be reported to {{incident_contact}} {{reporting_timeframe}}. Reports may be made by {{reporting_methods}}.\n\n\
                 {{report_recipients}}\n\n\
                 Users must not attempt to investigate or remediate incidents on their own.",
            ),
            variant(
                "named-manager",
                "Suspected security incidents, including phishing, malware, lost devices and unauthorized access, must be reported to the incident manager, {{incident_contact}}, {{reporting_timeframe}}. If the incident manager is unavailable, contact {{backup_incident_contact}}. Reports may be made by {{reporting_methods}}.\n\n\
                 {{report_recipients}}\n\n\
                 Users must not attempt to investigate or remediate incidents on their own.",
            ),
            variant(
                "external-responder",
                "Suspected security incidents, including phishing, malware, lost devices and unauthorized access, must be reported to {{incident_contact}} {{reporting_timeframe}}. Reports may be made by {{reporting_methods}}.\n\n\
                 {{report_recipients}}\n\n\
                 {{company_name}} has engaged {{ir_company}} to support investigation and recovery. Users must preserve evidence and must not attempt remediation on their own.",
            ),
        ],
    },
    CatalogEntry {
        topic: Topic::Enforcement,
        heading: "Enforcement and Acknowledgment",
        variants: &[
            variant(
                "standard",
                "Violations of this policy may result in disciplinary action, up to and including termination of employment or contract, and may be reported to law enforcement where required.\n\n\
                 All users must read this policy and acknowledge that they understand it and will comply with it.\n\n\
                 Employee name: ____________________\n\n\
                 Signature: ____________________\n\n\
                 Date: ____________________",
            ),
            variant(
                "insured",
                "Violations of this policy may result in disciplinary action, up to and including termination of employment or contract, and may be reported to law enforcement where required. {{company_name}} maintains cyber insurance coverage, and prompt incident reporting under this policy is a condition of that coverage.\n\n\
                 All users must read this policy and acknowledge that they understand it and will comply with it.\n\n\
                 Employee name: ____________________\n\n\
                 Signature: ____________________\n\n\
                 Date: ____________________",
            ),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_topic_has_one_entry() {
        let catalog = Catalog::builtin();
        for topic in Topic::ALL {
            let count = catalog.entries().iter().filter(|e| e.topic == topic).count();
            assert_eq!(count, 1, "topic {} has {} entries", topic, count);
        }
        assert_eq!(catalog.entries().len(), Topic::ALL.len());
    }

    #[test]
    fn variant_ids_are_unique_per_topic() {
        for entry in CLAUSE_CATALOG {
            let mut seen = HashSet::new();
            for v in entry.variants {
                assert!(seen.insert(v.id), "{} repeats variant {}", entry.topic, v.id);
            }
        }
    }

    #[test]
    fn acceptable_use_variants_share_the_prohibited_list() {
        let entry = Catalog::builtin().entry(Topic::AcceptableUse).copied().unwrap();
        for v in entry.variants {
            assert!(
                v.template.ends_with(PROHIBITED_ACTIVITIES),
                "{} drifted from the shared list",
                v.id
            );
        }
    }

    #[test]
    fn templates_have_no_leading_indentation() {
        for entry in CLAUSE_CATALOG {
            for v in entry.variants {
                for line in v.template.lines() {
                    assert_eq!(line, line.trim_start(), "{}/{} has indented line", entry.topic, v.id);
                }
            }
        }
    }

    #[test]
    fn topic_ids_round_trip_through_serde() {
        for topic in Topic::ALL {
            let json = serde_json::to_string(&topic).unwrap();
            assert_eq!(json, format!("\"{}\"", topic.id()));
        }
    }
}
