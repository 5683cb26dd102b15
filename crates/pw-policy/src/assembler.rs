// assembler.rs - Document Assembler: section layout and token substitution.
//
// Clauses are placed by a fixed, versioned layout table, never by the order
// answers arrived in. Templates are scanned once: literal text is copied,
// each `{{token}}` marker is replaced by its provider's value, and the
// result is never rescanned, so answers cannot inject new markers.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::answers::AnswerModel;
use crate::catalog::Topic;
use crate::document::{DocumentMetadata, DocumentTree, ResolvedClause, Section, DOCUMENT_TITLE, POLICY_TYPE};
use crate::error::PolicyError;
use crate::profile::Industry;
use crate::questions::ids;
use crate::resolver::ClauseSelection;

pub const LAYOUT_VERSION: &str = "aup-layout-v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpec {
    pub heading: &'static str,
    pub topics: &'static [Topic],
}

pub static SECTION_LAYOUT: &[SectionSpec] = &[
    SectionSpec {
        heading: "Purpose and Scope",
        topics: &[Topic::PurposeScope],
    },
    SectionSpec {
        heading: "Acceptable Use of Company Resources",
        topics: &[
            Topic::AcceptableUse,
            Topic::PersonalEmail,
            Topic::WebBrowsing,
            Topic::SocialMedia,
        ],
    },
    SectionSpec {
        heading: "Data Protection",
        topics: &[Topic::CloudStorage, Topic::BrowserSync, Topic::RegulatoryCompliance],
    },
    SectionSpec {
        heading: "Access Control",
        topics: &[
            Topic::PasswordRequirements,
            Topic::MfaRequirements,
            Topic::AccountManagement,
        ],
    },
    SectionSpec {
        heading: "Devices and Remote Work",
        topics: &[Topic::DeviceManagement, Topic::Byod, Topic::RemoteWork],
    },
    SectionSpec {
        heading: "Monitoring and Privacy",
        topics: &[Topic::Monitoring],
    },
    SectionSpec {
        heading: "Incident Reporting",
        topics: &[Topic::IncidentReporting],
    },
    SectionSpec {
        heading: "Enforcement and Acknowledgment",
        topics: &[Topic::Enforcement],
    },
];

/// Inputs available to token providers.
#[derive(Debug, Clone, Copy)]
pub struct TokenContext<'a> {
    pub model: &'a AnswerModel,
    pub generated_at: DateTime<Utc>,
}

impl<'a> TokenContext<'a> {
    pub fn new(model: &'a AnswerModel, generated_at: DateTime<Utc>) -> Self {
        Self { model, generated_at }
    }
}

pub type TokenProvider = fn(&TokenContext<'_>) -> String;

/// Every token a template may reference, with the function that fills it.
pub static TOKEN_PROVIDERS: &[(&str, TokenProvider)] = &[
    ("company_name", company_name),
    ("effective_date", effective_date),
    ("industry", industry),
    ("industry_data", industry_data),
    ("size_class", size_class),
    ("contact_role", contact_role),
    ("it_contact", it_contact),
    ("mfa_provider", mfa_provider),
    ("password_manager", password_manager),
    ("min_password_length", min_password_length),
    ("password_expiry", password_expiry),
    ("account_review_frequency", account_review_frequency),
    ("dormant_account_days", dormant_account_days),
    ("credential_revocation", credential_revocation),
    ("incident_contact", incident_contact),
    ("backup_incident_contact", backup_incident_contact),
    ("reporting_timeframe", reporting_timeframe),
    ("reporting_methods", reporting_methods),
    ("ir_company", ir_company),
    ("compliance_frameworks", compliance_frameworks),
    ("breach_notifications", breach_notifications),
    ("report_recipients", report_recipients),
    ("account_lifecycle", account_lifecycle),
];

pub fn provider(name: &str) -> Option<TokenProvider> {
    TOKEN_PROVIDERS.iter().find(|(n, _)| *n == name).map(|(_, f)| *f)
}

fn company_name(ctx: &TokenContext<'_>) -> String {
    ctx.model.profile().company_name.trim().to_string()
}

fn effective_date(ctx: &TokenContext<'_>) -> String {
    ctx.generated_at.format("%B %-d, %Y").to_string()
}

fn industry(ctx: &TokenContext<'_>) -> String {
    ctx.model.profile().industry.label().to_string()
}

fn industry_data(ctx: &TokenContext<'_>) -> String {
    match ctx.model.profile().industry {
        Industry::Healthcare => "protected health information (PHI)",
        Industry::Finance => "customer financial records and account data",
        Industry::Technology => "customer data, source code and intellectual property",
        Industry::Retail => "customer and payment card data",
        Industry::Government => "government and citizen records",
        Industry::Other => "customer and business data",
    }
    .to_string()
}

fn size_class(ctx: &TokenContext<'_>) -> String {
    ctx.model.size_class().label().to_string()
}

/// Defaults to "management" unless the organization has an IT function.
fn contact_role(ctx: &TokenContext<'_>) -> String {
    if ctx.model.flag(ids::HAS_IT) == Some(true) {
        "the IT Department".to_string()
    } else {
        "management".to_string()
    }
}

fn with_details(name: String, details: &[Option<&str>]) -> String {
    let details: Vec<&str> = details.iter().flatten().copied().collect();
    if details.is_empty() {
        name
    } else {
        format!("{} ({})", name, details.join(", "))
    }
}

fn it_contact(ctx: &TokenContext<'_>) -> String {
    with_details(
        contact_role(ctx),
        &[ctx.model.text(ids::IT_EMAIL), ctx.model.text(ids::IT_PHONE)],
    )
}

fn mfa_provider(ctx: &TokenContext<'_>) -> String {
    ctx.model
        .text(ids::MFA_NAME)
        .map(str::to_string)
        .unwrap_or_else(|| "the company-approved MFA solution".to_string())
}

fn password_manager(ctx: &TokenContext<'_>) -> String {
    ctx.model
        .text(ids::PASSWORD_MANAGER_NAME)
        .map(str::to_string)
        .unwrap_or_else(|| "a company-approved password manager".to_string())
}

fn min_password_length(ctx: &TokenContext<'_>) -> String {
    let length = if ctx.model.has_mfa() {
        ctx.model.count(ids::PASSWORD_LENGTH_WITH_MFA).unwrap_or(8)
    } else {
        ctx.model.count(ids::PASSWORD_LENGTH_WITHOUT_MFA).unwrap_or(14)
    };
    length.to_string()
}

fn password_expiry(ctx: &TokenContext<'_>) -> String {
    if ctx.model.flag(ids::PASSWORDS_EXPIRE) == Some(true) {
        let days = ctx.model.count(ids::PASSWORD_EXPIRY_DAYS).unwrap_or(90);
        format!("Passwords must be changed every {} days.", days)
    } else {
        "Passwords do not expire on a schedule, but must be changed immediately when compromise is known or suspected."
            .to_string()
    }
}

fn account_review_frequency(ctx: &TokenContext<'_>) -> String {
    match ctx.model.choice(ids::ACCOUNT_REVIEW_FREQUENCY) {
        Some("Monthly") => "monthly",
        Some("Semi-annually") => "every six months",
        Some("Annually") => "annually",
        _ => "quarterly",
    }
    .to_string()
}

fn dormant_account_days(ctx: &TokenContext<'_>) -> String {
    ctx.model.count(ids::DORMANT_ACCOUNT_DAYS).unwrap_or(45).to_string()
}

fn credential_revocation(ctx: &TokenContext<'_>) -> String {
    ctx.model
        .text(ids::CREDENTIAL_REVOCATION)
        .unwrap_or("within 24 hours of separation")
        .to_string()
}

fn incident_contact(ctx: &TokenContext<'_>) -> String {
    match ctx.model.text(ids::INCIDENT_MANAGER_NAME) {
        Some(name) => with_details(
            name.to_string(),
            &[
                ctx.model.text(ids::INCIDENT_MANAGER_EMAIL),
                ctx.model.text(ids::INCIDENT_MANAGER_PHONE),
            ],
        ),
        None => it_contact(ctx),
    }
}

fn backup_incident_contact(ctx: &TokenContext<'_>) -> String {
    ctx.model
        .text(ids::BACKUP_INCIDENT_MANAGER)
        .map(str::to_string)
        .unwrap_or_else(|| contact_role(ctx))
}

fn reporting_timeframe(ctx: &TokenContext<'_>) -> String {
    ctx.model
        .text(ids::REPORTING_TIMEFRAME)
        .unwrap_or("within 24 hours")
        .to_string()
}

fn reporting_methods(ctx: &TokenContext<'_>) -> String {
    let methods = ctx.model.texts(ids::REPORTING_METHODS);
    if methods.is_empty() {
        "email, phone or in person".to_string()
    } else {
        join_natural(methods, "or")
    }
}

fn ir_company(ctx: &TokenContext<'_>) -> String {
    ctx.model
        .text(ids::IR_COMPANY_NAME)
        .map(str::to_string)
        .unwrap_or_else(|| "an external incident response provider".to_string())
}

fn compliance_frameworks(ctx: &TokenContext<'_>) -> String {
    let frameworks = ctx.model.choices(ids::COMPLIANCE);
    if frameworks.is_empty() {
        "the regulations that apply to its industry".to_string()
    } else {
        join_natural(frameworks, "and")
    }
}

/// Breach notification duties, or nothing when none apply.
///
/// HIPAA applies to healthcare organizations and to anyone selecting it;
/// GDPR only when selected. An explicit timeline answer switches the duty on
/// even without the framework. Blank timelines fall back to the statutory
/// maximums: 60 days for HIPAA, 72 hours for GDPR.
fn breach_notifications(ctx: &TokenContext<'_>) -> String {
    let model = ctx.model;
    let frameworks = model.choices(ids::COMPLIANCE);
    let mut duties = Vec::new();

    if model.profile().industry == Industry::Healthcare
        || frameworks.contains(&"HIPAA")
        || model.is_answered(ids::HIPAA_NOTIFICATION)
    {
        let timeline = model.choice(ids::HIPAA_NOTIFICATION).unwrap_or("Within 60 days");
        duties.push(format!(
            "Breaches of unsecured protected health information are notified to affected individuals and to the U.S. Department of Health and Human Services {} of discovery.",
            lowercase_first(timeline)
        ));
    }
    if frameworks.contains(&"GDPR") || model.is_answered(ids::GDPR_NOTIFICATION) {
        let timeline = model.choice(ids::GDPR_NOTIFICATION).unwrap_or("Within 72 hours");
        duties.push(format!(
            "Personal data breaches are notified to the competent supervisory authority {} of {} becoming aware of them.",
            lowercase_first(timeline),
            company_name(ctx)
        ));
    }
    let others = model.texts(ids::OTHER_NOTIFICATIONS);
    if !others.is_empty() {
        duties.push(format!(
            "{} also meets the following notification requirements: {}.",
            company_name(ctx),
            join_natural(others, "and")
        ));
    }
    duties.join(" ")
}

fn report_recipients(ctx: &TokenContext<'_>) -> String {
    match ctx.model.text(ids::REPORT_RECIPIENTS) {
        Some(recipients) => format!(
            "Every incident report is also sent to {}.",
            recipients.trim_end_matches('.')
        ),
        None => String::new(),
    }
}

fn account_lifecycle(ctx: &TokenContext<'_>) -> String {
    let mut rules = Vec::new();
    match ctx.model.choice(ids::EXTENDED_LEAVE) {
        Some("Disable during leave") => {
            rules.push("Accounts of users on extended leave are disabled until they return.")
        }
        Some("Review before leave") => rules
            .push("Access for users going on extended leave is reviewed and reduced before the leave begins."),
        _ => {}
    }
    if ctx.model.flag(ids::ACCOUNT_INVENTORY) == Some(true) {
        rules.push(
            "An inventory of all user, administrator and service accounts is maintained and reconciled at each access review.",
        );
    }
    rules.join(" ")
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "a", "a or b", "a, b or c".
fn join_natural<S: AsRef<str>>(items: &[S], conjunction: &str) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(AsRef::<str>::as_ref).collect();
            format!("{} {} {}", head.join(", "), conjunction, last.as_ref())
        }
    }
}

/// A marker that cannot be filled: an unknown token name, a stray `{{`/`}}`,
/// or a lone brace glued to a marker as in `{{{name}}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedMarker {
    pub token: String,
}

enum Piece<'t> {
    Literal(&'t str),
    Token(&'t str),
}

const TOKEN_MARKER_PATTERN: &str = r"\{\{\s*([^{}]*?)\s*\}\}";

// The only `expect` outside tests: the pattern is a literal, and
// `token_marker_pattern_compiles` pins it.
static TOKEN_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TOKEN_MARKER_PATTERN).expect("token marker pattern is valid"));

fn scan(template: &str) -> Result<Vec<Piece<'_>>, UnresolvedMarker> {
    fn literal(text: &str) -> Result<Piece<'_>, UnresolvedMarker> {
        for stray in ["{{", "}}"] {
            if text.contains(stray) {
                return Err(UnresolvedMarker {
                    token: stray.to_string(),
                });
            }
        }
        Ok(Piece::Literal(text))
    }

    let mut pieces = Vec::new();
    let mut last = 0;
    for caps in TOKEN_MARKER.captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let before = &template[last..whole.start()];
        if before.ends_with('{') || template[whole.end()..].starts_with('}') {
            let brace = if before.ends_with('{') { "{" } else { "}" };
            return Err(UnresolvedMarker {
                token: brace.to_string(),
            });
        }
        pieces.push(literal(before)?);
        pieces.push(Piece::Token(name.as_str()));
        last = whole.end();
    }
    pieces.push(literal(&template[last..])?);
    Ok(pieces)
}

/// Token names referenced by a template, in order of appearance.
pub fn template_tokens(template: &str) -> Result<Vec<&str>, UnresolvedMarker> {
    Ok(scan(template)?
        .into_iter()
        .filter_map(|p| match p {
            Piece::Token(name) => Some(name),
            Piece::Literal(_) => None,
        })
        .collect())
}

/// Checks that every marker in a template has a provider.
pub fn check_template(template: &str) -> Result<(), UnresolvedMarker> {
    for name in template_tokens(template)? {
        if provider(name).is_none() {
            return Err(UnresolvedMarker {
                token: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Single-pass substitution. Substituted values are never rescanned.
pub fn render_template(template: &str, ctx: &TokenContext<'_>) -> Result<String, UnresolvedMarker> {
    let mut out = String::with_capacity(template.len());
    for piece in scan(template)? {
        match piece {
            Piece::Literal(text) => out.push_str(text),
            Piece::Token(name) => {
                let fill = provider(name).ok_or_else(|| UnresolvedMarker {
                    token: name.to_string(),
                })?;
                out.push_str(&fill(ctx));
            }
        }
    }
    Ok(out)
}

/// Places resolved clauses into the section layout and fills their tokens.
#[derive(Debug, Clone, Copy)]
pub struct DocumentAssembler {
    layout: &'static [SectionSpec],
    version: &'static str,
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentAssembler {
    pub fn new() -> Self {
        Self {
            layout: SECTION_LAYOUT,
            version: LAYOUT_VERSION,
        }
    }

    pub fn with_layout(layout: &'static [SectionSpec], version: &'static str) -> Self {
        Self { layout, version }
    }

    pub fn layout(&self) -> &'static [SectionSpec] {
        self.layout
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn assemble(
        &self,
        model: &AnswerModel,
        selections: &[ClauseSelection],
        generated_at: DateTime<Utc>,
    ) -> Result<DocumentTree, PolicyError> {
        for selection in selections {
            if !self.layout.iter().any(|s| s.topics.contains(&selection.topic)) {
                tracing::error!(topic = %selection.topic, layout = self.version, "resolved topic has no section slot");
                return Err(PolicyError::UnplacedTopic {
                    topic: selection.topic,
                    layout: self.version,
                });
            }
        }

        let ctx = TokenContext::new(model, generated_at);
        let mut sections = Vec::with_capacity(self.layout.len());
        for (idx, spec) in self.layout.iter().enumerate() {
            let mut clauses = Vec::with_capacity(spec.topics.len());
            for topic in spec.topics {
                let selection = selections.iter().find(|s| s.topic == *topic).ok_or_else(|| {
                    tracing::error!(%topic, layout = self.version, "layout slot has no resolved clause");
                    PolicyError::MissingClause {
                        topic: *topic,
                        layout: self.version,
                    }
                })?;
                let text = render_template(selection.variant.template, &ctx).map_err(|marker| {
                    tracing::error!(
                        %topic,
                        variant = selection.variant.id,
                        token = %marker.token,
                        "clause template has unresolved token"
                    );
                    PolicyError::UnresolvedToken {
                        topic: *topic,
                        variant: selection.variant.id.to_string(),
                        token: marker.token,
                    }
                })?;
                clauses.push(ResolvedClause {
                    topic: *topic,
                    variant: selection.variant.id.to_string(),
                    heading: selection.heading.to_string(),
                    text: drop_empty_paragraphs(&text),
                });
            }
            sections.push(Section {
                number: idx as u32 + 1,
                heading: spec.heading.to_string(),
                clauses,
            });
        }

        let metadata = DocumentMetadata {
            title: DOCUMENT_TITLE.to_string(),
            organization: company_name(&ctx),
            policy_type: POLICY_TYPE.to_string(),
            layout_version: self.version.to_string(),
            effective_date: effective_date(&ctx),
            generated_at,
            owner: owner(&ctx),
        };
        Ok(DocumentTree { metadata, sections })
    }
}

/// Optional tokens render empty; their paragraphs go with them.
fn drop_empty_paragraphs(text: &str) -> String {
    text.split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn owner(ctx: &TokenContext<'_>) -> String {
    if ctx.model.flag(ids::HAS_IT) == Some(true) {
        "IT Department".to_string()
    } else {
        "Management".to_string()
    }
}
