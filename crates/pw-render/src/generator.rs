// generator.rs - Single entry point: profile + answers in, document on disk out.

use chrono::{DateTime, Utc};
use pw_policy::{OrganizationProfile, PolicyComposer, QuestionnaireAnswers};

use crate::config::RenderConfig;
use crate::error::GenerationError;
use crate::renderer::{GenerationResult, Renderer};

/// Composes a policy and renders it to the configured output directory.
///
/// Input and template errors surface before any filesystem access, so a
/// rejected request never creates the output directory.
#[derive(Debug, Clone)]
pub struct PolicyGenerator {
    composer: PolicyComposer,
    renderer: Renderer,
}

impl PolicyGenerator {
    pub fn new(composer: PolicyComposer, renderer: Renderer) -> Self {
        Self { composer, renderer }
    }

    /// Built-in catalog and rules, writing to `config.output_dir`.
    pub fn with_config(config: RenderConfig) -> Self {
        Self::new(PolicyComposer::new(), Renderer::new(config))
    }

    pub fn composer(&self) -> &PolicyComposer {
        &self.composer
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn generate(
        &self,
        profile: OrganizationProfile,
        answers: &QuestionnaireAnswers,
    ) -> Result<GenerationResult, GenerationError> {
        self.generate_at(profile, answers, Utc::now())
    }

    /// Like [`generate`](Self::generate) with a caller-supplied timestamp.
    pub fn generate_at(
        &self,
        profile: OrganizationProfile,
        answers: &QuestionnaireAnswers,
        generated_at: DateTime<Utc>,
    ) -> Result<GenerationResult, GenerationError> {
        let org_key = profile.org_key().to_string();
        tracing::info!(org = %org_key, answers = answers.len(), "generating acceptable use policy");

        let result = self
            .composer
            .compose(profile, answers, generated_at)
            .map_err(GenerationError::from)
            .and_then(|tree| Ok(self.renderer.render(&tree, &org_key)?));

        match &result {
            Ok(done) => tracing::info!(
                org = %org_key,
                file = %done.filename,
                bytes = done.size_bytes,
                "policy generated"
            ),
            Err(e) => tracing::warn!(org = %org_key, kind = %e.kind(), error = %e, "policy generation failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pw_policy::questions::ids;
    use pw_policy::{ErrorKind, Industry, SizeClass};
    use tempfile::TempDir;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap()
    }

    fn profile(name: &str) -> OrganizationProfile {
        OrganizationProfile::new(name, Industry::Healthcare, SizeClass::Ig1)
    }

    fn answers() -> QuestionnaireAnswers {
        QuestionnaireAnswers::new().with(ids::BYOD, "Not allowed")
    }

    #[test]
    fn rejected_input_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let generator = PolicyGenerator::with_config(RenderConfig::new(&out));
        let conflicting = QuestionnaireAnswers::new()
            .with(ids::MDM, "No")
            .with(ids::BYOD, "Allowed with MDM");

        let err = generator.generate_at(profile("Acme"), &conflicting, at()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
        assert!(!out.exists());
    }

    #[test]
    fn missing_required_answer_is_input_error() {
        let tmp = TempDir::new().unwrap();
        let generator = PolicyGenerator::with_config(RenderConfig::new(tmp.path().join("out")));
        let err = generator
            .generate_at(profile("Acme"), &QuestionnaireAnswers::new(), at())
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Policy(pw_policy::PolicyError::MissingRequiredAnswer { .. })
        ));
    }

    #[test]
    fn two_orgs_same_instant_get_distinct_files() {
        let tmp = TempDir::new().unwrap();
        let generator = PolicyGenerator::with_config(RenderConfig::new(tmp.path()));
        let a = generator
            .generate_at(profile("Acme").with_org_id("org-1"), &answers(), at())
            .unwrap();
        let b = generator
            .generate_at(profile("Acme").with_org_id("org-2"), &answers(), at())
            .unwrap();
        assert_ne!(a.filename, b.filename);
        assert!(a.path.exists() && b.path.exists());
    }

    #[test]
    fn same_org_same_instant_is_versioned() {
        let tmp = TempDir::new().unwrap();
        let generator = PolicyGenerator::with_config(RenderConfig::new(tmp.path()));
        let first = generator.generate_at(profile("Acme"), &answers(), at()).unwrap();
        let second = generator.generate_at(profile("Acme"), &answers(), at()).unwrap();
        assert!(!first.filename.contains("-v"));
        assert!(second.filename.ends_with("-v2.docx"));
    }

    #[test]
    fn generate_uses_current_time() {
        let tmp = TempDir::new().unwrap();
        let generator = PolicyGenerator::with_config(RenderConfig::new(tmp.path()));
        let before = Utc::now();
        let result = generator.generate(profile("Acme"), &answers()).unwrap();
        assert!(result.generated_at >= before);
        assert!(result.size_bytes > 0);
    }
}
