// composer.rs - End-to-end pure pipeline from questionnaire to document tree.
//
// profile check -> normalize -> validate -> resolve -> assemble.
// No step performs I/O, so the same inputs always yield the same tree.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::answers::{AnswerModel, QuestionnaireAnswers};
use crate::assembler::{check_template, DocumentAssembler};
use crate::catalog::Catalog;
use crate::document::DocumentTree;
use crate::error::PolicyError;
use crate::profile::OrganizationProfile;
use crate::resolver::{ClauseResolver, ResolutionTrace};
use crate::validator::ConsistencyValidator;

/// A document tree plus the record of how it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Composition {
    pub tree: DocumentTree,
    pub trace: ResolutionTrace,
    /// Questions whose value came from a documented fallback.
    pub fallbacks: Vec<&'static str>,
}

#[derive(Debug, Clone, Default)]
pub struct PolicyComposer {
    catalog: Catalog,
    validator: ConsistencyValidator,
    assembler: DocumentAssembler,
}

impl PolicyComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_validator(mut self, validator: ConsistencyValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_assembler(mut self, assembler: DocumentAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn validator(&self) -> &ConsistencyValidator {
        &self.validator
    }

    pub fn assembler(&self) -> &DocumentAssembler {
        &self.assembler
    }

    /// Normalize and validate without resolving clauses.
    pub fn prepare(
        &self,
        profile: OrganizationProfile,
        answers: &QuestionnaireAnswers,
    ) -> Result<AnswerModel, PolicyError> {
        let model = AnswerModel::normalize(profile, answers)?;
        self.validator.check(&model)?;
        Ok(model)
    }

    pub fn compose(
        &self,
        profile: OrganizationProfile,
        answers: &QuestionnaireAnswers,
        generated_at: DateTime<Utc>,
    ) -> Result<DocumentTree, PolicyError> {
        Ok(self.compose_with_trace(profile, answers, generated_at)?.tree)
    }

    pub fn compose_with_trace(
        &self,
        profile: OrganizationProfile,
        answers: &QuestionnaireAnswers,
        generated_at: DateTime<Utc>,
    ) -> Result<Composition, PolicyError> {
        let model = self.prepare(profile, answers)?;
        let resolution = ClauseResolver::new(&self.catalog).resolve_with_trace(&model)?;
        let tree = self
            .assembler
            .assemble(&model, &resolution.selections, generated_at)?;
        tracing::debug!(
            org = %model.profile().org_key(),
            clauses = tree.clause_count(),
            defaulted = resolution.trace.defaulted_topics().len(),
            "composed document tree"
        );
        Ok(Composition {
            tree,
            trace: resolution.trace,
            fallbacks: model.fallbacks(),
        })
    }

    /// Verifies every catalog template against the token providers.
    ///
    /// Intended for startup checks; `compose` reports the same defects
    /// lazily for the variants it actually selects.
    pub fn check_templates(&self) -> Result<(), PolicyError> {
        for entry in self.catalog.entries() {
            for variant in entry.variants {
                check_template(variant.template).map_err(|marker| PolicyError::UnresolvedToken {
                    topic: entry.topic,
                    variant: variant.id.to_string(),
                    token: marker.token,
                })?;
            }
        }
        Ok(())
    }
}
