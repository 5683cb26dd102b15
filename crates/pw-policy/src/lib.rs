//! # pw-policy
//!
//! Acceptable Use Policy assembly engine.
//!
//! Turns an [`OrganizationProfile`] and a set of [`QuestionnaireAnswers`]
//! into a fully resolved [`DocumentTree`]:
//!
//! 1. [`AnswerModel`] normalizes raw answers against the static question
//!    registry and applies documented fallbacks.
//! 2. [`ConsistencyValidator`] rejects contradictory answer combinations,
//!    reporting every violated rule at once.
//! 3. [`ClauseResolver`] walks one [`DecisionTable`] per topic and picks a
//!    catalog variant; the first matching rule wins.
//! 4. [`DocumentAssembler`] places clauses by the versioned section layout
//!    and fills `{{token}}` markers in a single pass.
//!
//! [`PolicyComposer`] runs the whole pipeline. Nothing in this crate touches
//! the filesystem; rendering lives in `pw-render`.
//!
//! ## Key invariants
//!
//! - **Deterministic**: the same inputs and timestamp give the same tree.
//! - **Total coverage**: every topic resolves to exactly one clause, whatever
//!   optional answers are missing.
//! - **Loud templates**: an unknown or stray token marker is an error, never
//!   literal placeholder text in the output.

pub mod answers;
pub mod assembler;
pub mod catalog;
pub mod composer;
pub mod decision;
pub mod document;
pub mod error;
pub mod profile;
pub mod questions;
pub mod resolver;
pub mod validator;

pub use answers::{Answer, AnswerModel, AnswerSource, AnswerValue, QuestionnaireAnswers};
pub use assembler::{
    render_template, DocumentAssembler, SectionSpec, TokenContext, UnresolvedMarker, LAYOUT_VERSION,
    SECTION_LAYOUT, TOKEN_PROVIDERS,
};
pub use catalog::{Catalog, CatalogEntry, ClauseVariant, Topic};
pub use composer::{Composition, PolicyComposer};
pub use decision::{Condition, DecisionRule, DecisionTable};
pub use document::{Block, DocumentMetadata, DocumentTree, ResolvedClause, Section, DOCUMENT_TITLE, POLICY_TYPE};
pub use error::{ErrorKind, PolicyError};
pub use profile::{Industry, OrganizationProfile, SizeClass, SIZE_CLASS_BOUNDARIES};
pub use resolver::{ClauseResolver, ClauseSelection, Resolution, ResolutionTrace, TopicTrace};
pub use validator::{ConsistencyRule, ConsistencyValidator, RuleOutcome, RuleViolation};
