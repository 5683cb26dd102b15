pub mod catalog;
pub mod generate;
pub mod history;
pub mod locate;
pub mod validate;

use std::path::Path;

use anyhow::Context;
use pw_policy::{OrganizationProfile, PolicyError, QuestionnaireAnswers};

/// Read the profile and answers JSON files named on the command line.
pub fn load_inputs(profile: &Path, answers: &Path) -> anyhow::Result<(OrganizationProfile, QuestionnaireAnswers)> {
    Ok((read_json(profile)?, read_json(answers)?))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Print an input error in full to stderr, one violation per line.
pub fn report_policy_error(err: &PolicyError) {
    match err {
        PolicyError::ConflictingAnswers { violations } => {
            eprintln!("Answers are inconsistent:");
            for v in violations {
                eprintln!("  [{}] {}", v.rule, v.reason);
            }
        }
        other => eprintln!("{}", other),
    }
}
