// generate.rs - Compose, render and record one policy document.

use std::path::Path;

use pw_ledger::{DocumentDigest, GenerationLedger, GenerationRecord};
use pw_policy::{ErrorKind, POLICY_TYPE};
use pw_render::{GenerationError, GenerationResult, PolicyGenerator};
use serde::Serialize;

use crate::commands::{load_inputs, report_policy_error};
use crate::config::PwConfig;

#[derive(Serialize)]
struct GenerateOutput<'a> {
    #[serde(flatten)]
    result: &'a GenerationResult,
    download_url: String,
    record_id: String,
    document_sha256: &'a DocumentDigest,
}

pub fn execute(config: &PwConfig, profile: &Path, answers: &Path, json: bool) -> anyhow::Result<()> {
    let (profile, answers) = load_inputs(profile, answers)?;
    let org_key = profile.org_key().to_string();
    let company_name = profile.company_name.clone();

    let generator = PolicyGenerator::with_config(config.render_config());
    let result = match generator.generate(profile, &answers) {
        Ok(result) => result,
        Err(GenerationError::Policy(e)) if e.kind() == ErrorKind::Input => {
            report_policy_error(&e);
            anyhow::bail!("policy not generated: invalid answers");
        }
        Err(e) => return Err(e.into()),
    };

    let document_sha256 = DocumentDigest::of_document(&result.path)?;
    let mut record = GenerationRecord::new(
        org_key,
        company_name,
        POLICY_TYPE,
        result.filename.clone(),
        result.path.clone(),
        document_sha256.clone(),
        result.generated_at,
    );
    GenerationLedger::open(&config.ledger_path)?.append(&mut record)?;

    let download_url = config.download_url(&result.filename);
    if json {
        let output = GenerateOutput {
            result: &result,
            download_url,
            record_id: record.record_id.to_string(),
            document_sha256: &document_sha256,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Generated {}", result.filename);
        println!("  Path:      {}", result.path.display());
        println!("  Size:      {} bytes", result.size_bytes);
        println!("  Download:  {}", download_url);
        println!("  Record:    {}", record.record_id);
    }
    Ok(())
}
