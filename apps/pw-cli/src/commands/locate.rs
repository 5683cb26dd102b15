// locate.rs - Resolve a download filename to a file on disk.

use pw_ledger::{GenerationLedger, LedgerError};
use pw_render::{Renderer, DOCX_CONTENT_TYPE};

use crate::config::PwConfig;

pub fn execute(config: &PwConfig, filename: &str) -> anyhow::Result<()> {
    let renderer = Renderer::new(config.render_config());
    let path = renderer.locate(filename)?;

    println!("{}", path.display());
    println!("Content-Type: {}", DOCX_CONTENT_TYPE);

    if let Some(record) = GenerationLedger::find_by_filename(&config.ledger_path, filename)? {
        match record.check_document(&path) {
            Ok(()) => println!("Recorded: {} for {}", record.generated_at.to_rfc3339(), record.company_name),
            Err(e @ LedgerError::DocumentModified { .. }) => {
                println!("Recorded digest: {}", record.document_sha256);
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
