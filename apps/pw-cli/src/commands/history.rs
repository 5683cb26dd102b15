// history.rs - Tail or verify the generation ledger.

use pw_ledger::{GenerationLedger, LedgerError};

use crate::config::PwConfig;

pub fn execute(config: &PwConfig, n: usize, verify: bool) -> anyhow::Result<()> {
    let path = &config.ledger_path;
    if !path.exists() {
        println!("No ledger found at {}", path.display());
        return Ok(());
    }

    if verify {
        return match GenerationLedger::verify_chain(path) {
            Ok(count) => {
                println!("Ledger verified: {} record(s), hash chain intact.", count);
                Ok(())
            }
            Err(LedgerError::ChainBroken {
                line,
                filename,
                expected,
                actual,
            }) => {
                println!("INTEGRITY VIOLATION at line {} (record for {}):", line, filename);
                println!("  Expected previous_hash: {}", expected);
                println!("  Actual previous_hash:   {}", actual);
                anyhow::bail!("ledger integrity check failed");
            }
            Err(e) => Err(e.into()),
        };
    }

    let records = GenerationLedger::tail(path, n)?;
    if records.is_empty() {
        println!("No generations recorded.");
        return Ok(());
    }
    println!("{:<20} {:<24} FILENAME", "GENERATED", "ORGANIZATION");
    println!("{}", "-".repeat(80));
    for record in records {
        println!(
            "{:<20} {:<24} {}",
            record.generated_at.format("%Y-%m-%d %H:%M:%S"),
            record.company_name,
            record.filename,
        );
    }
    Ok(())
}
