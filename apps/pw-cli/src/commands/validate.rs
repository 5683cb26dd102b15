// validate.rs - Normalize, check and resolve without rendering.

use std::path::Path;

use pw_policy::{ClauseResolver, ErrorKind, PolicyComposer};

use crate::commands::{load_inputs, report_policy_error};

pub fn execute(profile: &Path, answers: &Path) -> anyhow::Result<()> {
    let (profile, answers) = load_inputs(profile, answers)?;
    let composer = PolicyComposer::new();

    let model = match composer.prepare(profile, &answers) {
        Ok(model) => model,
        Err(e) if e.kind() == ErrorKind::Input => {
            report_policy_error(&e);
            anyhow::bail!("answers are not valid");
        }
        Err(e) => return Err(e.into()),
    };
    let resolution = ClauseResolver::new(composer.catalog()).resolve_with_trace(&model)?;

    println!(
        "Answers valid for {} ({}).",
        model.profile().company_name,
        model.size_class()
    );
    let fallbacks = model.fallbacks();
    if fallbacks.is_empty() {
        println!("No fallbacks applied.");
    } else {
        println!("Fallbacks applied: {}", fallbacks.join(", "));
    }
    println!();
    println!("{:<26} {:<28} RULE", "TOPIC", "VARIANT");
    println!("{}", "-".repeat(80));
    for selection in &resolution.selections {
        println!(
            "{:<26} {:<28} {}",
            selection.topic.id(),
            selection.variant.id,
            selection.matched_rule.as_deref().unwrap_or("(default)"),
        );
    }
    Ok(())
}
