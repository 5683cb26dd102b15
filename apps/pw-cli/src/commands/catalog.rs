// catalog.rs - Print the document layout, clause variants and rules.

use pw_policy::{Catalog, ConsistencyValidator, DocumentAssembler};

pub fn execute() -> anyhow::Result<()> {
    let assembler = DocumentAssembler::new();
    let catalog = Catalog::builtin();

    println!("Layout {}", assembler.version());
    for (idx, section) in assembler.layout().iter().enumerate() {
        println!("{}. {}", idx + 1, section.heading);
        for topic in section.topics {
            let Some(entry) = catalog.entry(*topic) else {
                anyhow::bail!("topic {} has no catalog entry", topic);
            };
            let default = catalog.table(*topic).map(|t| t.default_variant).unwrap_or("-");
            println!("   {} ({})", entry.heading, topic.id());
            for variant in entry.variants {
                let marker = if variant.id == default { " [default]" } else { "" };
                println!("      - {}{}", variant.id, marker);
            }
        }
    }

    println!();
    println!("Consistency rules:");
    for rule in ConsistencyValidator::new().rules() {
        println!("  {:<24} {}", rule.name, rule.description);
    }
    Ok(())
}
