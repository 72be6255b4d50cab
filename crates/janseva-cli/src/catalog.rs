//! # Catalog Subcommand
//!
//! Lists the built-in service catalog: steps, fields, and document
//! checklists per service.

use anyhow::Result;
use clap::Args;

use janseva_workflow::builtin_services;

/// Arguments for the catalog subcommand.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Emit the full catalog as JSON instead of a summary table.
    #[arg(long)]
    pub json: bool,
}

/// List the offered services.
pub fn run(args: &CatalogArgs) -> Result<()> {
    let services = builtin_services();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&services)?);
        return Ok(());
    }

    for service in &services {
        println!("{}  ({})", service.label_en, service.label_hi);
        println!("  id: {}", service.id);
        if let Some(prefix) = &service.reference_prefix {
            println!("  reference prefix: {prefix}");
        }
        if !service.eta_description.is_empty() {
            println!("  processing: {}", service.eta_description);
        }
        for (index, step) in service.steps.iter().enumerate() {
            let fields = if step.fields.is_empty() {
                String::new()
            } else {
                format!(" [{} field(s)]", step.fields.len())
            };
            println!("  step {}: {} — {}{fields}", index + 1, step.kind, step.title);
        }
        for doc in &service.documents {
            let tag = if doc.mandatory { "required" } else { "optional" };
            println!("  document ({tag}): {}", doc.label_en);
        }
        println!();
    }
    println!("{} service(s)", services.len());
    Ok(())
}
