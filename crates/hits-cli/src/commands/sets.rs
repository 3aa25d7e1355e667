//! The `hits sets` command

use std::path::Path;

use colored::Colorize;
use hits_case::HitSource;
use hits_core::SetGroups;
use serde_json::json;

use super::load_case;
use crate::error::Result;

/// List rule-sets with their hit counts, in export order.
pub fn run_sets(catalog: &Path, json: bool) -> Result<()> {
    let case = load_case(catalog, None)?;
    let records = case.hits()?;
    let groups = SetGroups::from_records(&records);

    if json {
        let output = json!({
            "sets": groups
                .iter()
                .map(|g| json!({
                    "name": g.name,
                    "description": g.description,
                    "hits": g.hits.len(),
                }))
                .collect::<Vec<_>>(),
            "skipped_records": groups.malformed(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("No rule-sets flagged any items.");
    } else {
        println!("{}", "Rule-sets".bold());
        for group in groups.iter() {
            println!(
                "  {:<24} {:>5} hit(s)  {}",
                group.name.cyan(),
                group.hits.len(),
                group.description.dimmed()
            );
        }
    }
    if !groups.malformed().is_empty() {
        println!(
            "{} {} hit record(s) without a set name",
            "warning:".yellow().bold(),
            groups.malformed().len()
        );
    }
    Ok(())
}
