use crate::catalog::Catalog;
use crate::rename::{OutcomeSummary, RenamePlan, RenameResult};
use crate::rules::{RuleSet, RuleTrace};
use std::io::{self, Write};

/// Display dry run results in a formatted output
pub fn display_dry_run(plan: &RenamePlan, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "========================================")?;
    writeln!(writer, "              DRY RUN")?;
    writeln!(writer, "========================================")?;
    writeln!(writer)?;
    writeln!(writer, "Files:   {}", plan.len())?;
    writeln!(writer, "Renames: {}", plan.item_count())?;
    writeln!(writer)?;

    if plan.is_empty() {
        writeln!(writer, "No video files to rename.")?;
        return Ok(());
    }

    if plan.item_count() > 0 {
        writeln!(writer, "Planned changes:")?;
        writeln!(writer)?;

        for (i, item) in plan.items().enumerate() {
            writeln!(writer, "  {}. [episode {}]", i + 1, item.episode_number)?;
            writeln!(writer, "     From: {}", item.source_name)?;
            writeln!(writer, "     To:   {}", item.destination_name)?;

            if item.overwrite {
                writeln!(writer, "     [!] Existing destination will be replaced")?;
            } else if item.is_noop() {
                writeln!(writer, "     [=] Already named correctly")?;
            }

            writeln!(writer)?;
        }
    }

    let skips: Vec<_> = plan.skips().collect();
    if !skips.is_empty() {
        writeln!(writer, "Skipped:")?;
        writeln!(writer)?;
        for (name, outcome) in &skips {
            writeln!(writer, "  - {} ({})", name, outcome.description())?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "----------------------------------------")?;
    writeln!(writer, "Summary:")?;
    writeln!(writer, "  {} files would be renamed", plan.item_count())?;
    writeln!(writer, "  {} files would be skipped", skips.len())?;
    writeln!(writer)?;
    writeln!(writer, "Run without --dry to apply these changes.")?;

    Ok(())
}

/// Display execution results (non-dry-run)
pub fn display_execution_result(result: &RenameResult, writer: &mut impl Write) -> io::Result<()> {
    let summary = result.summary();

    writeln!(writer)?;
    writeln!(writer, "Successfully renamed {} files.", summary.renamed)?;
    write_summary(&summary, writer)?;

    let failures: Vec<_> = result
        .records
        .iter()
        .filter(|r| r.outcome.is_failure())
        .collect();

    if !failures.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Failures:")?;
        for record in failures {
            writeln!(
                writer,
                "  - {} ({})",
                record.source_name,
                record.outcome.description()
            )?;
        }
    }

    Ok(())
}

fn write_summary(summary: &OutcomeSummary, writer: &mut impl Write) -> io::Result<()> {
    let lines = [
        (summary.no_number, "skipped: no episode number found"),
        (summary.no_title, "skipped: no title in catalogue"),
        (summary.destination_exists, "skipped: destination exists"),
        (summary.failed, "failed"),
    ];

    for (count, label) in lines {
        if count > 0 {
            writeln!(writer, "  {} {}", count, label)?;
        }
    }

    Ok(())
}

/// List the rules in precedence order
pub fn display_rules(rules: &RuleSet, writer: &mut impl Write) -> io::Result<()> {
    if rules.is_empty() {
        writeln!(writer, "No rules configured.")?;
        return Ok(());
    }

    for (i, rule) in rules.rules().enumerate() {
        let state = if rule.enabled { "enabled" } else { "disabled" };
        let origin = if rule.is_default { ", default" } else { "" };

        writeln!(writer, "{}. {} [{}{}]", i + 1, rule.name, state, origin)?;
        writeln!(writer, "   Pattern: {}", rule.pattern)?;
        writeln!(writer, "   Group:   {}", rule.capture_group)?;
        if !rule.description.is_empty() {
            writeln!(writer, "   {}", rule.description)?;
        }
    }

    for error in rules.errors() {
        writeln!(writer)?;
        writeln!(writer, "[!] {}", error)?;
    }

    Ok(())
}

/// Show how every rule handles `file_name` and which one wins
pub fn display_rule_test(
    file_name: &str,
    rules: &RuleSet,
    writer: &mut impl Write,
) -> io::Result<()> {
    writeln!(writer, "Testing: {}", file_name)?;
    writeln!(writer)?;

    for (rule, trace) in rules.explain(file_name) {
        let marker = match trace {
            RuleTrace::Number(_) => "+",
            _ => "-",
        };
        writeln!(writer, "  {} {}: {}", marker, rule.name, trace.description())?;
    }

    writeln!(writer)?;
    match rules.extract(file_name) {
        Some((number, rule)) => writeln!(writer, "Result: episode {} (rule '{}')", number, rule)?,
        None => writeln!(writer, "Result: no episode number")?,
    }

    Ok(())
}

/// List the catalogue in ascending episode order
pub fn display_catalog(catalog: &Catalog, writer: &mut impl Write) -> io::Result<()> {
    if catalog.is_empty() {
        writeln!(writer, "The catalogue is empty.")?;
        return Ok(());
    }

    for (number, title) in catalog.iter() {
        writeln!(writer, "{:>4}  {}", number, title)?;
    }
    writeln!(writer)?;
    writeln!(writer, "{} episodes", catalog.len())?;

    Ok(())
}
