use clap::Parser;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, error, info};

use episode_renamer::cli::Args;
use episode_renamer::config::AppConfig;
use episode_renamer::error::AppError;
use episode_renamer::logging;
use episode_renamer::output::{
    display_catalog, display_dry_run, display_execution_result, display_rule_test, display_rules,
};
use episode_renamer::progress::{should_use_colors, Progress};
use episode_renamer::rename::{execute_plan, plan_renames};
use episode_renamer::rules::{RuleError, RuleSet};
use episode_renamer::scanner::scan_directory;

fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(args.verbose);

    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("\nError: {}", e.detailed_message());
        std::process::exit(e.exit_code().into());
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let mut progress = Progress::new_with_ui(args.verbose > 0, should_use_colors());

    let config = AppConfig::load(args.config_layer())?;
    debug!("Data directory: {:?}", config.data_dir);

    if args.manages_rules() {
        return manage_rules(&args, &config);
    }

    if args.manages_catalog() {
        return manage_catalog(&args, &config);
    }

    if let Some(file_name) = &args.test_name {
        let rules = RuleSet::new(config.rule_store().load());
        return display(|out| display_rule_test(file_name, &rules, out));
    }

    match &args.target_dir {
        Some(target_dir) => rename_directory(target_dir, &args, &config, &mut progress),
        None => Err(AppError::InvalidArguments(
            "A target directory is required".to_string(),
        )),
    }
}

fn rename_directory(
    target_dir: &Path,
    args: &Args,
    config: &AppConfig,
    progress: &mut Progress,
) -> Result<(), AppError> {
    let catalog_store = config.catalog_store();
    let catalog = catalog_store.load()?;
    if catalog.is_empty() {
        return Err(AppError::CatalogEmpty {
            path: catalog_store.path().to_path_buf(),
        });
    }

    let rules = RuleSet::new(config.rule_store().load());
    for problem in rules.errors() {
        progress.warn(&format!("{} (rule skipped)", problem));
    }

    // Step 1: Scan directory
    let entries = scan_directory(target_dir, &config.extensions)?;
    progress.scan_complete(entries.len(), target_dir);

    info!("Found {} candidate files", entries.len());
    for entry in &entries {
        debug!("  {}", entry.name);
    }

    // Step 2: Plan
    let files: Vec<_> = entries.into_iter().map(|e| e.path).collect();
    let plan = plan_renames(&files, &catalog, &rules, &config.plan_options(args.force));

    if args.dry {
        return display(|out| display_dry_run(&plan, out));
    }

    // Step 3: Execute
    let result = execute_plan(&plan, &config.backup_options(), progress);

    display(|out| display_execution_result(&result, out))?;

    let summary = result.summary();
    if summary.failed > 0 {
        return Err(AppError::RenameFailures {
            failed: summary.failed,
            total: summary.total(),
        });
    }

    Ok(())
}

fn manage_rules(args: &Args, config: &AppConfig) -> Result<(), AppError> {
    let store = config.rule_store();
    // A damaged rule file is reported, never overwritten with the defaults
    let mut rules = RuleSet::new(store.try_load()?);
    let mut changed = false;

    if let Some(rule) = args.new_rule() {
        let name = rule.name.clone();
        let position = args.position.map(|p| p as usize - 1);
        rules = rules.with_rule_added(rule, position)?;
        info!("Added rule '{}'", name);
        changed = true;
    }

    if let Some(name) = &args.edit_rule {
        let current = rules
            .rule(name)
            .cloned()
            .ok_or_else(|| RuleError::UnknownRule(name.clone()))?;
        rules = rules.with_rule_replaced(name, args.edited_rule(current))?;
        info!("Edited rule '{}'", name);
        changed = true;
    }

    if let Some(name) = &args.remove_rule {
        rules = rules.with_rule_removed(name)?;
        info!("Removed rule '{}'", name);
        changed = true;
    }

    if let Some(name) = &args.enable_rule {
        rules = rules.with_rule_enabled(name, true)?;
        changed = true;
    }

    if let Some(name) = &args.disable_rule {
        rules = rules.with_rule_enabled(name, false)?;
        changed = true;
    }

    if changed {
        store.save(&rules.to_rules())?;
    }

    display(|out| display_rules(&rules, out))
}

fn manage_catalog(args: &Args, config: &AppConfig) -> Result<(), AppError> {
    let store = config.catalog_store();

    if let Some(source) = &args.import_catalog {
        let count = store.import(source)?;
        display(|out| writeln!(out, "Imported {} episodes into {}", count, store.path().display()))?;
    }

    if args.list_episodes {
        let catalog = store.load()?;
        display(|out| display_catalog(&catalog, out))?;
    }

    Ok(())
}

fn display<F>(write: F) -> Result<(), AppError>
where
    F: FnOnce(&mut io::StdoutLock<'static>) -> io::Result<()>,
{
    let mut stdout = io::stdout().lock();
    write(&mut stdout)
        .and_then(|_| stdout.flush())
        .map_err(|e| AppError::Other(format!("Failed to display output: {}", e)))
}
