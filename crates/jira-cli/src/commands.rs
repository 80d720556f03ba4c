use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use jira_cli::logging::redact_value;
use jira_cli::pipeline::{self, Pipeline, RunOptions};
use jira_cli::settings::{Settings, load_settings};
use jira_lookup::JiraClient;
use jira_model::{PhaseKind, PhaseReport, RunReport};
use jira_output::{PruneOutcome, prune_empty_columns};

use crate::cli::RunArgs;

pub fn run_migration(config: Option<&Path>, args: &RunArgs) -> Result<RunReport> {
    let (settings, path) = load_settings(config)?;
    let span = info_span!("run", settings = %path.display());
    let _guard = span.enter();

    let options = RunOptions {
        create_user_map: args.create_user_map,
        create_issue_type_map: args.create_issue_type_map,
        update_csv: args.update_csv,
        split: args.split_enabled(),
        prune_empty_columns: args.prune_empty_columns,
    };

    if !options.needs_remote() {
        info!("using persisted mappings, no tracker requests");
        return Ok(pipeline::run::<JiraClient, JiraClient>(
            &settings, &options, None,
        ));
    }

    check_remote_settings(&settings, &options)?;
    let source = JiraClient::connect(settings.source.instance.instance_config())
        .context("connect to source instance")?;
    let target = JiraClient::connect(settings.target.instance.instance_config())
        .context("connect to target instance")?;
    Ok(pipeline::run(&settings, &options, Some((&source, &target))))
}

fn check_remote_settings(settings: &Settings, options: &RunOptions) -> Result<()> {
    if settings.source.instance.host.is_empty() || settings.target.instance.host.is_empty() {
        bail!("source.host and target.host are required to create mappings");
    }
    if options.create_user_map && settings.target.default_username.is_empty() {
        bail!("target.default_username is required to create the user mapping");
    }
    if options.create_issue_type_map
        && (settings.source.instance.project_key.is_empty()
            || settings.target.instance.project_key.is_empty())
    {
        bail!("source.project_key and target.project_key are required to create the issue type mapping");
    }
    Ok(())
}

/// Prints the sorted identifier set, one per line.
pub fn run_extract(config: Option<&Path>) -> Result<RunReport> {
    let (settings, _) = load_settings(config)?;
    let mut pipeline = Pipeline::new(&settings);
    let identifiers = pipeline.extract_identifiers();
    for identifier in &identifiers {
        println!("{identifier}");
    }
    if let Some(first) = identifiers.first() {
        info!(first = redact_value(first), count = identifiers.len(), "printed identifiers");
    }
    Ok(pipeline.into_report())
}

pub fn run_prune(csv: &Path) -> Result<RunReport> {
    let span = info_span!("prune");
    let _guard = span.enter();
    let outcome = prune_empty_columns(csv)
        .with_context(|| format!("remove empty columns from {}", csv.display()))?;
    let phase = match outcome {
        PruneOutcome::Written { path, removed } => {
            PhaseReport::completed(PhaseKind::Prune, removed.len(), Some(path))
        }
        PruneOutcome::Unchanged(_) => {
            PhaseReport::completed(PhaseKind::Prune, 0, None).with_message("no data rows")
        }
    };
    Ok(RunReport {
        phases: vec![phase],
    })
}
