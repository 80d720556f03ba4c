//! Phase orchestration for a migration run.
//!
//! Every phase is best effort: failures are logged and recorded in the
//! [`RunReport`], and the next phase works with whatever state exists.

use std::path::{Path, PathBuf};

use tracing::{error, info, info_span, warn};

use jira_ingest::{IdentifierExtractor, resolve_sources};
use jira_lookup::issue_types_or_empty;
use jira_map::{
    MappingStore, UserDirectory, UserResolver, clean_mapping, clean_resolutions,
    resolve_issue_types,
};
use jira_model::{IdentifierSet, Mapping, PhaseKind, PhaseReport, RunReport};
use jira_output::{
    OutputError, PruneOutcome, SplitOptions, Splitter, merge_substituted, prune_empty_columns,
};
use jira_transform::Substituter;

use crate::logging::redact_value;
use crate::settings::Settings;

/// Which phases a run performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub create_user_map: bool,
    pub create_issue_type_map: bool,
    pub update_csv: bool,
    pub split: bool,
    pub prune_empty_columns: bool,
}

impl RunOptions {
    /// Whether any phase needs the tracker instances.
    pub fn needs_remote(&self) -> bool {
        self.create_user_map || self.create_issue_type_map
    }
}

pub struct Pipeline<'a> {
    settings: &'a Settings,
    sources: Vec<PathBuf>,
    report: RunReport,
}

impl<'a> Pipeline<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        let sources = resolve_sources(&settings.files.sources);
        info!(count = sources.len(), "resolved source files");
        Self {
            settings,
            sources,
            report: RunReport::default(),
        }
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    pub fn into_report(self) -> RunReport {
        self.report
    }

    pub fn extract_identifiers(&mut self) -> IdentifierSet {
        let span = info_span!("extract");
        let _guard = span.enter();
        let extractor = IdentifierExtractor::new((&self.settings.columns).into());
        let identifiers = extractor.extract_sources(&self.sources);
        self.report.push(PhaseReport::completed(
            PhaseKind::Extract,
            identifiers.len(),
            None,
        ));
        identifiers
    }

    /// Resolves every identifier in the sources against the two instances and
    /// persists the cleaned mapping.
    pub fn create_user_mapping<S, T>(&mut self, source: &S, target: &T) -> Mapping
    where
        S: UserDirectory,
        T: UserDirectory,
    {
        let identifiers = self.extract_identifiers();
        let span = info_span!("resolve_users");
        let _guard = span.enter();

        let resolver = UserResolver::new(source, target, &self.settings.target.default_username)
            .with_last_name_first(self.settings.source.last_name_displayed_first);
        resolver.verify_default();
        let mapping = clean_resolutions(resolver.resolve(&identifiers));
        let changed = mapping.iter().filter(|(from, to)| from != to).count();
        info!(entries = mapping.len(), changed, "user mapping ready");
        for (from, to) in mapping.iter().take(5) {
            tracing::debug!(source = redact_value(from), target = redact_value(to), "user mapping sample");
        }

        let store = MappingStore::new(&self.settings.files.user_map, "user");
        self.record_saved(PhaseKind::ResolveUsers, &store, &mapping);
        mapping
    }

    pub fn load_user_mapping(&mut self) -> Mapping {
        let span = info_span!("resolve_users");
        let _guard = span.enter();
        let store = MappingStore::new(&self.settings.files.user_map, "user");
        self.record_loaded(PhaseKind::ResolveUsers, &store)
    }

    /// Maps source issue types to target issue types by name containment and
    /// persists the cleaned mapping.
    pub fn create_issue_type_mapping<S, T>(&mut self, source: &S, target: &T) -> Mapping
    where
        S: UserDirectory,
        T: UserDirectory,
    {
        let span = info_span!("resolve_issue_types");
        let _guard = span.enter();

        let source_names = issue_types_or_empty(source, &self.settings.source.instance.project_key);
        let target_names = issue_types_or_empty(target, &self.settings.target.instance.project_key);
        info!(
            source = source_names.len(),
            target = target_names.len(),
            "fetched issue type names"
        );
        let mapping = clean_resolutions(resolve_issue_types(&source_names, &target_names));

        let store = MappingStore::new(&self.settings.files.issue_type_map, "issue type");
        self.record_saved(PhaseKind::ResolveIssueTypes, &store, &mapping);
        mapping
    }

    pub fn load_issue_type_mapping(&mut self) -> Mapping {
        let span = info_span!("resolve_issue_types");
        let _guard = span.enter();
        let store = MappingStore::new(&self.settings.files.issue_type_map, "issue type");
        self.record_loaded(PhaseKind::ResolveIssueTypes, &store)
    }

    /// Writes the substituted concatenation of all sources. Returns the
    /// output path when it was written.
    pub fn substitute(&mut self, users: &Mapping, issue_types: &Mapping) -> Option<PathBuf> {
        let span = info_span!("substitute");
        let _guard = span.enter();
        let output = self.settings.files.output_csv.clone();

        let substituter = match Substituter::new(&[users, issue_types]) {
            Ok(substituter) => substituter,
            Err(err) => {
                error!(error = %err, "cannot substitute");
                self.report
                    .push(PhaseReport::failed(PhaseKind::Substitute, 0, err.to_string()));
                return None;
            }
        };
        match merge_substituted(&substituter, &self.sources, &output) {
            Ok(summary) => {
                let mut phase =
                    PhaseReport::completed(PhaseKind::Substitute, summary.lines, Some(output.clone()));
                let mut notes = Vec::new();
                if !summary.skipped.is_empty() {
                    notes.push(format!("{} sources skipped", summary.skipped.len()));
                }
                if summary.invalid_lines > 0 {
                    notes.push(format!("{} lines not UTF-8", summary.invalid_lines));
                }
                if !notes.is_empty() {
                    phase = phase.with_message(notes.join(", "));
                }
                self.report.push(phase);
                Some(output)
            }
            Err(err) => {
                error!(error = %err, "substitution abandoned");
                self.report
                    .push(PhaseReport::failed(PhaseKind::Substitute, 0, err.to_string()));
                None
            }
        }
    }

    /// Writes a copy of `input` without empty columns and returns the file to
    /// use from now on.
    pub fn prune(&mut self, input: &Path) -> PathBuf {
        let span = info_span!("prune");
        let _guard = span.enter();
        match prune_empty_columns(input) {
            Ok(PruneOutcome::Written { path, removed }) => {
                self.report.push(PhaseReport::completed(
                    PhaseKind::Prune,
                    removed.len(),
                    Some(path.clone()),
                ));
                path
            }
            Ok(PruneOutcome::Unchanged(path)) => {
                self.report.push(
                    PhaseReport::completed(PhaseKind::Prune, 0, None).with_message("no data rows"),
                );
                path
            }
            Err(err) => {
                error!(error = %err, "empty columns not removed");
                let failed = err.is_write_failure();
                let phase = if failed {
                    PhaseReport::failed(PhaseKind::Prune, 0, err.to_string())
                } else {
                    PhaseReport::completed(PhaseKind::Prune, 0, None).with_message(err.to_string())
                };
                self.report.push(phase);
                input.to_path_buf()
            }
        }
    }

    /// Splits `input` into category-ordered files in the split folder.
    pub fn split(&mut self, input: &Path, issue_types: &Mapping) {
        let span = info_span!("split");
        let _guard = span.enter();
        let options = SplitOptions::new(&self.settings.files.split_folder)
            .with_category_column(&self.settings.split.category_column)
            .with_max_rows(self.settings.max_rows());
        let mut splitter = Splitter::new(&options, issue_types);

        let phase = match splitter.split_file(input) {
            Ok(outcome) => PhaseReport::completed(
                PhaseKind::Split,
                outcome.files.len(),
                Some(options.folder.clone()),
            )
            .with_message(format!("{} rows", outcome.rows)),
            Err(OutputError::Split { written, source, .. }) => {
                error!(error = %source, written = written.len(), "split abandoned");
                PhaseReport::failed(PhaseKind::Split, written.len(), source.to_string())
            }
            Err(err) => {
                warn!(error = %err, "output not split");
                PhaseReport::completed(PhaseKind::Split, 0, None).with_message(err.to_string())
            }
        };
        self.report.push(phase);
    }

    fn record_saved(&mut self, phase: PhaseKind, store: &MappingStore, mapping: &Mapping) {
        let report = match store.save(mapping) {
            Ok(()) => PhaseReport::completed(phase, mapping.len(), Some(store.path().to_path_buf())),
            Err(err) => PhaseReport::failed(phase, mapping.len(), err.to_string()),
        };
        self.report.push(report);
    }

    fn record_loaded(&mut self, phase: PhaseKind, store: &MappingStore) -> Mapping {
        let mapping = clean_mapping(&store.load());
        self.report.push(
            PhaseReport::completed(phase, mapping.len(), Some(store.path().to_path_buf()))
                .with_message("loaded"),
        );
        mapping
    }
}

/// Runs the selected phases. `instances` supplies the source and target
/// directories when a mapping is to be created.
pub fn run<S, T>(settings: &Settings, options: &RunOptions, instances: Option<(&S, &T)>) -> RunReport
where
    S: UserDirectory,
    T: UserDirectory,
{
    let mut pipeline = Pipeline::new(settings);

    let users = match instances {
        Some((source, target)) if options.create_user_map => {
            pipeline.create_user_mapping(source, target)
        }
        _ => pipeline.load_user_mapping(),
    };
    let issue_types = match instances {
        Some((source, target)) if options.create_issue_type_map => {
            pipeline.create_issue_type_mapping(source, target)
        }
        _ => pipeline.load_issue_type_mapping(),
    };

    if options.update_csv {
        pipeline.substitute(&users, &issue_types);
    }

    let output = &settings.files.output_csv;
    if !output.is_file() {
        if options.prune_empty_columns || options.split {
            warn!(path = %output.display(), "no substituted output to post-process");
        }
        return pipeline.into_report();
    }

    let mut current = output.clone();
    if options.prune_empty_columns {
        current = pipeline.prune(&current);
    }
    if options.split {
        if issue_types.is_empty() {
            warn!("issue type mapping is empty, output not split");
        } else {
            pipeline.split(&current, &issue_types);
        }
    }
    pipeline.into_report()
}
