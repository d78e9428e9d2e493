//! Catalog merging
//!
//! Folds externally scraped data into a game's catalog. Existing entries
//! keep their ids, nothing is duplicated, and a bad entry only ever costs
//! that entry.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{BuildEntry, ClassEntry, GameCatalog, TopBuild};

/// A single entry that could not be applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeFailure {
    #[error("build {0} not found in catalog")]
    BuildNotFound(String),

    #[error("scrape of {build_id} failed: {reason}")]
    ScrapeFailed { build_id: String, reason: String },

    #[error("invalid entry in class {class_id}: {reason}")]
    InvalidEntry { class_id: String, reason: String },
}

/// Outcome of a merge or enrichment pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    /// Builds (or whole classes' builds) appended
    pub added: usize,
    /// Builds skipped because their id or name already exists
    pub duplicates: usize,
    /// Existing builds whose scraped data was replaced
    pub updated: usize,
    /// Results carrying nothing to apply
    pub skipped: usize,
    pub failures: Vec<MergeFailure>,
}

impl MergeReport {
    pub fn summary(&self) -> String {
        format!(
            "{} added, {} duplicates, {} updated, {} skipped, {} failed",
            self.added,
            self.duplicates,
            self.updated,
            self.skipped,
            self.failures.len()
        )
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Scraped statistics for one build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrapeResult {
    pub build_id: String,
    pub keystones: Vec<String>,
    pub builds: Vec<TopBuild>,
    pub error: Option<String>,
    pub url: Option<String>,
}

/// Append incoming builds to their classes.
///
/// A build is a duplicate when its class already holds a build with the
/// same id or the same name ignoring case. Classes the game does not know
/// are appended whole.
pub fn merge_builds(game: &mut GameCatalog, incoming: Vec<ClassEntry>) -> MergeReport {
    let mut report = MergeReport::default();

    for mut incoming_class in incoming {
        // Entries without an id or name cannot be tracked; drop just those
        incoming_class.skills.retain(|build| {
            let valid = !build.id.trim().is_empty() && !build.name.trim().is_empty();
            if !valid {
                report.failures.push(MergeFailure::InvalidEntry {
                    class_id: incoming_class.id.clone(),
                    reason: format!("build {:?} is missing an id or name", build.name),
                });
            }
            valid
        });

        match game.class_mut(&incoming_class.id) {
            Some(existing) => {
                for build in incoming_class.skills {
                    let lower = build.name.to_lowercase();
                    let duplicate = existing
                        .skills
                        .iter()
                        .any(|b| b.id == build.id || b.name.to_lowercase() == lower);
                    if duplicate {
                        report.duplicates += 1;
                    } else {
                        existing.skills.push(build);
                        report.added += 1;
                    }
                }
            }
            None => {
                log::info!("Adding new class {} to {}", incoming_class.id, game.id);
                // Dedup within the new class as well
                let mut kept: Vec<BuildEntry> = Vec::with_capacity(incoming_class.skills.len());
                for build in std::mem::take(&mut incoming_class.skills) {
                    let lower = build.name.to_lowercase();
                    if kept.iter().any(|b| b.id == build.id || b.name.to_lowercase() == lower) {
                        report.duplicates += 1;
                    } else {
                        kept.push(build);
                    }
                }
                report.added += kept.len();
                incoming_class.skills = kept;
                game.classes.push(incoming_class);
            }
        }
    }

    report
}

/// Replace keystones and top builds on the builds named by each result
pub fn apply_enrichment(game: &mut GameCatalog, results: &[ScrapeResult]) -> MergeReport {
    let mut report = MergeReport::default();

    for result in results {
        if let Some(reason) = &result.error {
            report.failures.push(MergeFailure::ScrapeFailed {
                build_id: result.build_id.clone(),
                reason: reason.clone(),
            });
            continue;
        }
        if result.keystones.is_empty() && result.builds.is_empty() {
            log::debug!("Skipping {}: no data", result.build_id);
            report.skipped += 1;
            continue;
        }

        let target = game
            .classes
            .iter_mut()
            .find_map(|c| c.build_mut(&result.build_id));
        match target {
            Some(build) => {
                build.keystones = result.keystones.clone();
                build.top_builds = result.builds.clone();
                report.updated += 1;
                log::info!(
                    "Updated {} ({} keystones, {} builds)",
                    result.build_id,
                    result.keystones.len(),
                    result.builds.len()
                );
            }
            None => {
                report
                    .failures
                    .push(MergeFailure::BuildNotFound(result.build_id.clone()));
            }
        }
    }

    report
}
