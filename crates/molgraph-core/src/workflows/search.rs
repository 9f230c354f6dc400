use crate::core::models::mol::Mol;
use crate::engine::config::MatchConfig;
use crate::engine::error::EngineError;
use crate::engine::matching::{AtomAtomMap, PreparedMol, passes_screen, search_screened};
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Position of the target in the searched slice.
    pub index: usize,
    pub name: String,
    pub mapping: AtomAtomMap,
}

#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub hits: Vec<SearchHit>,
    /// Targets rejected by fingerprint screening without a search.
    pub screened_out: usize,
    /// Targets whose search ran out of its step budget.
    pub aborted: Vec<usize>,
}

enum TargetResult {
    Hit(AtomAtomMap),
    Miss { screened: bool },
    Aborted,
}

fn evaluate(
    query: &PreparedMol,
    target: &Mol,
    config: &MatchConfig,
) -> Result<TargetResult, EngineError> {
    let target = PreparedMol::new(target);
    if !passes_screen(query, &target, config) {
        return Ok(TargetResult::Miss { screened: true });
    }
    match search_screened(query, &target, config) {
        Ok(Some(mapping)) => Ok(TargetResult::Hit(mapping)),
        Ok(None) => Ok(TargetResult::Miss { screened: false }),
        Err(EngineError::SearchBudgetExceeded { .. }) => Ok(TargetResult::Aborted),
        Err(e) => Err(e),
    }
}

/// Matches `query` against every target.
///
/// Targets that exceed the step budget are listed in [`SearchOutcome::aborted`] instead
/// of failing the whole run; any other engine error is returned.
#[instrument(skip_all, name = "search_workflow", fields(targets = targets.len()))]
pub fn run(
    query: &Mol,
    targets: &[Mol],
    config: &MatchConfig,
    reporter: &ProgressReporter,
) -> Result<SearchOutcome, EngineError> {
    let prepared_query = PreparedMol::new(query);
    reporter.report(Progress::SearchStart {
        total: targets.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = targets.iter().enumerate();

    #[cfg(feature = "parallel")]
    let iterator = targets.par_iter().enumerate();

    let results: Vec<Result<TargetResult, EngineError>> = iterator
        .map(|(index, target)| {
            let result = evaluate(&prepared_query, target, config);
            reporter.report(Progress::TargetDone {
                index,
                matched: matches!(result, Ok(TargetResult::Hit(_))),
            });
            result
        })
        .collect();

    let mut outcome = SearchOutcome::default();
    for (index, result) in results.into_iter().enumerate() {
        match result? {
            TargetResult::Hit(mapping) => outcome.hits.push(SearchHit {
                index,
                name: targets[index].name.clone(),
                mapping,
            }),
            TargetResult::Miss { screened } => {
                if screened {
                    outcome.screened_out += 1;
                }
            }
            TargetResult::Aborted => {
                warn!(index, "search budget exceeded; target skipped");
                outcome.aborted.push(index);
            }
        }
    }

    reporter.report(Progress::SearchFinish {
        hits: outcome.hits.len(),
    });
    info!(
        hits = outcome.hits.len(),
        screened_out = outcome.screened_out,
        aborted = outcome.aborted.len(),
        "search finished"
    );
    Ok(outcome)
}
