use crate::cli::SearchArgs;
use crate::config::PartialCliConfig;
use crate::error::Result;
use crate::utils::input::{read_single, read_structures};
use crate::utils::progress::CliProgressHandler;
use molgraph::core::io::molfile::Molfile;
use molgraph::core::models::ids::AtomId;
use molgraph::core::models::mol::Mol;
use molgraph::engine::matching::AtomAtomMap;
use molgraph::engine::progress::ProgressReporter;
use molgraph::workflows;
use std::io::Write;
use tracing::{info, warn};

pub fn run(args: &SearchArgs, config: &PartialCliConfig, out: &mut impl Write) -> Result<()> {
    run_with_progress(args, config, &CliProgressHandler::new(), out)
}

fn run_with_progress(
    args: &SearchArgs,
    config: &PartialCliConfig,
    progress: &CliProgressHandler,
    out: &mut impl Write,
) -> Result<()> {
    let registry = config.template_registry()?;
    let codec = Molfile::new().with_templates(&registry);
    let match_config = config.merge_search(args)?;

    info!("Loading query structure from {:?}", &args.query);
    let query = read_single(&args.query, &codec)?;

    let mut targets = Vec::new();
    for path in &args.targets {
        info!("Loading target structures from {:?}", path);
        targets.extend(read_structures(path, &codec)?);
    }
    info!("Searching {} target(s) ({:?}).", targets.len(), match_config.mode);

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let outcome = workflows::search::run(&query, &targets, &match_config, &reporter)?;

    for hit in &outcome.hits {
        writeln!(out, "{}\t{}", hit.index + 1, hit.name)?;
        if args.show_mapping {
            writeln!(
                out,
                "\t{}",
                describe_mapping(&query, &targets[hit.index], &hit.mapping)
            )?;
        }
    }

    if !outcome.aborted.is_empty() {
        let positions: Vec<String> = outcome
            .aborted
            .iter()
            .map(|i| (i + 1).to_string())
            .collect();
        warn!(
            "Search budget exhausted for target(s) {}; raise --max-steps to search them fully.",
            positions.join(", ")
        );
    }
    info!(
        "{} hit(s), {} target(s) rejected by screening.",
        outcome.hits.len(),
        outcome.screened_out
    );
    Ok(())
}

/// Renders a mapping as `query->target` pairs of 1-based atom positions. Atoms that only
/// exist after superatom expansion print as `*`.
fn describe_mapping(query: &Mol, target: &Mol, mapping: &AtomAtomMap) -> String {
    let position = |mol: &Mol, id: AtomId| {
        mol.atom_index(id)
            .map(|i| (i + 1).to_string())
            .unwrap_or_else(|| "*".to_string())
    };
    mapping
        .atoms
        .iter()
        .map(|&(q, t)| format!("{}->{}", position(query, q), position(target, t)))
        .collect::<Vec<_>>()
        .join(" ")
}
