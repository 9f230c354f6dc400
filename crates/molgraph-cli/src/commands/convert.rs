use crate::cli::ConvertArgs;
use crate::config::PartialCliConfig;
use crate::error::{CliError, Result};
use crate::utils::input::read_single;
use molgraph::core::io::molfile::Molfile;
use molgraph::core::io::traits::MolecularFile;
use tracing::info;

pub fn run(args: &ConvertArgs, config: &PartialCliConfig) -> Result<()> {
    let registry = config.template_registry()?;
    let codec = Molfile::new()
        .with_templates(&registry)
        .reading_reaction(args.reaction);

    info!("Loading input structure from {:?}", &args.input);
    let mut mol = read_single(&args.input, &codec)?;

    if args.expand_superatoms {
        let expanded = mol.expand_super_atoms();
        info!("Expanded {} superatom(s).", expanded);
    }

    info!("Writing structure to {:?}", &args.output);
    codec
        .write_to_path(&mol, &args.output)
        .map_err(|e| CliError::Molfile {
            path: args.output.clone(),
            source: e,
        })?;

    println!(
        "✓ Wrote {} atom(s) and {} bond(s) to {}",
        mol.atom_count(),
        mol.bond_count(),
        args.output.display()
    );
    Ok(())
}
