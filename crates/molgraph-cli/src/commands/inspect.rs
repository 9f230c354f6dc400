use crate::cli::{InspectArgs, ReportFormat};
use crate::config::PartialCliConfig;
use crate::error::{CliError, Result};
use crate::utils::input::read_structures;
use molgraph::core::io::molfile::Molfile;
use molgraph::workflows::{self, inspect::InspectReport};
use serde::Serialize;
use std::io::Write;
use tracing::info;

#[derive(Serialize)]
struct ReportDocument<'a> {
    structure: &'a [InspectReport],
}

pub fn run(args: &InspectArgs, config: &PartialCliConfig, out: &mut impl Write) -> Result<()> {
    let registry = config.template_registry()?;
    let codec = Molfile::new().with_templates(&registry);
    let (inspect_config, format) = config.merge_inspect(args);

    let mut reports = Vec::new();
    for path in &args.files {
        info!("Loading structures from {:?}", path);
        for mol in read_structures(path, &codec)? {
            reports.push(workflows::inspect::run(&mol, &inspect_config));
        }
    }
    info!("Inspected {} structure(s).", reports.len());

    match format {
        ReportFormat::Text => {
            for (i, report) in reports.iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                write!(out, "{}", report)?;
            }
        }
        ReportFormat::Toml => {
            let text = toml::to_string(&ReportDocument {
                structure: &reports,
            })
            .map_err(|e| CliError::Other(e.into()))?;
            write!(out, "{}", text)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::commands::fixtures::*;
    use clap::Parser;
    use tempfile::tempdir;

    fn inspect_args(args: &[&str]) -> InspectArgs {
        let mut full = vec!["molgraph", "inspect"];
        full.extend_from_slice(args);
        match Cli::parse_from(full).command {
            Commands::Inspect(args) => args,
            _ => panic!("Expected 'inspect' subcommand"),
        }
    }

    #[test]
    fn text_report_covers_every_structure() {
        let dir = tempdir().unwrap();
        let path = write_structures(dir.path(), "set.sdf", &[toluene(), cyclohexane()]);
        let args = inspect_args(&[path.to_str().unwrap()]);

        let mut out = Vec::new();
        run(&args, &PartialCliConfig::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Name:             toluene"));
        assert!(text.contains("Formula:          C7H8"));
        assert!(text.contains("Rings:            1 (1 aromatic)"));
        assert!(text.contains("Formula:          C6H12"));
        assert!(text.contains("Rings:            1 (0 aromatic)"));
    }

    #[test]
    fn toml_report_is_an_array_of_tables() {
        let dir = tempdir().unwrap();
        let path = write_structures(dir.path(), "benzene.mol", &[benzene()]);
        let args = inspect_args(&["--format", "toml", path.to_str().unwrap()]);

        let mut out = Vec::new();
        run(&args, &PartialCliConfig::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("[[structure]]"));
        assert!(text.contains("formula = \"C6H6\""));
        assert!(text.contains("aromatic-rings = 1"));
    }

    #[test]
    fn missing_input_is_an_io_error() {
        let args = inspect_args(&["/nonexistent/absent.mol"]);
        let result = run(&args, &PartialCliConfig::default(), &mut Vec::new());
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
