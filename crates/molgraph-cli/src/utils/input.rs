use crate::error::{CliError, Result};
use molgraph::core::io::molfile::Molfile;
use molgraph::core::models::mol::Mol;
use std::path::Path;
use tracing::debug;

const RECORD_TERMINATOR: &str = "$$$$";

/// Splits SD file text into records, each keeping its `$$$$` line so that data items
/// stay attached. Blank records are dropped.
pub fn split_records(text: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        if line.trim_end() == RECORD_TERMINATOR {
            if !text[start..line_start].trim().is_empty() {
                records.push(&text[start..offset]);
            }
            start = offset;
        }
    }
    if !text[start..].trim().is_empty() {
        records.push(&text[start..]);
    }
    records
}

/// Reads every structure stored in a molfile or SD file.
///
/// Records without a name are named after the file and their 1-based position.
pub fn read_structures(path: &Path, codec: &Molfile) -> Result<Vec<Mol>> {
    let text = std::fs::read_to_string(path)?;
    let records = split_records(&text);
    debug!(path = %path.display(), records = records.len(), "splitting structure file");

    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let mut mol = codec.decode(record).map_err(|e| CliError::Molfile {
                path: path.to_path_buf(),
                source: e,
            })?;
            if mol.name.trim().is_empty() {
                mol.name = format!("{}#{}", path.display(), i + 1);
            }
            Ok(mol)
        })
        .collect()
}

/// Reads a file that must hold exactly one structure.
pub fn read_single(path: &Path, codec: &Molfile) -> Result<Mol> {
    let mut structures = read_structures(path, codec)?;
    match structures.len() {
        1 => Ok(structures.remove(0)),
        0 => Err(CliError::Argument(format!(
            "'{}' contains no structure",
            path.display()
        ))),
        n => Err(CliError::Argument(format!(
            "'{}' contains {} structures; expected one",
            path.display(),
            n
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const METHANE: &str = "\
methane
  molgraph          2D

  1  0  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
M  END
";

    #[test]
    fn records_keep_their_terminators() {
        let text = "a\nM  END\n$$$$\nb\nM  END\n$$$$\n";
        let records = split_records(text);
        assert_eq!(records, vec!["a\nM  END\n$$$$\n", "b\nM  END\n$$$$\n"]);
    }

    #[test]
    fn unterminated_last_record_is_kept_and_blank_tail_dropped() {
        assert_eq!(split_records("a\n$$$$\nb\n").len(), 2);
        assert_eq!(split_records("a\n$$$$\n\n  \n").len(), 1);
        assert_eq!(split_records("a\n$$$$\n$$$$\n").len(), 1);
        assert!(split_records("").is_empty());
    }

    #[test]
    fn sd_file_yields_every_structure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("set.sdf");
        let unnamed = METHANE.replacen("methane", "", 1);
        fs::write(&path, format!("{METHANE}> <id>\n7\n\n$$$$\n{unnamed}$$$$\n")).unwrap();

        let structures = read_structures(&path, &Molfile::new()).unwrap();
        assert_eq!(structures.len(), 2);
        assert_eq!(structures[0].name, "methane");
        assert_eq!(structures[0].props.get("id").map(String::as_str), Some("7"));
        assert!(structures[1].name.ends_with("set.sdf#2"));
    }

    #[test]
    fn single_structure_is_enforced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("two.sdf");
        fs::write(&path, format!("{METHANE}$$$$\n{METHANE}$$$$\n")).unwrap();
        assert!(matches!(
            read_single(&path, &Molfile::new()),
            Err(CliError::Argument(_))
        ));
    }

    #[test]
    fn decode_failures_name_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.mol");
        fs::write(&path, "broken\n\n\n  2  0  0  0  0  0  0  0  0  0999 V2000\n").unwrap();
        let err = read_structures(&path, &Molfile::new()).unwrap_err();
        assert!(matches!(err, CliError::Molfile { .. }));
        assert!(err.to_string().contains("broken.mol"));
    }
}
