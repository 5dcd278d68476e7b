//! The `export` command: load a saved session and write its positional atom
//! listing.

use crate::cli::ExportArgs;
use crate::error::{CliError, Result};
use adlayer::core::io::template::TemplateStore;
use adlayer::core::models::catalog::Catalog;
use adlayer::core::models::site::ATOM_KIND_COUNT;
use adlayer::engine::composer::ExportOptions;
use adlayer::workflows::{export, session_io};
use anyhow::Context;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing::info;

pub fn run(args: ExportArgs) -> Result<()> {
    let catalog = Catalog::load(&args.catalog)?;
    let mut session = session_io::load(&args.session, &catalog)?;
    let mut templates = TemplateStore::new(&args.structures);

    let options = ExportOptions {
        layers_to_draw: args.layers,
        hydrogen_termination: args.terminate,
        surface_labels: args
            .surface_labels
            .as_deref()
            .map(parse_labels)
            .transpose()?,
        substrate_labels: args
            .substrate_labels
            .as_deref()
            .map(parse_labels)
            .transpose()?,
    };

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file '{}'", path.display()))?;
            let mut writer = BufWriter::new(file);
            let written = export::run(&mut session, &mut templates, &options, &mut writer)?;
            writer.flush()?;
            info!(atoms = written, path = %path.display(), "listing exported");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            export::run(&mut session, &mut templates, &options, &mut writer)?;
        }
    }
    Ok(())
}

fn parse_labels(raw: &str) -> Result<[String; ATOM_KIND_COUNT]> {
    let labels: Vec<String> = raw.split(',').map(|label| label.trim().to_string()).collect();
    labels.try_into().map_err(|_| {
        CliError::Argument(format!(
            "expected {ATOM_KIND_COUNT} comma-separated labels, got '{raw}'"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SESSION_TOML: &str = "\
current_layer = 0

[[layer]]
col = 0
row = 0
width = 2
height = 2
atom_labels = [\"H\", \"H\", \"H\", \"H\", \"H\"]
";

    #[test]
    fn unwritable_output_path_is_reported_with_context() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("catalog.toml"), "").expect("write catalog");
        fs::write(dir.path().join("session.toml"), SESSION_TOML).expect("write session");

        let args = ExportArgs {
            session: dir.path().join("session.toml"),
            catalog: dir.path().join("catalog.toml"),
            structures: dir.path().to_path_buf(),
            output: Some(dir.path().join("missing").join("out.xyz")),
            layers: None,
            terminate: false,
            surface_labels: None,
            substrate_labels: None,
        };
        let err = run(args).unwrap_err();
        assert!(matches!(err, CliError::Other(_)));
        assert!(err.to_string().contains("out.xyz"));
    }

    #[test]
    fn parses_five_labels() {
        let labels = parse_labels("H, D, SI, GE, X").expect("parses");
        assert_eq!(labels[1], "D");
        assert_eq!(labels[4], "X");
    }

    #[test]
    fn rejects_wrong_label_count() {
        assert!(matches!(
            parse_labels("H,D"),
            Err(CliError::Argument(_))
        ));
    }
}
