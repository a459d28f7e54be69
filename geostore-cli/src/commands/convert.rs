//! Document conversion.

use std::path::{Path, PathBuf};

use geostore::config::StorageSettings;
use geostore::store::ContainerRegistry;
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Import `input` into `container`, optionally enrich it, and export it to
/// `output`.
pub fn run(
    runner: &CliRunner,
    input: &Path,
    output: Option<&Path>,
    container: &str,
    enrich: bool,
) -> Result<(), CliError> {
    let (input_path, output_path) =
        resolve_paths(&runner.config().storage, input, output, container);
    let (input, output) = (input_path.as_path(), output_path.as_path());

    let count = if enrich {
        let service = runner.create_service()?;
        let count = service.registry().load_from_json_file(container, input)?;
        let updated =
            runner.block_on(service.enrich_container(container, runner.cancel_token()))?;
        println!("Resolved locations for {} of {} entities", updated, count);
        service.registry().save_to_json_file(container, output)?;
        count
    } else {
        convert_document(&ContainerRegistry::new(), input, output, container)?
    };

    info!(input = %input.display(), output = %output.display(), count, "Document converted");
    println!(
        "Converted {} entities: {} -> {}",
        count,
        input.display(),
        output.display()
    );
    Ok(())
}

/// Resolve both document paths against the storage directory.
fn resolve_paths(
    storage: &StorageSettings,
    input: &Path,
    output: Option<&Path>,
    container: &str,
) -> (PathBuf, PathBuf) {
    let output = match output {
        Some(path) => storage.document_path(path),
        None => storage.container_document(container),
    };
    (storage.document_path(input), output)
}

/// Load a document into `container` and save it back out normalized.
fn convert_document(
    registry: &ContainerRegistry,
    input: &Path,
    output: &Path,
    container: &str,
) -> Result<usize, CliError> {
    let count = registry.load_from_json_file(container, input)?;
    registry.save_to_json_file(container, output)?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_convert_normalizes_document() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in.json");
        let output = temp.path().join("out").join("normalized.json");
        std::fs::write(
            &input,
            r#"[{"NAME": "Bob", "ID": "p2", "LAT": 1, "LNG": 2, "Home_Town": "Rome"},
               {"id": "p1", "name": "Alice", "latitude": "3.5", "longitude": "4.5"}]"#,
        )
        .unwrap();

        let count =
            convert_document(&ContainerRegistry::new(), &input, &output, "default").unwrap();

        assert_eq!(count, 2);
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.find("\"p1\"").unwrap() < written.find("\"p2\"").unwrap());
        assert!(written.contains("\"homeTown\": \"Rome\""));
        assert!(written.contains("\"latitude\": 3.5"));
    }

    #[test]
    fn test_paths_resolve_against_data_dir() {
        let storage = StorageSettings {
            data_dir: PathBuf::from("/srv/geo"),
        };

        let (input, output) = resolve_paths(&storage, Path::new("in.json"), None, "east");
        assert_eq!(input, PathBuf::from("/srv/geo/in.json"));
        assert_eq!(output, PathBuf::from("/srv/geo/east.json"));

        let (input, output) = resolve_paths(
            &storage,
            Path::new("/tmp/in.json"),
            Some(Path::new("out/normalized.json")),
            "east",
        );
        assert_eq!(input, PathBuf::from("/tmp/in.json"));
        assert_eq!(output, PathBuf::from("/srv/geo/out/normalized.json"));
    }

    #[test]
    fn test_convert_missing_input() {
        let temp = TempDir::new().unwrap();
        let err = convert_document(
            &ContainerRegistry::new(),
            &temp.path().join("absent.json"),
            &temp.path().join("out.json"),
            "default",
        )
        .unwrap_err();

        assert!(matches!(err, CliError::Document(_)));
        assert!(!temp.path().join("out.json").exists());
    }
}
