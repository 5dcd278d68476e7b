use nalgebra::Point3;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Represents errors that can occur while loading a structure template.
///
/// A missing or malformed template is fatal for the operation that needed it
/// (typically an export); the error names the offending file so the failure
/// can be surfaced to the user together with the affected entity.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template file could not be read from disk.
    #[error("failed to read structure template '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// An atom line could not be parsed as `element x y z`.
    #[error("malformed atom line {line} in structure template '{path}'", path = path.display())]
    Malformed { path: PathBuf, line: usize },
}

/// One atom of a structure template, in local molecule coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateAtom {
    /// The element label, emitted verbatim into the output listing.
    pub element: String,
    /// Position in the template's local frame, in Ångström.
    pub position: Point3<f64>,
}

/// The local geometry of one molecule or lattice unit, read from a
/// plain-text atom-list file.
///
/// The file format is the conventional XYZ layout: the first two lines are a
/// header (atom count and a comment) and are skipped; each following
/// non-empty line is whitespace-separated `element x y z`. Atom order is
/// preserved; it determines emission order on export.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureTemplate {
    /// The template atoms in file order.
    pub atoms: Vec<TemplateAtom>,
}

impl StructureTemplate {
    /// Parses a template from a reader; `path` is used for error reporting.
    pub fn parse(reader: impl BufRead, path: &Path) -> Result<Self, TemplateError> {
        let mut atoms = Vec::new();
        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| TemplateError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let line_num = line_num + 1;
            // two-line header: count and comment
            if line_num <= 2 || line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let element = fields.next();
            let coords: Vec<f64> = fields
                .by_ref()
                .take(3)
                .map_while(|f| f.parse::<f64>().ok())
                .collect();
            match (element, coords.as_slice()) {
                (Some(element), [x, y, z]) => atoms.push(TemplateAtom {
                    element: element.to_string(),
                    position: Point3::new(*x, *y, *z),
                }),
                _ => {
                    return Err(TemplateError::Malformed {
                        path: path.to_path_buf(),
                        line: line_num,
                    });
                }
            }
        }
        Ok(Self { atoms })
    }

    /// Loads a template from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Io`] if the file cannot be opened or read,
    /// and [`TemplateError::Malformed`] for an unparsable atom line.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(BufReader::new(file), path)
    }
}

/// A per-name cache of structure templates rooted at a structures directory.
///
/// Every template is read from disk at most once per store lifetime; exports
/// that reference the same template repeatedly (one lattice unit per cell,
/// several instances of one molecule) hit the cache.
#[derive(Debug, Default)]
pub struct TemplateStore {
    root: PathBuf,
    cache: HashMap<String, StructureTemplate>,
}

impl TemplateStore {
    /// Creates a store resolving template names inside `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    /// Returns the template with the given file name, loading it on first use.
    pub fn get(&mut self, name: &str) -> Result<&StructureTemplate, TemplateError> {
        if !self.cache.contains_key(name) {
            let template = StructureTemplate::load(self.root.join(name))?;
            self.cache.insert(name.to_string(), template);
        }
        Ok(&self.cache[name])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TEMPLATE: &str = "3\ncarbon monoxide tip\nC  0.0 0.0 0.0\nO  0.0 1.128 0.0\nH  0.5 -0.3 0.25\n";

    #[test]
    fn parse_skips_header_and_preserves_order() {
        let template =
            StructureTemplate::parse(TEMPLATE.as_bytes(), Path::new("co.xyz")).expect("parses");
        assert_eq!(template.atoms.len(), 3);
        assert_eq!(template.atoms[0].element, "C");
        assert_eq!(template.atoms[1].position, Point3::new(0.0, 1.128, 0.0));
        assert_eq!(template.atoms[2].element, "H");
    }

    #[test]
    fn parse_reports_malformed_line() {
        let bad = "2\ncomment\nC 0.0 0.0 0.0\nO 0.0 not-a-number 0.0\n";
        let err = StructureTemplate::parse(bad.as_bytes(), Path::new("bad.xyz")).unwrap_err();
        assert!(matches!(err, TemplateError::Malformed { line: 4, .. }));
    }

    #[test]
    fn parse_ignores_trailing_blank_lines() {
        let padded = format!("{TEMPLATE}\n\n");
        let template =
            StructureTemplate::parse(padded.as_bytes(), Path::new("co.xyz")).expect("parses");
        assert_eq!(template.atoms.len(), 3);
    }

    #[test]
    fn store_caches_and_reports_missing_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("co.xyz");
        let mut file = File::create(&path).expect("create template");
        file.write_all(TEMPLATE.as_bytes()).expect("write template");
        drop(file);

        let mut store = TemplateStore::new(dir.path());
        assert_eq!(store.get("co.xyz").expect("loads").atoms.len(), 3);

        // served from cache even after the file disappears
        std::fs::remove_file(&path).expect("remove template");
        assert_eq!(store.get("co.xyz").expect("cached").atoms.len(), 3);

        let err = store.get("absent.xyz").unwrap_err();
        assert!(matches!(err, TemplateError::Io { .. }));
        assert!(err.to_string().contains("absent.xyz"));
    }
}
