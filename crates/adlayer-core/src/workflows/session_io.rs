//! The session persistence workflows: snapshot a session to a TOML file and
//! rebuild one from disk against a catalog.

use crate::core::io::session::SessionState;
use crate::core::models::catalog::Catalog;
use crate::engine::error::EngineError;
use crate::engine::session::Session;
use std::path::Path;
use tracing::{info, instrument};

/// Saves the session snapshot to a TOML file.
///
/// # Errors
///
/// Returns an [`EngineError`] if the snapshot cannot be serialized or the
/// file cannot be written.
#[instrument(skip(session))]
pub fn save(session: &Session, path: &Path) -> Result<(), EngineError> {
    session.to_state().write_file(path)?;
    info!(path = %path.display(), "session saved");
    Ok(())
}

/// Loads a session from a TOML file, resolving molecule names through the
/// catalog. A failed load leaves no half-built session behind.
///
/// # Errors
///
/// Returns an [`EngineError`] for unreadable or malformed files, unknown
/// catalog names, and structurally inconsistent snapshots.
#[instrument(skip(catalog))]
pub fn load(path: &Path, catalog: &Catalog) -> Result<Session, EngineError> {
    let state = SessionState::read_file(path)?;
    let session = Session::from_state(&state, catalog)?;
    info!(
        path = %path.display(),
        layers = session.layer_count(),
        "session loaded"
    );
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::grid::GridCoord;
    use crate::core::models::molecule::{MoleculeSpec, RotationSense};
    use crate::core::models::site::SitePosition;

    fn test_catalog() -> Catalog {
        Catalog::from_entries(vec![MoleculeSpec {
            name: "Tip".to_string(),
            footprint: (1, 2),
            pivot: (0.0, 0.5),
            template: "tip.xyz".to_string(),
            translation: [0.0, 0.0, 0.0],
            rotatable: true,
            sense: RotationSense::CounterClockwise,
        }])
        .expect("valid catalog")
    }

    #[test]
    fn save_then_load_rebuilds_the_session() {
        let catalog = test_catalog();
        let mut session = Session::new();
        session
            .begin_paint(GridCoord::new(2, 2), SitePosition::Left)
            .unwrap();
        session.end_gesture();
        let spec = catalog.get("Tip").unwrap().clone();
        session.place_molecule(spec, GridCoord::new(0, 0)).unwrap();

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("session.toml");
        save(&session, &path).expect("saves");

        let loaded = load(&path, &catalog).expect("loads");
        assert_eq!(loaded.to_state(), session.to_state());
    }

    #[test]
    fn load_failure_reports_the_path() {
        let catalog = test_catalog();
        let err = load(Path::new("/nonexistent/session.toml"), &catalog).unwrap_err();
        assert!(err.to_string().contains("session.toml"));
    }
}
