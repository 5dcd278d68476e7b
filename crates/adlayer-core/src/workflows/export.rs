//! The export workflow: compose the session's atom geometry and write the
//! positional atom listing.

use crate::core::io::template::TemplateStore;
use crate::core::io::xyz;
use crate::engine::composer::{self, ExportOptions};
use crate::engine::error::EngineError;
use crate::engine::session::Session;
use std::io::Write;
use tracing::{info, instrument};

/// Runs a full export pass and writes the listing to `writer`.
///
/// All layers are first brought to the current layer's bounds, so the
/// emitted planes cover the same cells. Returns the number of atom records
/// written.
///
/// # Errors
///
/// Returns an [`EngineError`] if a structure template cannot be loaded or
/// the listing cannot be written; on error nothing useful has been written.
#[instrument(skip_all, fields(layers = session.layer_count()))]
pub fn run(
    session: &mut Session,
    templates: &mut TemplateStore,
    options: &ExportOptions,
    writer: &mut impl Write,
) -> Result<usize, EngineError> {
    session.sync_layer_bounds();
    let records = composer::compose(session, templates, options)?;
    xyz::write_listing(&records, writer)?;
    info!(atoms = records.len(), "atom listing written");
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::grid::{GridCoord, GridRect};
    use crate::core::models::site::SitePosition;
    use std::fs;

    #[test]
    fn listing_starts_with_the_record_count() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("base.xyz"), "1\nunit\nSI 0.0 0.0 0.0\n").expect("write");
        let mut templates = TemplateStore::new(dir.path());

        let mut session = Session::new();
        session.resize_surface(GridRect::new(GridCoord::new(0, 0), 2, 1).unwrap());
        session.layer_mut(0).unwrap().lattice_template = Some("base.xyz".to_string());
        session
            .begin_paint(GridCoord::new(0, 0), SitePosition::Left)
            .unwrap();
        session.end_gesture();

        let mut out = Vec::new();
        let written = run(&mut session, &mut templates, &ExportOptions::default(), &mut out)
            .expect("exports");
        assert_eq!(written, 3);
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("3\n\n"));
        assert_eq!(text.lines().count(), 5);
    }
}
