use nalgebra::Point3;
use std::io::{self, Write};

/// One emitted atom of the positional atom listing.
///
/// The `index` is the record's 1-based position in the whole export and is
/// globally monotonic across the single export pass; downstream tooling
/// keys on it, so emission order must never be perturbed.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// The atom label as it appears in the listing.
    pub label: String,
    /// Absolute position in the output frame, in Ångström.
    pub position: Point3<f64>,
    /// 1-based sequential record index.
    pub index: usize,
}

impl AtomRecord {
    /// Formats the record as one listing line.
    ///
    /// Field widths (label left-justified to 4, coordinates left-justified
    /// to 10 with 6 decimals) reproduce the downstream consumer's input
    /// grammar exactly and must not be changed.
    pub fn to_line(&self) -> String {
        format!(
            "{:<4} {:<10.6} {:<10.6} {:<10.6} {}",
            self.label, self.position.x, self.position.y, self.position.z, self.index
        )
    }
}

/// Writes the complete listing: atom count, a blank line, then one line per
/// record in emission order.
pub fn write_listing(records: &[AtomRecord], writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "{}", records.len())?;
    writeln!(writer)?;
    for record in records {
        writeln!(writer, "{}", record.to_line())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_format_matches_consumer_grammar() {
        let record = AtomRecord {
            label: "H".to_string(),
            position: Point3::new(2.11968, 0.0, 1.92),
            index: 7,
        };
        assert_eq!(record.to_line(), "H    2.119680   0.000000   1.920000   7");
    }

    #[test]
    fn negative_coordinates_keep_field_alignment() {
        let record = AtomRecord {
            label: "SI".to_string(),
            position: Point3::new(-0.96, -1.3578, 0.0),
            index: 12,
        };
        assert_eq!(record.to_line(), "SI   -0.960000  -1.357800  0.000000   12");
    }

    #[test]
    fn listing_has_count_and_blank_line_header() {
        let records = vec![
            AtomRecord {
                label: "H".to_string(),
                position: Point3::new(0.0, 0.0, 0.0),
                index: 1,
            },
            AtomRecord {
                label: "H".to_string(),
                position: Point3::new(7.68, 0.0, 0.0),
                index: 2,
            },
        ];
        let mut out = Vec::new();
        write_listing(&records, &mut out).expect("writes");
        let text = String::from_utf8(out).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("2"));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(
            lines.next(),
            Some("H    0.000000   0.000000   0.000000   1")
        );
        assert_eq!(
            lines.next(),
            Some("H    7.680000   0.000000   0.000000   2")
        );
        assert_eq!(lines.next(), None);
    }
}
