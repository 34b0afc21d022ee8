//! Position output formatting and serialization
//!
//! Human-readable, JSON and CSV renderings of [`PositionUpdate`] and
//! [`BeaconDiagnostic`] values.

use crate::api::types::{BeaconDiagnostic, PositionUpdate};
use crate::core::DISTANCE_UNKNOWN;
use std::fmt::Write as _;

/// Human-readable text formatter
#[derive(Debug, Clone)]
pub struct TextFormatter {
    /// Decimal places for coordinates and distances
    pub precision: usize,
    /// Append the sequence number and fallback marker to location lines
    pub verbose: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            precision: 2,
            verbose: false,
        }
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self {
            verbose: true,
            ..Default::default()
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Location line: position, distance moved and direction of the move
    pub fn format_location(&self, update: &PositionUpdate) -> String {
        let p = self.precision;
        let (x, y, moved, direction) = update.as_tuple();
        let mut output = format!(
            "X: {:.p$}, Y: {:.p$}, Moved: {:.p$}, Direction: {:.1}°",
            x, y, moved, direction
        );

        if self.verbose {
            let _ = write!(output, " (#{})", update.sequence_number);
            if update.used_fallback {
                output.push_str(" [centroid]");
            }
        }
        output
    }

    /// One line per beacon. Unknown distances print as the -1 sentinel.
    pub fn format_diagnostics(&self, diagnostics: &[BeaconDiagnostic]) -> String {
        let mut output = String::new();
        for diagnostic in diagnostics {
            let rssi = diagnostic
                .last_signal_strength
                .map_or_else(|| "n/a".to_string(), |rssi| rssi.to_string());
            let distance = diagnostic.estimated_distance.unwrap_or(DISTANCE_UNKNOWN);
            let _ = writeln!(
                output,
                "Beacon: {}, RSSI: {}, Distance: {:.2}",
                diagnostic.identifier, rssi, distance
            );
        }
        output
    }
}

/// JSON formatter for structured output
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Pretty print JSON
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn format_update(&self, update: &PositionUpdate) -> Result<String, serde_json::Error> {
        self.to_string(update)
    }

    pub fn format_diagnostics(&self, diagnostics: &[BeaconDiagnostic]) -> Result<String, serde_json::Error> {
        self.to_string(diagnostics)
    }

    fn to_string<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }
}

/// CSV formatter for data logging
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Include header row
    pub include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self { include_header: true }
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> &'static str {
        "sequence,x,y,displacement,bearing_deg,used_fallback"
    }

    pub fn format_csv(&self, update: &PositionUpdate) -> String {
        format!(
            "{},{:.6},{:.6},{:.6},{:.3},{}",
            update.sequence_number,
            update.position.x,
            update.position.y,
            update.displacement,
            update.bearing_degrees,
            update.used_fallback
        )
    }

    /// Header (if enabled) followed by one row per update
    pub fn format_all(&self, updates: &[PositionUpdate]) -> String {
        let mut output = String::new();
        if self.include_header {
            output.push_str(self.header());
            output.push('\n');
        }
        for update in updates {
            output.push_str(&self.format_csv(update));
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point;

    fn update() -> PositionUpdate {
        PositionUpdate {
            position: Point::new(2.5, 1.876),
            displacement: 3.127,
            bearing_degrees: 36.86989764584402,
            used_fallback: false,
            sequence_number: 7,
        }
    }

    #[test]
    fn test_location_line() {
        let text = TextFormatter::new().format_location(&update());
        assert_eq!(text, "X: 2.50, Y: 1.88, Moved: 3.13, Direction: 36.9°");
    }

    #[test]
    fn test_verbose_location_line() {
        let mut fallback = update();
        fallback.used_fallback = true;
        let text = TextFormatter::verbose().with_precision(1).format_location(&fallback);
        assert_eq!(text, "X: 2.5, Y: 1.9, Moved: 3.1, Direction: 36.9° (#7) [centroid]");
    }

    #[test]
    fn test_diagnostic_lines() {
        let diagnostics = vec![
            BeaconDiagnostic {
                identifier: "C3:00:00:19:2F:4B".to_string(),
                last_signal_strength: Some(-65.0),
                estimated_distance: Some(1.987654),
            },
            BeaconDiagnostic {
                identifier: "C3:00:00:19:2F:33".to_string(),
                last_signal_strength: Some(0.0),
                estimated_distance: None,
            },
            BeaconDiagnostic {
                identifier: "C3:00:00:19:2F:34".to_string(),
                last_signal_strength: None,
                estimated_distance: None,
            },
        ];

        let text = TextFormatter::new().format_diagnostics(&diagnostics);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Beacon: C3:00:00:19:2F:4B, RSSI: -65, Distance: 1.99");
        assert_eq!(lines[1], "Beacon: C3:00:00:19:2F:33, RSSI: 0, Distance: -1.00");
        assert_eq!(lines[2], "Beacon: C3:00:00:19:2F:34, RSSI: n/a, Distance: -1.00");
    }

    #[test]
    fn test_json_output() {
        let json = JsonFormatter::new().format_update(&update()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["sequence_number"], 7);
        assert_eq!(value["position"]["x"], 2.5);
        assert_eq!(value["used_fallback"], false);

        let pretty = JsonFormatter::pretty().format_update(&update()).unwrap();
        assert!(pretty.contains('\n'));
    }

    #[test]
    fn test_csv_output() {
        let formatter = CsvFormatter::new();
        let csv = formatter.format_all(&[update()]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], formatter.header());
        assert_eq!(lines[1], "7,2.500000,1.876000,3.127000,36.870,false");

        let rows_only = CsvFormatter { include_header: false }.format_all(&[update()]);
        assert_eq!(rows_only.lines().count(), 1);
    }
}
