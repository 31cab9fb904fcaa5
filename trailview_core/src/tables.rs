//! Path and obstacle tables built from logged rows.
//!
//! Both logs are tables of comma-separated fields with a header row:
//!
//! ```text
//! path:      Latitude,Longitude,Heading
//! obstacles: Latitude,Longitude,Heading,Distance
//! ```
//!
//! Rows arrive already split into fields; reading and splitting the files is
//! the caller's job. The header (row 0) is always skipped. Rows that are too
//! short or carry non-numeric values are dropped and recorded in a
//! `LoadReport`; a dropped row never contributes a fabricated value.

use crate::error::{LoadError, RowIssue, RowIssueKind};
use crate::geo::{CoordinateConverter, GeoPoint, ReferenceOrigin};
use serde::Serialize;
use tracing::{debug, info, warn};
use trailview_env::LocalPoint;

/// A converted path fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Waypoint {
    pub position: LocalPoint,

    /// Logged heading in degrees, stored as recorded
    pub heading: f64,
}

/// A converted obstacle observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleMarker {
    pub position: LocalPoint,

    /// Logged heading in degrees, stored as recorded
    pub heading: f64,

    /// Measured range to the obstacle in centimetres, when the log has one
    pub range_cm: Option<f64>,

    revealed: bool,
}

impl ObstacleMarker {
    pub fn new(position: LocalPoint, heading: f64) -> Self {
        Self {
            position,
            heading,
            range_cm: None,
            revealed: false,
        }
    }

    pub fn with_range(mut self, range_cm: f64) -> Self {
        self.range_cm = Some(range_cm);
        self
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Flips the reveal flag. Returns false if it was already set.
    pub(crate) fn mark_revealed(&mut self) -> bool {
        !std::mem::replace(&mut self.revealed, true)
    }
}

/// Outcome of a table load.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    /// Rows that made it into the table
    pub accepted: usize,

    /// Rows that were dropped, in input order
    pub issues: Vec<RowIssue>,
}

impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.issues.len()
    }

    fn reject(&mut self, table: &str, issue: RowIssue) {
        warn!("{} log: skipping {}", table, issue);
        self.issues.push(issue);
    }
}

// ============================================================================
// ROW PARSING
// ============================================================================

struct ParsedRow {
    point: GeoPoint,
    heading: f64,
}

// Trailing newlines show up as a single empty field
fn is_blank<S: AsRef<str>>(fields: &[S]) -> bool {
    fields.iter().all(|f| f.as_ref().trim().is_empty())
}

fn check_width<S: AsRef<str>>(row: usize, fields: &[S], min_fields: usize) -> Result<(), RowIssue> {
    if fields.len() < min_fields {
        return Err(RowIssue {
            row,
            kind: RowIssueKind::MalformedRow {
                found: fields.len(),
                required: min_fields,
            },
        });
    }
    Ok(())
}

fn parse_field<S: AsRef<str>>(row: usize, fields: &[S], column: usize) -> Result<f64, RowIssue> {
    let raw = fields.get(column).map(|f| f.as_ref().trim()).unwrap_or_default();
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(RowIssue {
            row,
            kind: RowIssueKind::UnparsableField {
                column,
                value: raw.to_string(),
            },
        }),
    }
}

fn parse_row<S: AsRef<str>>(row: usize, fields: &[S]) -> Result<ParsedRow, RowIssue> {
    let latitude = parse_field(row, fields, 0)?;
    let longitude = parse_field(row, fields, 1)?;
    let heading = parse_field(row, fields, 2)?;

    Ok(ParsedRow {
        point: GeoPoint::new(latitude, longitude),
        heading,
    })
}

fn convert_row(row: usize, converter: &CoordinateConverter, point: &GeoPoint) -> Result<LocalPoint, RowIssue> {
    converter.convert(point).map_err(|e| RowIssue {
        row,
        kind: RowIssueKind::Conversion(e),
    })
}

// ============================================================================
// PATH TABLE
// ============================================================================

/// The ordered waypoints of a recorded run, plus the origin they were
/// converted against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathTable {
    waypoints: Vec<Waypoint>,
    origin: Option<ReferenceOrigin>,
    report: LoadReport,
}

impl PathTable {
    /// Builds the table from logged rows.
    ///
    /// The first row that parses becomes the reference origin and converts to
    /// (0, 0). A header-only log yields an empty table and no origin.
    pub fn load<R, S>(rows: &[R], min_fields: usize, scale: f64) -> Self
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut waypoints = Vec::new();
        let mut converter: Option<CoordinateConverter> = None;
        let mut report = LoadReport::default();

        for (row, fields) in rows.iter().enumerate().skip(1) {
            let fields = fields.as_ref();
            if is_blank(fields) {
                continue;
            }

            let parsed = match check_width(row, fields, min_fields).and_then(|_| parse_row(row, fields)) {
                Ok(parsed) => parsed,
                Err(issue) => {
                    report.reject("path", issue);
                    continue;
                }
            };

            let conv = match converter {
                Some(conv) => conv,
                None => match ReferenceOrigin::new(parsed.point) {
                    Ok(origin) => {
                        debug!(
                            "Reference origin set at row {}: lat={}, lon={}",
                            row, parsed.point.latitude, parsed.point.longitude
                        );
                        *converter.insert(CoordinateConverter::new(origin, scale))
                    }
                    Err(e) => {
                        report.reject("path", RowIssue { row, kind: RowIssueKind::Conversion(e) });
                        continue;
                    }
                },
            };

            match convert_row(row, &conv, &parsed.point) {
                Ok(position) => {
                    waypoints.push(Waypoint {
                        position,
                        heading: parsed.heading,
                    });
                    report.accepted += 1;
                }
                Err(issue) => report.reject("path", issue),
            }
        }

        info!(
            "Loaded path table: {} waypoints, {} rows skipped",
            waypoints.len(),
            report.skipped()
        );

        Self {
            waypoints,
            origin: converter.map(|c| c.origin()),
            report,
        }
    }

    /// Builds a table from already converted waypoints.
    pub fn from_waypoints(origin: Option<ReferenceOrigin>, waypoints: Vec<Waypoint>) -> Self {
        let report = LoadReport {
            accepted: waypoints.len(),
            issues: Vec::new(),
        };
        Self {
            waypoints,
            origin,
            report,
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// The origin established by this load, if any row was valid.
    pub fn origin(&self) -> Option<ReferenceOrigin> {
        self.origin
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}

// ============================================================================
// OBSTACLE TABLE
// ============================================================================

/// The ordered obstacle markers of a recorded run.
///
/// Reveal flags live inside each marker. Only the proximity revealer flips
/// them, and only from false to true.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleTable {
    markers: Vec<ObstacleMarker>,
    report: LoadReport,
}

impl ObstacleTable {
    /// Builds the table from logged rows, converting against the origin
    /// established by the path load.
    ///
    /// Fails with `LoadError::MissingOrigin` as soon as a row wide enough to
    /// be converted is found and `origin` is `None`. A header-only log loads
    /// as an empty table either way.
    pub fn load<R, S>(
        rows: &[R],
        min_fields: usize,
        origin: Option<ReferenceOrigin>,
        scale: f64,
    ) -> Result<Self, LoadError>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let converter = origin.map(|o| CoordinateConverter::new(o, scale));
        let mut markers = Vec::new();
        let mut report = LoadReport::default();

        for (row, fields) in rows.iter().enumerate().skip(1) {
            let fields = fields.as_ref();
            if is_blank(fields) {
                continue;
            }

            if let Err(issue) = check_width(row, fields, min_fields) {
                report.reject("obstacle", issue);
                continue;
            }

            let conv = converter.as_ref().ok_or(LoadError::MissingOrigin)?;

            let parsed = match parse_row(row, fields) {
                Ok(parsed) => parsed,
                Err(issue) => {
                    report.reject("obstacle", issue);
                    continue;
                }
            };

            match convert_row(row, conv, &parsed.point) {
                Ok(position) => {
                    // Range is informational; a bad value never drops the row
                    let range_cm = fields
                        .get(3)
                        .and_then(|f| f.as_ref().trim().parse::<f64>().ok())
                        .filter(|r| r.is_finite());

                    markers.push(ObstacleMarker {
                        position,
                        heading: parsed.heading,
                        range_cm,
                        revealed: false,
                    });
                    report.accepted += 1;
                }
                Err(issue) => report.reject("obstacle", issue),
            }
        }

        info!(
            "Loaded obstacle table: {} markers, {} rows skipped",
            markers.len(),
            report.skipped()
        );

        Ok(Self { markers, report })
    }

    /// Builds a table from already converted markers.
    pub fn from_markers(markers: Vec<ObstacleMarker>) -> Self {
        let report = LoadReport {
            accepted: markers.len(),
            issues: Vec::new(),
        };
        Self { markers, report }
    }

    pub fn markers(&self) -> &[ObstacleMarker] {
        &self.markers
    }

    pub(crate) fn markers_mut(&mut self) -> &mut [ObstacleMarker] {
        &mut self.markers
    }

    pub fn get(&self, index: usize) -> Option<&ObstacleMarker> {
        self.markers.get(index)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Indices of revealed markers, ascending.
    pub fn revealed_indices(&self) -> Vec<usize> {
        self.markers
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_revealed())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn revealed_count(&self) -> usize {
        self.markers.iter().filter(|m| m.is_revealed()).count()
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rows(text: &str) -> Vec<Vec<String>> {
        text.split('\n')
            .map(|line| line.trim().split(',').map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_reference_scenario() {
        let path = PathTable::load(&rows("header\n10.0,20.0,0\n10.0,20.001,90\n"), 3, 1e5);

        assert_eq!(path.len(), 2);
        assert_eq!(path.origin().unwrap().point(), GeoPoint::new(10.0, 20.0));
        assert_eq!(path.waypoints()[0].position, LocalPoint::origin());

        let second = path.waypoints()[1];
        assert_relative_eq!(second.position.x, 100.0, epsilon = 1e-6);
        assert_eq!(second.position.y, 0.0);
        assert_eq!(second.heading, 90.0);

        // Trailing newline is not a skipped row
        assert_eq!(path.report().skipped(), 0);
    }

    #[test]
    fn test_header_only_path() {
        let path = PathTable::load(&rows("Latitude,Longitude,Heading"), 3, 1e5);
        assert!(path.is_empty());
        assert!(path.origin().is_none());
    }

    #[test]
    fn test_header_never_included() {
        // A numeric header still gets skipped
        let path = PathTable::load(&rows("1.0,2.0,3.0\n10.0,20.0,0"), 3, 1e5);
        assert_eq!(path.len(), 1);
        assert_eq!(path.origin().unwrap().point(), GeoPoint::new(10.0, 20.0));
    }

    #[test]
    fn test_short_rows_skipped() {
        let path = PathTable::load(&rows("h\n10.0,20.0\n10.0,20.0,0\n10.0,20.001"), 3, 1e5);

        assert_eq!(path.len(), 1);
        assert_eq!(path.report().skipped(), 2);
        assert_eq!(
            path.report().issues[0],
            RowIssue {
                row: 1,
                kind: RowIssueKind::MalformedRow { found: 2, required: 3 },
            }
        );
    }

    #[test]
    fn test_unparsable_row_dropped_and_origin_from_first_valid() {
        let path = PathTable::load(&rows("h\nabc,20.0,0\n10.0,20.0,NaN\n10.5,20.5,45"), 3, 1e5);

        assert_eq!(path.len(), 1);
        assert_eq!(path.origin().unwrap().point(), GeoPoint::new(10.5, 20.5));
        assert_eq!(path.waypoints()[0].position, LocalPoint::origin());
        assert_eq!(path.waypoints()[0].heading, 45.0);

        let kinds: Vec<_> = path.report().issues.iter().map(|i| i.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                RowIssueKind::UnparsableField { column: 0, value: "abc".to_string() },
                RowIssueKind::UnparsableField { column: 2, value: "NaN".to_string() },
            ]
        );
    }

    #[test]
    fn test_fields_trimmed() {
        let table = vec![
            vec!["lat", "lon", "heading"],
            vec![" 10.0 ", "\t20.0", " 15 "],
        ];
        let path = PathTable::load(&table, 3, 1e5);
        assert_eq!(path.len(), 1);
        assert_eq!(path.waypoints()[0].heading, 15.0);
    }

    #[test]
    fn test_obstacles_reuse_path_origin() {
        let path = PathTable::load(&rows("h\n10.0,20.0,0\n10.0,20.001,90"), 3, 1e5);
        let obstacles = ObstacleTable::load(
            &rows("h\n10.0,20.001,30,150\n10.001,20.0,-45,80"),
            4,
            path.origin(),
            1e5,
        )
        .unwrap();

        assert_eq!(obstacles.len(), 2);
        // Same axis mapping as the path: obstacle 0 sits on waypoint 1
        assert_eq!(obstacles.markers()[0].position, path.waypoints()[1].position);
        assert_eq!(obstacles.markers()[0].heading, 30.0);
        assert_eq!(obstacles.markers()[0].range_cm, Some(150.0));

        assert_eq!(obstacles.markers()[1].position.x, 0.0);
        assert_relative_eq!(obstacles.markers()[1].position.y, 100.0, epsilon = 1e-6);
        assert!(!obstacles.markers()[1].is_revealed());
    }

    #[test]
    fn test_obstacle_rows_need_four_fields() {
        let path = PathTable::load(&rows("h\n10.0,20.0,0"), 3, 1e5);
        let obstacles =
            ObstacleTable::load(&rows("h\n10.0,20.0,0\n10.0,20.0,0,12"), 4, path.origin(), 1e5).unwrap();

        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles.report().skipped(), 1);
    }

    #[test]
    fn test_obstacle_range_is_lenient() {
        let path = PathTable::load(&rows("h\n10.0,20.0,0"), 3, 1e5);
        let obstacles =
            ObstacleTable::load(&rows("h\n10.0,20.0,0,far"), 4, path.origin(), 1e5).unwrap();

        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles.markers()[0].range_cm, None);
    }

    #[test]
    fn test_missing_origin_is_hard_failure() {
        let path = PathTable::load(&rows("h"), 3, 1e5);
        let err = ObstacleTable::load(&rows("h\n10.0,20.0,0,12"), 4, path.origin(), 1e5).unwrap_err();
        assert!(matches!(err, LoadError::MissingOrigin));
    }

    #[test]
    fn test_header_only_obstacles_without_origin() {
        let obstacles = ObstacleTable::load(&rows("h\n"), 4, None, 1e5).unwrap();
        assert!(obstacles.is_empty());
    }

    #[test]
    fn test_mark_revealed_once() {
        let mut marker = ObstacleMarker::new(LocalPoint::origin(), 0.0);
        assert!(marker.mark_revealed());
        assert!(!marker.mark_revealed());
        assert!(marker.is_revealed());
    }
}
