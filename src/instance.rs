//! Module for loading and representing TSP instances.
//!
//! Supports TSP-LIB `NODE_COORD_SECTION` files and plain CSV coordinate lists.
//! Coordinates are kept as `(y, x)` points; distances are planar Euclidean even
//! when the inputs are latitude/longitude pairs.

use crate::distance::{DistanceMatrix, Point};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A complete TSP instance: the points and their distance matrix.
#[derive(Debug, Clone, Serialize)]
pub struct TspInstance {
    /// Name of the instance
    pub name: String,
    /// Comment/description
    pub comment: String,
    /// Number of nodes
    pub dimension: usize,
    /// Node coordinates, indexed by node id
    pub points: Vec<Point>,
    /// Precomputed distance matrix
    #[serde(skip)]
    distances: DistanceMatrix,
}

impl TspInstance {
    /// Build an instance from in-memory points. Needs at least two finite points.
    pub fn from_points(name: &str, points: Vec<Point>) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::InvalidInputSize(points.len()));
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(Error::InvalidPoint { index });
        }

        let distances = DistanceMatrix::euclidean(&points);
        Ok(TspInstance {
            name: name.to_string(),
            comment: String::new(),
            dimension: points.len(),
            points,
            distances,
        })
    }

    /// Load an instance, picking the parser from the file extension
    /// (`.csv` for coordinate lists, anything else as TSP-LIB).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            Self::from_csv_file(path)
        } else {
            Self::from_tsplib_file(path)
        }
    }

    /// Parse a TSP-LIB file. Node lines are `id x y`; ids are 1-indexed.
    pub fn from_tsplib_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        let reader = BufReader::new(file);

        let mut name = String::new();
        let mut comment = String::new();
        let mut dimension = 0usize;
        let mut coords: Vec<(usize, Point)> = Vec::new();
        let mut in_coords = false;

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line == "EOF" {
                continue;
            }

            if let Some((key, value)) = line.split_once(':') {
                let value = value.trim();
                match key.trim() {
                    "NAME" => {
                        name = value.to_string();
                        continue;
                    }
                    "COMMENT" => {
                        comment = value.to_string();
                        continue;
                    }
                    "DIMENSION" => {
                        dimension = value
                            .parse()
                            .map_err(|_| Error::parse(format!("invalid dimension '{}'", value)))?;
                        continue;
                    }
                    "TYPE" | "EDGE_WEIGHT_TYPE" => continue,
                    _ => {}
                }
            }

            if line.starts_with("NODE_COORD_SECTION") {
                in_coords = true;
                continue;
            }
            if line.ends_with("_SECTION") {
                in_coords = false;
                continue;
            }

            if in_coords {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() < 3 {
                    return Err(Error::parse(format!(
                        "coordinate line '{}': expected 'id x y'",
                        line
                    )));
                }
                let id: usize = parts[0]
                    .parse()
                    .map_err(|_| Error::parse(format!("invalid node id '{}'", parts[0])))?;
                let x: f64 = parts[1]
                    .parse()
                    .map_err(|_| Error::parse(format!("invalid x coordinate '{}'", parts[1])))?;
                let y: f64 = parts[2]
                    .parse()
                    .map_err(|_| Error::parse(format!("invalid y coordinate '{}'", parts[2])))?;
                coords.push((id, Point::new(y, x)));
            }
        }

        if dimension != 0 && coords.len() != dimension {
            return Err(Error::parse(format!(
                "DIMENSION is {} but {} coordinates were read",
                dimension,
                coords.len()
            )));
        }

        coords.sort_by_key(|&(id, _)| id);
        for (k, &(id, _)) in coords.iter().enumerate() {
            if id != k + 1 {
                let problem = if k > 0 && coords[k - 1].0 == id {
                    "duplicate"
                } else {
                    "missing or out of range"
                };
                return Err(Error::parse(format!(
                    "node ids must be 1..={}: {} id near {}",
                    coords.len(),
                    problem,
                    id
                )));
            }
        }
        let points: Vec<Point> = coords.into_iter().map(|(_, p)| p).collect();

        if name.is_empty() {
            name = file_stem(path.as_ref());
        }

        let mut instance = Self::from_points(&name, points)?;
        instance.comment = comment;
        Ok(instance)
    }

    /// Parse a CSV file of `y,x` rows (for example `latitude,longitude`).
    /// A header row is skipped when its first field is not numeric.
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&path)?;

        let mut points = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() < 2 {
                return Err(Error::parse(format!(
                    "row {}: expected two columns, got {}",
                    row + 1,
                    record.len()
                )));
            }
            let y = record[0].parse::<f64>();
            let x = record[1].parse::<f64>();
            match (y, x) {
                (Ok(y), Ok(x)) => points.push(Point::new(y, x)),
                _ if row == 0 => continue,
                _ => {
                    return Err(Error::parse(format!(
                        "row {}: expected two numeric columns",
                        row + 1
                    )))
                }
            }
        }

        Self::from_points(&file_stem(path.as_ref()), points)
    }

    /// Distance matrix of the instance
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Get the distance between two nodes
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distances().get(i, j)
    }

    /// Calculate total closed tour length
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        self.distances().tour_length(tour)
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let mut sum = 0.0;
        let mut max_distance: f64 = 0.0;
        let mut pairs = 0usize;
        for i in 0..self.dimension {
            for j in i + 1..self.dimension {
                let d = self.distance(i, j);
                sum += d;
                max_distance = max_distance.max(d);
                pairs += 1;
            }
        }
        let avg_distance = if pairs > 0 { sum / pairs as f64 } else { 0.0 };

        let (min_y, max_y, min_x, max_x) = self.points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(min_y, max_y, min_x, max_x), p| {
                (min_y.min(p.y), max_y.max(p.y), min_x.min(p.x), max_x.max(p.x))
            },
        );

        InstanceStatistics {
            name: self.name.clone(),
            dimension: self.dimension,
            avg_distance,
            max_distance,
            min_y,
            max_y,
            min_x,
            max_x,
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Statistics about a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub avg_distance: f64,
    pub max_distance: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_x: f64,
    pub max_x: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Nodes: {}", self.dimension)?;
        writeln!(f, "  Avg distance: {:.4}", self.avg_distance)?;
        writeln!(f, "  Max distance: {:.4}", self.max_distance)?;
        writeln!(
            f,
            "  Bounds: y in [{:.4}, {:.4}], x in [{:.4}, {:.4}]",
            self.min_y, self.max_y, self.min_x, self.max_x
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("tsp-localsearch-{}-{}", std::process::id(), name));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_rejects_degenerate_inputs() {
        assert!(matches!(
            TspInstance::from_points("one", vec![Point::new(0.0, 0.0)]),
            Err(Error::InvalidInputSize(1))
        ));
        assert!(matches!(
            TspInstance::from_points("nan", vec![Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0)]),
            Err(Error::InvalidPoint { index: 1 })
        ));
    }

    #[test]
    fn test_parse_tsplib() {
        let path = write_temp(
            "square.tsp",
            "NAME: square\nCOMMENT: unit square\nTYPE: TSP\nDIMENSION: 4\nEDGE_WEIGHT_TYPE: EUC_2D\nNODE_COORD_SECTION\n1 0 0\n2 1 0\n3 1 1\n4 0 1\nEOF\n",
        );
        let instance = TspInstance::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(instance.name, "square");
        assert_eq!(instance.comment, "unit square");
        assert_eq!(instance.dimension, 4);
        assert_eq!(instance.points[1], Point::new(0.0, 1.0));
        assert!((instance.tour_length(&[0, 1, 2, 3]) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_csv_with_header() {
        let path = write_temp("stops.csv", "lat,lng\n0.0,0.0\n0.0,3.0\n4.0,3.0\n");
        let instance = TspInstance::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(instance.dimension, 3);
        assert_eq!(instance.points[2], Point::new(4.0, 3.0));
        assert!((instance.distance(0, 2) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_csv_bad_row_is_error() {
        let path = write_temp("bad.csv", "0.0,0.0\n1.0,abc\n");
        let result = TspInstance::from_file(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_csv_short_row_is_error() {
        let path = write_temp("short.csv", "0,0\n1\n2,2\n");
        let result = TspInstance::from_file(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    fn parse_tsplib(name: &str, body: &str) -> Result<TspInstance> {
        let path = write_temp(name, body);
        let result = TspInstance::from_file(&path);
        std::fs::remove_file(&path).ok();
        result
    }

    #[test]
    fn test_tsplib_short_line_is_error() {
        let result = parse_tsplib(
            "short.tsp",
            "NAME: short\nDIMENSION: 3\nNODE_COORD_SECTION\n1 0 0\n2 1\n3 2 2\nEOF\n",
        );
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_tsplib_duplicate_id_is_error() {
        let result = parse_tsplib(
            "dup.tsp",
            "NAME: dup\nDIMENSION: 3\nNODE_COORD_SECTION\n1 0 0\n2 1 0\n2 2 2\nEOF\n",
        );
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_tsplib_missing_id_is_error() {
        let result = parse_tsplib(
            "gap.tsp",
            "NAME: gap\nDIMENSION: 3\nNODE_COORD_SECTION\n1 0 0\n2 1 0\n4 2 2\nEOF\n",
        );
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_tsplib_dimension_mismatch_is_error() {
        let result = parse_tsplib(
            "mismatch.tsp",
            "NAME: mismatch\nDIMENSION: 4\nNODE_COORD_SECTION\n1 0 0\n2 1 0\n3 2 2\nEOF\n",
        );
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_statistics() {
        let instance = TspInstance::from_points(
            "line",
            vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0), Point::new(0.0, 3.0)],
        )
        .unwrap();
        let stats = instance.statistics();
        assert_eq!(stats.dimension, 3);
        assert!((stats.max_distance - 3.0).abs() < 1e-12);
        assert!((stats.avg_distance - 2.0).abs() < 1e-12);
        assert_eq!(stats.max_x, 3.0);
    }
}
