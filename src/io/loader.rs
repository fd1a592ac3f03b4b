use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::dsp::series::{SampleSeries, SeriesError};

/// Read a calibration pulse from a two-column `time,value` CSV file.
pub fn load_series<P: AsRef<Path>>(path: P) -> Result<SampleSeries, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(LoadError::Io)?;
    let series = read_series(BufReader::new(file))?;

    log::debug!(
        "loaded {} samples spanning {} from {}",
        series.len(),
        series.duration(),
        path.display()
    );
    Ok(series)
}

/// Parse `time,value` rows from any buffered reader.
///
/// Rows whose first two fields don't both parse as numbers (headers, blank
/// lines, comments) are skipped. Columns past the second are ignored. Times
/// are shifted so the first numeric row lands at zero.
pub fn read_series<R: BufRead>(reader: R) -> Result<SampleSeries, LoadError> {
    let mut points = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(LoadError::Io)?;
        match parse_row(&line) {
            Some(point) => points.push(point),
            None => log::trace!("skipping non-numeric row {}: {:?}", line_no + 1, line),
        }
    }

    SampleSeries::from_raw(points).map_err(LoadError::Series)
}

fn parse_row(line: &str) -> Option<(f64, f64)> {
    let mut fields = line.split(',').map(|f| f.trim().trim_matches('"'));
    let t = fields.next()?.parse::<f64>().ok()?;
    let v = fields.next()?.parse::<f64>().ok()?;
    Some((t, v))
}

/// Errors that can occur when loading a calibration file
#[derive(Debug)]
pub enum LoadError {
    /// The file couldn't be opened or read
    Io(std::io::Error),
    /// The numeric rows don't form a valid series
    Series(SeriesError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "Failed to read calibration data: {}", err),
            LoadError::Series(err) => write!(f, "Invalid calibration data: {}", err),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            LoadError::Series(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_header_and_normalizes_time() {
        let csv = "time (ms),voltage\n\
                   100.0,0.0\n\
                   100.5,1.25\n\
                   \n\
                   101.0,2.5,ignored\n\
                   # trailing comment\n\
                   102.0,0.0\n";

        let series = read_series(csv.as_bytes()).unwrap();
        assert_eq!(series.times(), &[0.0, 0.5, 1.0, 2.0]);
        assert_eq!(series.values(), &[0.0, 1.25, 2.5, 0.0]);
    }

    #[test]
    fn accepts_quoted_fields() {
        let series = read_series("\"0\",\"1.5\"\n\"2\",\"0\"\n".as_bytes()).unwrap();
        assert_eq!(series.values(), &[1.5, 0.0]);
    }

    #[test]
    fn rows_with_one_field_are_skipped() {
        let series = read_series("5\n0,0\n1,1\n".as_bytes()).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn no_numeric_rows_is_an_error() {
        let result = read_series("x,y\nfoo,bar\n".as_bytes());
        assert!(matches!(result, Err(LoadError::Series(SeriesError::Empty))));
    }

    #[test]
    fn out_of_order_rows_are_rejected() {
        let result = read_series("0,0\n2,1\n1,0\n".as_bytes());
        assert!(matches!(
            result,
            Err(LoadError::Series(SeriesError::NotIncreasing { index: 2, .. }))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_series("/nonexistent/pulsesim/valid-pulse.csv");
        assert!(matches!(result, Err(LoadError::Io(_))));
    }
}
