//! Landslide damage table analysis.
//!
//! Loads the fixed-schema damage CSV (rows = regions, columns = years,
//! values = damage area in hectares) and computes the aggregate views plus
//! a straight-line forecast. Chart rendering stays outside this crate.

use crate::{Error, Result};
use csv::ReaderBuilder;
use std::path::Path;

/// Damage areas by region and year
#[derive(Clone, Debug)]
pub struct DamageTable {
    regions: Vec<String>,
    /// Years in header order
    years: Vec<i32>,
    /// values[region_index][year_index]
    values: Vec<Vec<f64>>,
}

/// Per-region damage statistics for the volatility ranking
#[derive(Clone, Debug)]
pub struct RegionStats {
    pub region: String,
    pub mean: f64,
    pub std_dev: f64,
    pub max: f64,
}

impl DamageTable {
    /// Load the table from a CSV file
    ///
    /// The first column is the region name; the remaining headers carry the
    /// year as leading digits (suffixes such as a unit marker are ignored).
    /// Blank or unparsable cells count as zero damage.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read(path)?;
        let text = decode(&raw);
        Self::parse(&text)
    }

    fn parse(text: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        if headers.len() < 2 {
            return Err(Error::Damage(
                "expected a region column and at least one year column".into(),
            ));
        }

        let years = headers
            .iter()
            .skip(1)
            .map(parse_year)
            .collect::<Result<Vec<_>>>()?;

        let mut regions = Vec::new();
        let mut values = Vec::new();

        for result in reader.records() {
            let record = result?;
            let region = record.get(0).unwrap_or("").trim();
            if region.is_empty() {
                continue;
            }

            let mut row = Vec::with_capacity(years.len());
            for year_index in 0..years.len() {
                let cell = record.get(year_index + 1).unwrap_or("").trim();
                row.push(cell.parse::<f64>().unwrap_or(0.0));
            }

            regions.push(region.to_string());
            values.push(row);
        }

        if regions.is_empty() {
            return Err(Error::Damage("no data rows in damage table".into()));
        }

        tracing::debug!(
            "Loaded damage table: {} regions x {} years",
            regions.len(),
            years.len()
        );

        Ok(DamageTable {
            regions,
            years,
            values,
        })
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Total damage per year, year ascending
    pub fn yearly_totals(&self) -> Vec<(i32, f64)> {
        let mut totals: Vec<(i32, f64)> = self
            .years
            .iter()
            .enumerate()
            .map(|(year_index, &year)| {
                let total = self.values.iter().map(|row| row[year_index]).sum();
                (year, total)
            })
            .collect();
        totals.sort_by_key(|&(year, _)| year);
        totals
    }

    /// Cumulative damage per region, descending
    pub fn region_totals(&self) -> Vec<(String, f64)> {
        let mut totals: Vec<(String, f64)> = self
            .regions
            .iter()
            .zip(&self.values)
            .map(|(region, row)| (region.clone(), row.iter().sum()))
            .collect();
        totals.sort_by(|a, b| b.1.total_cmp(&a.1));
        totals
    }

    /// The `n` regions with the highest cumulative damage
    pub fn top_regions(&self, n: usize) -> Vec<(String, f64)> {
        let mut totals = self.region_totals();
        totals.truncate(n);
        totals
    }

    /// The `n` regions with the most volatile damage history
    ///
    /// Sample standard deviation; a single-year table reports zero.
    pub fn volatility(&self, n: usize) -> Vec<RegionStats> {
        let mut stats: Vec<RegionStats> = self
            .regions
            .iter()
            .zip(&self.values)
            .map(|(region, row)| {
                let count = row.len() as f64;
                let mean = row.iter().sum::<f64>() / count;
                let std_dev = if row.len() > 1 {
                    let variance =
                        row.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1.0);
                    variance.sqrt()
                } else {
                    0.0
                };
                let max = row.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
                RegionStats {
                    region: region.clone(),
                    mean,
                    std_dev,
                    max,
                }
            })
            .collect();
        stats.sort_by(|a, b| b.std_dev.total_cmp(&a.std_dev));
        stats.truncate(n);
        stats
    }

    /// Extrapolate yearly totals `n_years` past the last recorded year
    ///
    /// Straight least-squares line over the yearly totals, clamped at zero
    /// (damage areas cannot go negative).
    pub fn forecast(&self, n_years: usize) -> Result<Vec<(i32, f64)>> {
        let totals = self.yearly_totals();
        let points: Vec<(f64, f64)> = totals
            .iter()
            .map(|&(year, total)| (f64::from(year), total))
            .collect();
        let (slope, intercept) = linear_fit(&points)?;

        let last_year = totals.last().map(|&(year, _)| year).unwrap_or_default();
        Ok((1..=n_years as i32)
            .map(|offset| {
                let year = last_year + offset;
                let predicted = slope * f64::from(year) + intercept;
                (year, predicted.max(0.0))
            })
            .collect())
    }
}

/// Least-squares straight line through the points, as (slope, intercept)
pub fn linear_fit(points: &[(f64, f64)]) -> Result<(f64, f64)> {
    if points.len() < 2 {
        return Err(Error::Damage(
            "need at least two points to fit a line".into(),
        ));
    }

    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|p| p.0).sum();
    let sum_y: f64 = points.iter().map(|p| p.1).sum();
    let sum_xy: f64 = points.iter().map(|p| p.0 * p.1).sum();
    let sum_xx: f64 = points.iter().map(|p| p.0 * p.0).sum();

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return Err(Error::Damage("points share a single x value".into()));
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Ok((slope, intercept))
}

/// Decode CSV bytes, falling back to lossy decoding when strict UTF-8 fails
fn decode(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(text) => text.to_string(),
        Err(e) => {
            tracing::warn!("Damage CSV is not valid UTF-8 ({}), decoding lossily", e);
            String::from_utf8_lossy(raw).into_owned()
        }
    }
}

/// Parse the year from a column header such as `2010` or a suffixed variant
fn parse_year(header: &str) -> Result<i32> {
    let digits: String = header
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits
        .parse()
        .map_err(|_| Error::Damage(format!("year column '{header}' has no leading year")))
}
