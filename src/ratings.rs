use crate::data::Titles;
use serde::Serialize;
use std::collections::BTreeMap;

/// IMDB score statistics of the titles released in one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearRating {
    pub year: i32,
    pub count: usize,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
    /// Standard error of the mean. Undefined for a single score.
    pub sem: Option<f64>,
}

/// Round to `precision` decimals, halves going to the even digit.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let scale = 10f64.powi(precision as i32);
    (value * scale).round_ties_even() / scale
}

/// Per-year score statistics over the titles that have a score. Years where
/// no title has a score are skipped. `mean` and `sem` are rounded to
/// `precision` decimals.
pub fn ratings_per_year(titles: &Titles, precision: u32) -> Vec<YearRating> {
    let mut scores: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for (&year, score) in titles.release_year.iter().zip(&titles.imdb_score) {
        if let Some(score) = score {
            scores.entry(year).or_default().push(*score);
        }
    }

    scores
        .into_iter()
        .map(|(year, scores)| {
            let count = scores.len();
            let n = count as f64;
            let mean = scores.iter().sum::<f64>() / n;
            let sem = (count > 1).then(|| {
                let var = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1.0);
                round_to(var.sqrt() / n.sqrt(), precision)
            });
            YearRating {
                year,
                count,
                min: scores.iter().copied().fold(f64::INFINITY, f64::min),
                mean: round_to(mean, precision),
                max: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                sem,
            }
        })
        .collect()
}
