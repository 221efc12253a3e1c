use crate::certifications::{CertificationBreakdown, certification_breakdown};
use crate::clean::{apply_aliases, malformed_codes, with_countries};
use crate::config::AnalysisConfig;
use crate::data::{Kind, Titles};
use crate::error::Result;
use crate::ratings::{YearRating, ratings_per_year};
use crate::releases::{KindCount, YearReleases, releases_per_year, type_histogram};
use crate::table::render_table;
use crate::tally::{
    CountryCount, CountrySpread, country_spread, distinct_countries, productions_per_country,
    ranked,
};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindRatings {
    pub kind: Kind,
    pub years: Vec<YearRating>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindSpread {
    pub kind: Kind,
    pub spread: Vec<CountrySpread>,
}

/// What the country cleaning found and changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cleaning {
    /// Titles left out of the country analyses for listing no country.
    pub without_countries: usize,
    pub malformed: Vec<String>,
    pub replaced: usize,
    /// Malformed values no alias covered.
    pub remaining: Vec<String>,
    pub distinct_countries: usize,
}

/// Every result of the analysis, in pipeline order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub titles: usize,
    pub types: Vec<KindCount>,
    pub releases: Vec<YearReleases>,
    pub certifications: Vec<CertificationBreakdown>,
    pub ratings: Vec<KindRatings>,
    pub country_spread: Vec<CountrySpread>,
    pub country_spread_by_kind: Vec<KindSpread>,
    pub cleaning: Cleaning,
    pub productions: Vec<CountryCount>,
}

impl Report {
    pub fn build(titles: &Titles, config: &AnalysisConfig) -> Report {
        let types = type_histogram(titles);
        let releases = releases_per_year(titles);

        let views: Vec<(Kind, Titles)> = Kind::ALL
            .into_iter()
            .map(|kind| (kind, titles.of_kind(kind)))
            .collect();

        let certifications = views
            .iter()
            .map(|(kind, view)| {
                certification_breakdown(
                    view,
                    *kind,
                    config.focus_year,
                    config.certifications(*kind),
                )
            })
            .collect();

        let ratings = views
            .iter()
            .map(|(kind, view)| KindRatings {
                kind: *kind,
                years: ratings_per_year(view, config.score_precision),
            })
            .collect();

        let country_spread_all = country_spread(titles);
        let production = with_countries(titles);
        let country_spread_by_kind = Kind::ALL
            .into_iter()
            .map(|kind| KindSpread {
                kind,
                spread: country_spread(&production.of_kind(kind)),
            })
            .collect();

        let malformed = malformed_codes(&production);
        let (production, replaced) = apply_aliases(&production, &config.country_aliases);
        let remaining = malformed_codes(&production);
        let countries = distinct_countries(&production.production_countries);
        let p_per_c = productions_per_country(&production.production_countries, &countries);
        debug!(countries = countries.len(), "tallied productions per country");

        let cleaning = Cleaning {
            without_countries: titles.len() - production.len(),
            malformed: malformed.into_iter().collect(),
            replaced,
            remaining: remaining.into_iter().collect(),
            distinct_countries: countries.len(),
        };
        info!(
            replaced = cleaning.replaced,
            distinct_countries = cleaning.distinct_countries,
            "cleaned production countries"
        );

        Report {
            titles: titles.len(),
            types,
            releases,
            certifications,
            ratings,
            country_spread: country_spread_all,
            country_spread_by_kind,
            cleaning,
            productions: ranked(&p_per_c),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Plain-text rendition, one table per result.
    pub fn render_tables(&self) -> String {
        let mut out = String::new();

        section(&mut out, &format!("Titles by type ({} total)", self.titles));
        let rows: Vec<Vec<String>> = self
            .types
            .iter()
            .map(|t| vec![t.kind.to_string(), t.count.to_string()])
            .collect();
        out.push_str(&render_table(&["type", "count"], &rows));

        section(&mut out, "Shows and movies released over the years");
        let rows: Vec<Vec<String>> = self
            .releases
            .iter()
            .map(|r| {
                vec![
                    r.year.to_string(),
                    r.total.to_string(),
                    r.movies.to_string(),
                    r.shows.to_string(),
                ]
            })
            .collect();
        out.push_str(&render_table(&["year", "total", "movies", "shows"], &rows));

        for breakdown in &self.certifications {
            section(
                &mut out,
                &format!(
                    "{} in {} by age certification ({} unrated)",
                    plural(breakdown.kind),
                    breakdown.year,
                    breakdown.unrated
                ),
            );
            let rows: Vec<Vec<String>> = breakdown
                .counts
                .iter()
                .map(|c| vec![c.certification.clone(), c.count.to_string()])
                .collect();
            out.push_str(&render_table(&["certification", "count"], &rows));
        }

        for ratings in &self.ratings {
            section(
                &mut out,
                &format!("{} ratings across the years", plural(ratings.kind)),
            );
            let rows: Vec<Vec<String>> = ratings
                .years
                .iter()
                .map(|r| {
                    vec![
                        r.year.to_string(),
                        r.count.to_string(),
                        format!("{:.1}", r.min),
                        r.mean.to_string(),
                        r.sem.map_or_else(|| "-".to_string(), |s| s.to_string()),
                        format!("{:.1}", r.max),
                    ]
                })
                .collect();
            out.push_str(&render_table(
                &["year", "count", "min", "mean", "sem", "max"],
                &rows,
            ));
        }

        section(&mut out, "Number of production countries per entry");
        out.push_str(&spread_table(&self.country_spread));
        for by_kind in &self.country_spread_by_kind {
            section(
                &mut out,
                &format!(
                    "Number of production countries per {} (entries with at least one)",
                    by_kind.kind.as_str().to_lowercase()
                ),
            );
            out.push_str(&spread_table(&by_kind.spread));
        }

        section(&mut out, "Country cleaning");
        let cleaning = &self.cleaning;
        let rows = vec![
            vec![
                "entries without countries".to_string(),
                cleaning.without_countries.to_string(),
            ],
            vec!["malformed values".to_string(), cleaning.malformed.join(", ")],
            vec!["values replaced".to_string(), cleaning.replaced.to_string()],
            vec!["still malformed".to_string(), cleaning.remaining.join(", ")],
            vec![
                "distinct countries".to_string(),
                cleaning.distinct_countries.to_string(),
            ],
        ];
        out.push_str(&render_table(&["check", "value"], &rows));

        section(&mut out, "Number of productions per country");
        let rows: Vec<Vec<String>> = self
            .productions
            .iter()
            .map(|c| vec![c.country.clone(), c.n_productions.to_string()])
            .collect();
        out.push_str(&render_table(&["country", "n_productions"], &rows));
        out.push('\n');
        out
    }
}

fn section(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push_str("\n\n");
    }
    out.push_str(title);
    out.push('\n');
}

fn plural(kind: Kind) -> &'static str {
    match kind {
        Kind::Movie => "Movies",
        Kind::Show => "Shows",
    }
}

fn spread_table(spread: &[CountrySpread]) -> String {
    let rows: Vec<Vec<String>> = spread
        .iter()
        .map(|s| {
            vec![
                s.n_countries.to_string(),
                s.entries.to_string(),
                format!("{:.1}%", s.percent),
            ]
        })
        .collect();
    render_table(&["countries", "entries", "percent"], &rows)
}

#[cfg(test)]
mod test_report {
    use super::*;
    use crate::tally::CountrySpread;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "data/sample_titles.csv";

    fn sample_report() -> Result<Report> {
        let titles = Titles::load(SAMPLE)?;
        Ok(Report::build(&titles, &AnalysisConfig::default()))
    }

    #[test]
    fn test_type_and_release_counts() -> Result<()> {
        let report = sample_report()?;

        assert_eq!(report.titles, 13);
        assert_eq!(
            report.types,
            vec![
                KindCount { kind: Kind::Movie, count: 8 },
                KindCount { kind: Kind::Show, count: 5 },
            ]
        );
        let years: Vec<(i32, usize, usize, usize)> = report
            .releases
            .iter()
            .map(|r| (r.year, r.total, r.movies, r.shows))
            .collect();
        assert_eq!(
            years,
            vec![
                (1998, 1, 1, 0),
                (2017, 1, 1, 0),
                (2018, 2, 1, 1),
                (2019, 6, 3, 3),
                (2020, 3, 2, 1),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_certifications_for_focus_year() -> Result<()> {
        let report = sample_report()?;
        let [movies, shows] = report.certifications.as_slice() else {
            panic!("expected one breakdown per kind");
        };

        let counts = |b: &CertificationBreakdown| -> Vec<(String, usize)> {
            b.counts
                .iter()
                .map(|c| (c.certification.clone(), c.count))
                .collect()
        };
        assert_eq!(
            counts(movies),
            vec![
                ("G".to_string(), 0),
                ("PG".to_string(), 1),
                ("PG-13".to_string(), 0),
                ("R".to_string(), 1),
                ("NC-17".to_string(), 0),
            ]
        );
        assert_eq!(movies.unrated, 1);
        assert_eq!(shows.kind, Kind::Show);
        assert_eq!(shows.counts[0].count, 1);
        assert_eq!(shows.counts[5].certification, "TV-MA");
        assert_eq!(shows.counts[5].count, 2);
        Ok(())
    }

    #[test]
    fn test_ratings_by_kind() -> Result<()> {
        let report = sample_report()?;
        let movies = &report.ratings[0];
        let shows = &report.ratings[1];

        assert_eq!(movies.kind, Kind::Movie);
        let y2019 = movies.years.iter().find(|r| r.year == 2019);
        assert_eq!(
            y2019,
            Some(&YearRating {
                year: 2019,
                count: 3,
                min: 5.8,
                mean: 6.7,
                max: 7.4,
                sem: Some(0.47),
            })
        );
        // the 2020 movie without a score is not counted
        assert_eq!(movies.years.last().map(|r| (r.year, r.count)), Some((2020, 1)));

        let shows_2019 = shows.years.iter().find(|r| r.year == 2019);
        assert_eq!(shows_2019.map(|r| (r.count, r.mean, r.sem)), Some((2, 7.4, Some(0.8))));
        Ok(())
    }

    #[test]
    fn test_country_cleaning_and_tally() -> Result<()> {
        let report = sample_report()?;

        assert_eq!(
            report.cleaning,
            Cleaning {
                without_countries: 2,
                malformed: vec!["Lebanon".to_string()],
                replaced: 1,
                remaining: vec![],
                distinct_countries: 8,
            }
        );

        let ranked: Vec<(&str, u32)> = report
            .productions
            .iter()
            .map(|c| (c.country.as_str(), c.n_productions))
            .collect();
        assert_eq!(
            ranked,
            vec![
                ("US", 5),
                ("FR", 2),
                ("GB", 2),
                ("LB", 2),
                ("BE", 1),
                ("CA", 1),
                ("IN", 1),
                ("KR", 1),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_country_spread() -> Result<()> {
        let report = sample_report()?;
        let entries: Vec<(usize, usize)> = report
            .country_spread
            .iter()
            .map(|s| (s.n_countries, s.entries))
            .collect();
        assert_eq!(entries, vec![(0, 2), (1, 7), (2, 4)]);

        let shows = &report.country_spread_by_kind[1];
        assert_eq!(shows.kind, Kind::Show);
        assert_eq!(
            shows.spread,
            vec![
                CountrySpread { n_countries: 1, entries: 3, percent: 75.0 },
                CountrySpread { n_countries: 2, entries: 1, percent: 25.0 },
            ]
        );
        let movie_share: f64 = report.country_spread_by_kind[0]
            .spread
            .iter()
            .map(|s| s.percent)
            .sum();
        assert!((movie_share - 100.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_sections_are_separated() -> Result<()> {
        let text = sample_report()?.render_tables();
        assert!(text.contains("\n\nShows and movies released over the years\nyear"));
        assert!(text.ends_with('\n'));
        Ok(())
    }

    #[test]
    fn test_renders_text_and_json() -> Result<()> {
        let report = sample_report()?;

        let text = report.render_tables();
        assert!(text.starts_with("Titles by type (13 total)\n"));
        assert!(text.contains("Movies in 2019 by age certification (1 unrated)"));
        assert!(text.contains("Number of productions per country"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json()?)?;
        assert_eq!(json["types"][0]["kind"], "MOVIE");
        assert_eq!(json["productions"][0]["country"], "US");
        assert_eq!(json["cleaning"]["replaced"], 1);
        Ok(())
    }
}
