use crate::data::{Kind, Titles};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindCount {
    pub kind: Kind,
    pub count: usize,
}

/// Titles released in one year. Every title counts, including those
/// without an IMDB score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct YearReleases {
    pub year: i32,
    pub total: usize,
    pub movies: usize,
    pub shows: usize,
}

/// Number of titles of each kind. Both kinds are always listed.
pub fn type_histogram(titles: &Titles) -> Vec<KindCount> {
    Kind::ALL
        .into_iter()
        .map(|kind| KindCount {
            kind,
            count: titles.kind.iter().filter(|k| **k == kind).count(),
        })
        .collect()
}

/// Titles released per year, overall and split by kind, oldest year first.
pub fn releases_per_year(titles: &Titles) -> Vec<YearReleases> {
    let mut per_year: BTreeMap<i32, YearReleases> = BTreeMap::new();

    for (&year, &kind) in titles.release_year.iter().zip(&titles.kind) {
        let entry = per_year.entry(year).or_insert_with(|| YearReleases {
            year,
            ..Default::default()
        });
        entry.total += 1;
        match kind {
            Kind::Movie => entry.movies += 1,
            Kind::Show => entry.shows += 1,
        }
    }
    per_year.into_values().collect()
}

#[cfg(test)]
mod test_releases {
    use super::*;
    use crate::data::test_data::title;
    use pretty_assertions::assert_eq;

    fn catalog() -> Titles {
        [
            title(Kind::Movie, 2018, Some(6.0), &[]),
            title(Kind::Show, 2018, None, &[]),
            title(Kind::Movie, 2019, None, &[]),
            title(Kind::Movie, 2019, Some(7.2), &[]),
            title(Kind::Show, 2021, Some(8.0), &[]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_type_histogram() {
        assert_eq!(
            type_histogram(&catalog()),
            vec![
                KindCount { kind: Kind::Movie, count: 3 },
                KindCount { kind: Kind::Show, count: 2 },
            ]
        );
    }

    #[test]
    fn test_type_histogram_lists_absent_kind() {
        let movies = catalog().of_kind(Kind::Movie);
        assert_eq!(type_histogram(&movies)[1], KindCount { kind: Kind::Show, count: 0 });
    }

    #[test]
    fn test_releases_per_year() {
        assert_eq!(
            releases_per_year(&catalog()),
            vec![
                YearReleases { year: 2018, total: 2, movies: 1, shows: 1 },
                YearReleases { year: 2019, total: 2, movies: 2, shows: 0 },
                YearReleases { year: 2021, total: 1, movies: 0, shows: 1 },
            ]
        );
    }
}
