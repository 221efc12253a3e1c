use crate::data::{Kind, Titles};
use rustc_hash::FxHashMap as HashMap;
use serde::Serialize;

pub const MOVIE_CERTIFICATIONS: [&str; 5] = ["G", "PG", "PG-13", "R", "NC-17"];
pub const SHOW_CERTIFICATIONS: [&str; 6] = ["TV-Y", "TV-Y7", "TV-G", "TV-PG", "TV-14", "TV-MA"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificationCount {
    pub certification: String,
    pub count: usize,
}

/// Age certifications of one kind of title released in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificationBreakdown {
    pub kind: Kind,
    pub year: i32,
    pub counts: Vec<CertificationCount>,
    /// Titles of that kind and year without a certification.
    pub unrated: usize,
}

/// Count certifications of `kind` titles released in `year`. The entries of
/// `vocabulary` come first in its order, zero counts included; any other
/// certification follows alphabetically.
pub fn certification_breakdown(
    titles: &Titles,
    kind: Kind,
    year: i32,
    vocabulary: &[String],
) -> CertificationBreakdown {
    let mut seen: HashMap<&str, usize> = HashMap::default();
    let mut unrated = 0;

    for t in titles
        .rows()
        .filter(|t| t.kind == kind && t.release_year == year)
    {
        match t.age_certification {
            Some(cert) => *seen.entry(cert).or_default() += 1,
            None => unrated += 1,
        }
    }

    let mut counts: Vec<CertificationCount> = vocabulary
        .iter()
        .map(|cert| CertificationCount {
            certification: cert.clone(),
            count: seen.remove(cert.as_str()).unwrap_or(0),
        })
        .collect();

    let mut others: Vec<(&str, usize)> = seen.into_iter().collect();
    others.sort_unstable();
    counts.extend(others.into_iter().map(|(cert, count)| CertificationCount {
        certification: cert.to_string(),
        count,
    }));

    CertificationBreakdown {
        kind,
        year,
        counts,
        unrated,
    }
}

#[cfg(test)]
mod test_certifications {
    use super::*;
    use crate::data::Title;
    use crate::data::test_data::title;
    use pretty_assertions::assert_eq;

    fn rated(kind: Kind, year: i32, cert: Option<&str>) -> Title {
        Title {
            age_certification: cert.map(str::to_string),
            ..title(kind, year, None, &[])
        }
    }

    fn vocabulary(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn counts(breakdown: &CertificationBreakdown) -> Vec<(&str, usize)> {
        breakdown
            .counts
            .iter()
            .map(|c| (c.certification.as_str(), c.count))
            .collect()
    }

    #[test]
    fn test_movies_in_vocabulary_order() {
        let titles: Titles = [
            rated(Kind::Movie, 2019, Some("R")),
            rated(Kind::Movie, 2019, Some("PG-13")),
            rated(Kind::Movie, 2019, Some("R")),
            rated(Kind::Movie, 2019, None),
            rated(Kind::Movie, 2018, Some("G")),
            rated(Kind::Show, 2019, Some("TV-MA")),
        ]
        .into_iter()
        .collect();

        let breakdown =
            certification_breakdown(&titles, Kind::Movie, 2019, &vocabulary(&MOVIE_CERTIFICATIONS));

        assert_eq!(
            counts(&breakdown),
            vec![("G", 0), ("PG", 0), ("PG-13", 1), ("R", 2), ("NC-17", 0)]
        );
        assert_eq!(breakdown.unrated, 1);
        assert_eq!(breakdown.kind, Kind::Movie);
        assert_eq!(breakdown.year, 2019);
    }

    #[test]
    fn test_unknown_certifications_follow() {
        let titles: Titles = [
            rated(Kind::Show, 2019, Some("TV-MA")),
            rated(Kind::Show, 2019, Some("X")),
            rated(Kind::Show, 2019, Some("NR")),
        ]
        .into_iter()
        .collect();

        let breakdown =
            certification_breakdown(&titles, Kind::Show, 2019, &vocabulary(&["TV-14", "TV-MA"]));

        assert_eq!(
            counts(&breakdown),
            vec![("TV-14", 0), ("TV-MA", 1), ("NR", 1), ("X", 1)]
        );
        assert_eq!(breakdown.unrated, 0);
    }
}
