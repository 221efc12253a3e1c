use crate::data::Titles;
use rustc_hash::FxHashMap as HashMap;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryCount {
    pub country: String,
    pub n_productions: u32,
}

/// How many entries list a given number of production countries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySpread {
    pub n_countries: usize,
    pub entries: usize,
    /// Share of the entries of the view, in percent.
    pub percent: f64,
}

/// Every country code appearing in any list.
pub fn distinct_countries<I>(lists: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<[String]>,
{
    let mut countries = BTreeSet::new();
    for list in lists {
        for country in list.as_ref() {
            if !countries.contains(country) {
                countries.insert(country.clone());
            }
        }
    }
    countries
}

/// Count productions per country. Each occurrence in a list counts once,
/// duplicates within a list included. Codes of `countries` start at zero;
/// codes outside it are added on first sight.
pub fn productions_per_country<I>(lists: I, countries: &BTreeSet<String>) -> HashMap<String, u32>
where
    I: IntoIterator,
    I::Item: AsRef<[String]>,
{
    let mut p_per_c: HashMap<String, u32> =
        countries.iter().map(|c| (c.clone(), 0)).collect();

    for list in lists {
        for country in list.as_ref() {
            if let Some(n) = p_per_c.get_mut(country) {
                *n += 1;
            } else {
                p_per_c.insert(country.clone(), 1);
            }
        }
    }
    p_per_c
}

/// Order a tally by count descending, then by code.
pub fn ranked(p_per_c: &HashMap<String, u32>) -> Vec<CountryCount> {
    let mut ranked: Vec<CountryCount> = p_per_c
        .iter()
        .map(|(country, &n_productions)| CountryCount {
            country: country.clone(),
            n_productions,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.n_productions
            .cmp(&a.n_productions)
            .then_with(|| a.country.cmp(&b.country))
    });
    ranked
}

/// Histogram of list lengths over `titles`, ascending by length.
pub fn country_spread(titles: &Titles) -> Vec<CountrySpread> {
    let mut by_len: HashMap<usize, usize> = HashMap::default();
    for list in &titles.production_countries {
        *by_len.entry(list.len()).or_default() += 1;
    }

    let total = titles.len();
    let mut spread: Vec<CountrySpread> = by_len
        .into_iter()
        .map(|(n_countries, entries)| CountrySpread {
            n_countries,
            entries,
            percent: entries as f64 * 100.0 / total as f64,
        })
        .collect();
    spread.sort_by_key(|s| s.n_countries);
    spread
}
