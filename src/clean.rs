//! Country-column cleaning.
//!
//! Some rows name a country in full ("Lebanon") instead of by its ISO-3166
//! alpha-2 code. [`malformed_codes`] finds such values and
//! [`apply_aliases`] rewrites them using a name-to-code table.

use crate::data::Titles;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

pub fn is_country_code(value: &str) -> bool {
    value.len() == 2 && value.bytes().all(|b| b.is_ascii_uppercase())
}

/// Distinct country values that are not two uppercase letters.
pub fn malformed_codes(titles: &Titles) -> BTreeSet<String> {
    let malformed: BTreeSet<String> = titles
        .production_countries
        .iter()
        .flatten()
        .filter(|c| !is_country_code(c))
        .cloned()
        .collect();
    if !malformed.is_empty() {
        warn!(?malformed, "production countries not in ISO alpha-2 form");
    }
    malformed
}

/// Replace every country value found in `aliases` with its code.
/// A rewritten code appears at most once in its list, so a title listing
/// both the name and the code is not counted twice for that country.
/// Returns the cleaned titles and how many values were replaced.
pub fn apply_aliases(titles: &Titles, aliases: &BTreeMap<String, String>) -> (Titles, usize) {
    let mut cleaned = titles.clone();
    let mut replaced = 0;

    for (i, list) in cleaned.production_countries.iter_mut().enumerate() {
        let mut rewritten: BTreeSet<String> = BTreeSet::new();
        for country in list.iter_mut() {
            if let Some(code) = aliases.get(country.as_str()) {
                info!(
                    row = cleaned.row[i],
                    id = %cleaned.id[i],
                    from = %country,
                    to = %code,
                    "corrected production country"
                );
                *country = code.clone();
                rewritten.insert(code.clone());
                replaced += 1;
            }
        }

        if !rewritten.is_empty() {
            let mut kept: BTreeSet<String> = BTreeSet::new();
            list.retain(|c| !rewritten.contains(c) || kept.insert(c.clone()));
        }
    }
    (cleaned, replaced)
}

/// Titles listing at least one production country. Entries with none are
/// left out of the country analyses.
pub fn with_countries(titles: &Titles) -> Titles {
    titles.filter(|t| !t.production_countries.is_empty())
}
