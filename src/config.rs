//! Analysis settings, layered with figment: built-in defaults, then an
//! optional TOML file, then `FLIXSTAT_*` environment variables.

use crate::certifications::{MOVIE_CERTIFICATIONS, SHOW_CERTIFICATIONS};
use crate::data::Kind;
use crate::error::Result;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "flixstat.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Year of the age-certification breakdown.
    pub focus_year: i32,
    /// Decimals kept for mean scores and their standard error.
    pub score_precision: u32,
    /// Full country names mapped to the code they stand for.
    pub country_aliases: BTreeMap<String, String>,
    pub movie_certifications: Vec<String>,
    pub show_certifications: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            focus_year: 2019,
            score_precision: 2,
            country_aliases: [("Lebanon".to_string(), "LB".to_string())].into(),
            movie_certifications: MOVIE_CERTIFICATIONS.map(String::from).to_vec(),
            show_certifications: SHOW_CERTIFICATIONS.map(String::from).to_vec(),
        }
    }
}

impl AnalysisConfig {
    /// Build the provider chain. A missing TOML file is skipped.
    pub fn figment(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("FLIXSTAT_").ignore(&["log"]))
    }

    pub fn load(file: &Path) -> Result<Self> {
        Ok(Self::figment(file).extract()?)
    }

    pub fn certifications(&self, kind: Kind) -> &[String] {
        match kind {
            Kind::Movie => &self.movie_certifications,
            Kind::Show => &self.show_certifications,
        }
    }
}
