use crate::error::{Error, Result};
use polars::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Columns the analyses read. Everything else in the CSV is dropped on load.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "id",
    "title",
    "type",
    "release_year",
    "age_certification",
    "imdb_score",
    "production_countries",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Kind {
    Movie,
    Show,
}

impl Kind {
    pub const ALL: [Kind; 2] = [Kind::Movie, Kind::Show];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Movie => "MOVIE",
            Kind::Show => "SHOW",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MOVIE" => Ok(Kind::Movie),
            "SHOW" => Ok(Kind::Show),
            other => Err(other.to_string()),
        }
    }
}

/// One row of the catalog, owned.
#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    /// Position of the row in the CSV, before sorting.
    pub row: usize,
    pub id: String,
    pub title: String,
    pub kind: Kind,
    pub release_year: i32,
    pub age_certification: Option<String>,
    pub imdb_score: Option<f64>,
    pub production_countries: Vec<String>,
}

/// Borrowed view of one row of [`Titles`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitleRow<'a> {
    pub row: usize,
    pub id: &'a str,
    pub title: &'a str,
    pub kind: Kind,
    pub release_year: i32,
    pub age_certification: Option<&'a str>,
    pub imdb_score: Option<f64>,
    pub production_countries: &'a [String],
}

/// The catalog, stored column by column. All vectors have the same length
/// and rows are ordered by release year. Columns only grow through
/// [`Titles::push`], so they cannot drift apart outside this crate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Titles {
    pub(crate) row: Vec<usize>,
    pub(crate) id: Vec<String>,
    pub(crate) title: Vec<String>,
    pub(crate) kind: Vec<Kind>,
    pub(crate) release_year: Vec<i32>,
    pub(crate) age_certification: Vec<Option<String>>,
    pub(crate) imdb_score: Vec<Option<f64>>,
    pub(crate) production_countries: Vec<Vec<String>>,
}

impl Titles {
    /// Read the CSV at `path` and project it into columns.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let df = read_frame(path)?;
        let titles = Self::from_frame(&df)?;
        info!(
            path = %path.display(),
            titles = titles.len(),
            "loaded title catalog"
        );
        Ok(titles)
    }

    /// Build the columns from a frame shaped like [`read_frame`]'s output.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let row: Vec<usize> = df
            .column("row")?
            .i64()?
            .into_no_null_iter()
            .map(|r| r as usize)
            .collect();

        let id = required_str(df, "id", &row)?;
        let title = required_str(df, "title", &row)?;

        let kind = df
            .column("type")?
            .str()?
            .into_iter()
            .zip(&row)
            .map(|(value, &row)| {
                let value = value.ok_or(Error::MissingValue {
                    column: "type",
                    row,
                })?;
                value
                    .parse::<Kind>()
                    .map_err(|value| Error::UnknownKind { row, value })
            })
            .collect::<Result<Vec<_>>>()?;

        let release_year = df
            .column("release_year")?
            .i32()?
            .into_iter()
            .zip(&row)
            .map(|(year, &row)| {
                year.ok_or(Error::MissingValue {
                    column: "release_year",
                    row,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let age_certification = df
            .column("age_certification")?
            .str()?
            .into_iter()
            .map(|cert| {
                cert.map(str::trim)
                    .filter(|cert| !cert.is_empty())
                    .map(str::to_string)
            })
            .collect();

        let imdb_score = df
            .column("imdb_score")?
            .f64()?
            .into_iter()
            .map(|score| score.filter(|s| !s.is_nan()))
            .collect();

        let production_countries = df
            .column("production_countries")?
            .str()?
            .into_iter()
            .zip(&row)
            .map(|(value, &row)| match value {
                Some(value) => parse_country_list(value).ok_or_else(|| Error::CountryList {
                    row,
                    value: value.to_string(),
                }),
                None => Ok(Vec::new()),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Titles {
            row,
            id,
            title,
            kind,
            release_year,
            age_certification,
            imdb_score,
            production_countries,
        })
    }

    pub fn row(&self) -> &[usize] {
        &self.row
    }

    pub fn id(&self) -> &[String] {
        &self.id
    }

    pub fn title(&self) -> &[String] {
        &self.title
    }

    pub fn kind(&self) -> &[Kind] {
        &self.kind
    }

    pub fn release_year(&self) -> &[i32] {
        &self.release_year
    }

    pub fn age_certification(&self) -> &[Option<String>] {
        &self.age_certification
    }

    pub fn imdb_score(&self) -> &[Option<f64>] {
        &self.imdb_score
    }

    pub fn production_countries(&self) -> &[Vec<String>] {
        &self.production_countries
    }

    pub fn len(&self) -> usize {
        self.id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<TitleRow<'_>> {
        if i >= self.len() {
            return None;
        }
        Some(TitleRow {
            row: self.row[i],
            id: &self.id[i],
            title: &self.title[i],
            kind: self.kind[i],
            release_year: self.release_year[i],
            age_certification: self.age_certification[i].as_deref(),
            imdb_score: self.imdb_score[i],
            production_countries: &self.production_countries[i],
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = TitleRow<'_>> {
        (0..self.len()).filter_map(|i| self.get(i))
    }

    pub fn push(&mut self, t: Title) {
        self.row.push(t.row);
        self.id.push(t.id);
        self.title.push(t.title);
        self.kind.push(t.kind);
        self.release_year.push(t.release_year);
        self.age_certification.push(t.age_certification);
        self.imdb_score.push(t.imdb_score);
        self.production_countries.push(t.production_countries);
    }

    /// Copy out the rows matching `pred`, keeping their order.
    pub fn filter(&self, pred: impl Fn(&TitleRow<'_>) -> bool) -> Titles {
        self.rows().filter(|t| pred(t)).map(TitleRow::to_title).collect()
    }

    pub fn of_kind(&self, kind: Kind) -> Titles {
        let view = self.filter(|t| t.kind == kind);
        debug!(%kind, titles = view.len(), "split by type");
        view
    }
}

impl TitleRow<'_> {
    pub fn to_title(self) -> Title {
        Title {
            row: self.row,
            id: self.id.to_string(),
            title: self.title.to_string(),
            kind: self.kind,
            release_year: self.release_year,
            age_certification: self.age_certification.map(str::to_string),
            imdb_score: self.imdb_score,
            production_countries: self.production_countries.to_vec(),
        }
    }
}

impl FromIterator<Title> for Titles {
    fn from_iter<I: IntoIterator<Item = Title>>(iter: I) -> Self {
        let mut titles = Titles::default();
        for t in iter {
            titles.push(t);
        }
        titles
    }
}

/// Read the CSV, keep the required columns with pinned dtypes plus a `row`
/// column holding the original position, and sort by release year. The sort
/// is stable so titles of the same year keep their file order.
pub fn read_frame(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let names = df.get_column_names();
    if let Some(missing) = REQUIRED_COLUMNS
        .into_iter()
        .find(|c| !names.iter().any(|n| n.as_str() == *c))
    {
        return Err(Error::MissingColumn(missing));
    }

    let df = df
        .lazy()
        .with_row_index("row", None)
        .select([
            col("row").cast(DataType::Int64),
            col("id").cast(DataType::String),
            col("title").cast(DataType::String),
            col("type").cast(DataType::String),
            col("release_year").cast(DataType::Int32),
            col("age_certification").cast(DataType::String),
            col("imdb_score").cast(DataType::Float64),
            col("production_countries").cast(DataType::String),
        ])
        .sort(
            ["release_year"],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;

    debug!(rows = df.height(), "read catalog frame");
    Ok(df)
}

fn required_str(df: &DataFrame, column: &'static str, rows: &[usize]) -> Result<Vec<String>> {
    df.column(column)?
        .str()?
        .into_iter()
        .zip(rows)
        .map(|(value, &row)| {
            value
                .map(str::to_string)
                .ok_or(Error::MissingValue { column, row })
        })
        .collect()
}

static LIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    let item = r#"(?:'[^']*'|"[^"]*")"#;
    Regex::new(&format!(
        r"^\[\s*(?:{item}\s*(?:,\s*{item}\s*)*(?:,\s*)?)?\]$"
    ))
    .expect("country list pattern is valid")
});

static ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"'([^']*)'|"([^"]*)""#).expect("country item pattern is valid")
});

/// Parse a list literal such as `['US', 'GB']` into its items.
/// Returns `None` when the text is not a list of quoted strings.
pub fn parse_country_list(text: &str) -> Option<Vec<String>> {
    let text = text.trim();
    if !LIST_RE.is_match(text) {
        return None;
    }
    Some(
        ITEM_RE
            .captures_iter(text)
            .filter_map(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| m.as_str().to_string())
            .collect(),
    )
}
