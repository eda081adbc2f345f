use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CitationError;

/// Identity of a bibliographic source kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Book,
    InternetResource,
    ArticlesCollection,
    ArticlesNewspaper,
    Dissertation,
}

impl RecordKind {
    /// Every kind, in the order sheets are read from an input workbook.
    pub const ALL: [RecordKind; 5] = [
        RecordKind::Book,
        RecordKind::InternetResource,
        RecordKind::ArticlesCollection,
        RecordKind::ArticlesNewspaper,
        RecordKind::Dissertation,
    ];

    /// Machine name used for sheet files and the JSONL `kind` tag.
    pub fn slug(self) -> &'static str {
        match self {
            RecordKind::Book => "book",
            RecordKind::InternetResource => "internet_resource",
            RecordKind::ArticlesCollection => "articles_collection",
            RecordKind::ArticlesNewspaper => "articles_newspaper",
            RecordKind::Dissertation => "dissertation",
        }
    }

    /// Sheet label of the source workbook.
    pub fn sheet_label(self) -> &'static str {
        match self {
            RecordKind::Book => "Книга",
            RecordKind::InternetResource => "Интернет-ресурс",
            RecordKind::ArticlesCollection => "Статья из сборника",
            RecordKind::ArticlesNewspaper => "Статья из газеты",
            RecordKind::Dissertation => "Диссертация",
        }
    }

    /// Input columns, in sheet order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            RecordKind::Book => &[
                "authors",
                "title",
                "edition",
                "city",
                "publishing_house",
                "year",
                "pages",
            ],
            RecordKind::InternetResource => &["article", "website", "link", "access_date"],
            RecordKind::ArticlesCollection => &[
                "authors",
                "article_title",
                "collection_title",
                "city",
                "publishing_house",
                "year",
                "pages",
            ],
            RecordKind::ArticlesNewspaper => &[
                "authors",
                "article_title",
                "newspaper_name",
                "publishing_year",
                "newspaper_publishing_date",
                "article_number",
            ],
            RecordKind::Dissertation => &[
                "authors",
                "article_title",
                "phd_or_cand",
                "branch_of_sciences",
                "specialty_code",
                "publishing_city",
                "publishing_year",
                "pages",
            ],
        }
    }

    /// Resolve a kind from its slug.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Book, e.g. `Иванов И.М. Наука как искусство. – 3-е изд. – СПб.: Просвещение, 2020. – 999 с.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub authors: String,
    pub title: String,
    pub edition: Option<String>,
    pub city: String,
    pub publishing_house: String,
    pub year: u32,
    pub pages: u32,
}

/// Web page or online article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternetResource {
    pub article: String,
    pub website: String,
    pub link: String,
    pub access_date: String,
}

/// Article published in a collection of papers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlesCollection {
    pub authors: String,
    pub article_title: String,
    pub collection_title: String,
    pub city: String,
    pub publishing_house: String,
    pub year: u32,
    /// Page range such as `25-30`.
    pub pages: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dissertation {
    pub authors: String,
    pub article_title: String,
    /// Degree, e.g. `д-р.` or `канд.`
    pub phd_or_cand: String,
    pub branch_of_sciences: String,
    pub specialty_code: String,
    pub publishing_city: String,
    pub publishing_year: u32,
    pub pages: String,
}

/// Newspaper article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlesNewspaper {
    pub authors: String,
    pub article_title: String,
    pub newspaper_name: String,
    pub publishing_year: u32,
    /// Day and month of the issue, e.g. `01.10`.
    pub newspaper_publishing_date: String,
    pub article_number: u32,
}

/// A validated source of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Book(Book),
    InternetResource(InternetResource),
    ArticlesCollection(ArticlesCollection),
    Dissertation(Dissertation),
    ArticlesNewspaper(ArticlesNewspaper),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Book(_) => RecordKind::Book,
            Record::InternetResource(_) => RecordKind::InternetResource,
            Record::ArticlesCollection(_) => RecordKind::ArticlesCollection,
            Record::Dissertation(_) => RecordKind::Dissertation,
            Record::ArticlesNewspaper(_) => RecordKind::ArticlesNewspaper,
        }
    }

    /// Title-like field that names the source in diagnostics.
    pub fn identifier(&self) -> &str {
        match self {
            Record::Book(book) => &book.title,
            Record::InternetResource(resource) => &resource.article,
            Record::ArticlesCollection(article) => &article.article_title,
            Record::Dissertation(dissertation) => &dissertation.article_title,
            Record::ArticlesNewspaper(article) => &article.article_title,
        }
    }

    /// Validate the wrapped record.
    pub fn validate(&self) -> Result<(), CitationError> {
        match self {
            Record::Book(book) => book.validate(),
            Record::InternetResource(resource) => resource.validate(),
            Record::ArticlesCollection(article) => article.validate(),
            Record::Dissertation(dissertation) => dissertation.validate(),
            Record::ArticlesNewspaper(article) => article.validate(),
        }
    }

    /// Build and validate a record of `kind` from a tabular row.
    pub fn from_row(kind: RecordKind, row: &Row) -> Result<Self, CitationError> {
        Ok(match kind {
            RecordKind::Book => Record::Book(Book::from_row(row)?),
            RecordKind::InternetResource => {
                Record::InternetResource(InternetResource::from_row(row)?)
            }
            RecordKind::ArticlesCollection => {
                Record::ArticlesCollection(ArticlesCollection::from_row(row)?)
            }
            RecordKind::Dissertation => Record::Dissertation(Dissertation::from_row(row)?),
            RecordKind::ArticlesNewspaper => {
                Record::ArticlesNewspaper(ArticlesNewspaper::from_row(row)?)
            }
        })
    }
}

impl From<Book> for Record {
    fn from(value: Book) -> Self {
        Record::Book(value)
    }
}

impl From<InternetResource> for Record {
    fn from(value: InternetResource) -> Self {
        Record::InternetResource(value)
    }
}

impl From<ArticlesCollection> for Record {
    fn from(value: ArticlesCollection) -> Self {
        Record::ArticlesCollection(value)
    }
}

impl From<Dissertation> for Record {
    fn from(value: Dissertation) -> Self {
        Record::Dissertation(value)
    }
}

impl From<ArticlesNewspaper> for Record {
    fn from(value: ArticlesNewspaper) -> Self {
        Record::ArticlesNewspaper(value)
    }
}

impl Book {
    pub fn validate(&self) -> Result<(), CitationError> {
        let kind = RecordKind::Book;
        require_text(kind, "authors", &self.authors)?;
        require_text(kind, "title", &self.title)?;
        require_text(kind, "city", &self.city)?;
        require_text(kind, "publishing_house", &self.publishing_house)?;
        require_positive(kind, "year", self.year)?;
        require_positive(kind, "pages", self.pages)
    }

    pub fn from_row(row: &Row) -> Result<Self, CitationError> {
        let kind = RecordKind::Book;
        let book = Self {
            authors: row.text(kind, "authors")?,
            title: row.text(kind, "title")?,
            edition: row.optional_text("edition"),
            city: row.text(kind, "city")?,
            publishing_house: row.text(kind, "publishing_house")?,
            year: row.positive(kind, "year")?,
            pages: row.positive(kind, "pages")?,
        };
        book.validate()?;
        Ok(book)
    }
}

impl InternetResource {
    pub fn validate(&self) -> Result<(), CitationError> {
        let kind = RecordKind::InternetResource;
        require_text(kind, "article", &self.article)?;
        require_text(kind, "website", &self.website)?;
        require_text(kind, "link", &self.link)?;
        require_text(kind, "access_date", &self.access_date)
    }

    pub fn from_row(row: &Row) -> Result<Self, CitationError> {
        let kind = RecordKind::InternetResource;
        let resource = Self {
            article: row.text(kind, "article")?,
            website: row.text(kind, "website")?,
            link: row.text(kind, "link")?,
            access_date: normalize_date(&row.text(kind, "access_date")?),
        };
        resource.validate()?;
        Ok(resource)
    }
}

impl ArticlesCollection {
    pub fn validate(&self) -> Result<(), CitationError> {
        let kind = RecordKind::ArticlesCollection;
        require_text(kind, "authors", &self.authors)?;
        require_text(kind, "article_title", &self.article_title)?;
        require_text(kind, "collection_title", &self.collection_title)?;
        require_text(kind, "city", &self.city)?;
        require_text(kind, "publishing_house", &self.publishing_house)?;
        require_positive(kind, "year", self.year)?;
        require_text(kind, "pages", &self.pages)
    }

    pub fn from_row(row: &Row) -> Result<Self, CitationError> {
        let kind = RecordKind::ArticlesCollection;
        let article = Self {
            authors: row.text(kind, "authors")?,
            article_title: row.text(kind, "article_title")?,
            collection_title: row.text(kind, "collection_title")?,
            city: row.text(kind, "city")?,
            publishing_house: row.text(kind, "publishing_house")?,
            year: row.positive(kind, "year")?,
            pages: row.text(kind, "pages")?,
        };
        article.validate()?;
        Ok(article)
    }
}

impl Dissertation {
    pub fn validate(&self) -> Result<(), CitationError> {
        let kind = RecordKind::Dissertation;
        require_text(kind, "authors", &self.authors)?;
        require_text(kind, "article_title", &self.article_title)?;
        require_text(kind, "phd_or_cand", &self.phd_or_cand)?;
        require_text(kind, "branch_of_sciences", &self.branch_of_sciences)?;
        require_text(kind, "specialty_code", &self.specialty_code)?;
        require_text(kind, "publishing_city", &self.publishing_city)?;
        require_positive(kind, "publishing_year", self.publishing_year)?;
        require_text(kind, "pages", &self.pages)
    }

    pub fn from_row(row: &Row) -> Result<Self, CitationError> {
        let kind = RecordKind::Dissertation;
        let dissertation = Self {
            authors: row.text(kind, "authors")?,
            article_title: row.text(kind, "article_title")?,
            phd_or_cand: row.text(kind, "phd_or_cand")?,
            branch_of_sciences: row.text(kind, "branch_of_sciences")?,
            specialty_code: row.text(kind, "specialty_code")?,
            publishing_city: row.text(kind, "publishing_city")?,
            publishing_year: row.positive(kind, "publishing_year")?,
            pages: row.text(kind, "pages")?,
        };
        dissertation.validate()?;
        Ok(dissertation)
    }
}

impl ArticlesNewspaper {
    pub fn validate(&self) -> Result<(), CitationError> {
        let kind = RecordKind::ArticlesNewspaper;
        require_text(kind, "authors", &self.authors)?;
        require_text(kind, "article_title", &self.article_title)?;
        require_text(kind, "newspaper_name", &self.newspaper_name)?;
        require_positive(kind, "publishing_year", self.publishing_year)?;
        require_text(
            kind,
            "newspaper_publishing_date",
            &self.newspaper_publishing_date,
        )?;
        require_positive(kind, "article_number", self.article_number)
    }

    pub fn from_row(row: &Row) -> Result<Self, CitationError> {
        let kind = RecordKind::ArticlesNewspaper;
        let article = Self {
            authors: row.text(kind, "authors")?,
            article_title: row.text(kind, "article_title")?,
            newspaper_name: row.text(kind, "newspaper_name")?,
            publishing_year: row.positive(kind, "publishing_year")?,
            newspaper_publishing_date: row.text(kind, "newspaper_publishing_date")?,
            article_number: row.positive(kind, "article_number")?,
        };
        article.validate()?;
        Ok(article)
    }
}

/// One input row: column name to raw cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: BTreeMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a cell as given; whitespace-only cells are treated as absent.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, column: K, value: V) {
        let value = value.into();
        if value.trim().is_empty() {
            return;
        }
        self.cells.insert(column.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    fn text(&self, kind: RecordKind, field: &'static str) -> Result<String, CitationError> {
        self.get(field)
            .map(str::to_string)
            .ok_or_else(|| CitationError::validation(kind, field, "is missing"))
    }

    fn optional_text(&self, field: &str) -> Option<String> {
        self.get(field).map(str::to_string)
    }

    fn positive(&self, kind: RecordKind, field: &'static str) -> Result<u32, CitationError> {
        let raw = self
            .get(field)
            .ok_or_else(|| CitationError::validation(kind, field, "is missing"))?;
        let value: i64 = raw.trim().parse().map_err(|_| {
            CitationError::validation(kind, field, format!("'{raw}' is not an integer"))
        })?;
        if value <= 0 {
            return Err(CitationError::validation(
                kind,
                field,
                format!("must be a positive integer (got {value})"),
            ));
        }
        u32::try_from(value)
            .map_err(|_| CitationError::validation(kind, field, format!("{value} is out of range")))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

fn require_text(kind: RecordKind, field: &'static str, value: &str) -> Result<(), CitationError> {
    if value.trim().is_empty() {
        return Err(CitationError::validation(kind, field, "must not be empty"));
    }
    Ok(())
}

fn require_positive(kind: RecordKind, field: &'static str, value: u32) -> Result<(), CitationError> {
    if value == 0 {
        return Err(CitationError::validation(
            kind,
            field,
            "must be a positive integer (got 0)",
        ));
    }
    Ok(())
}

/// Rewrite ISO dates (`2021-01-01`) as `01.01.2021`; anything else is kept verbatim.
fn normalize_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%d.%m.%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}
