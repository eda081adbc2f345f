//! Rendering of records into citation strings.
//!
//! A [`CitationFormatter`] binds one record to one style template and
//! substitutes the record's fields into it. [`CitationListFormatter`] does the
//! same for a heterogeneous list and orders the result by rendered text.

use std::borrow::Cow;

use crate::error::CitationError;
use crate::models::{
    ArticlesCollection, ArticlesNewspaper, Book, Dissertation, InternetResource, Record,
    RecordKind,
};
use crate::templates::{CitationStyle, substitute};

/// Callback notified with the record kind and identifying field before formatting.
pub type FormatObserver<'a> = &'a dyn Fn(RecordKind, &str);

/// Capability of being rendered through a style template.
pub trait Citable {
    fn kind(&self) -> RecordKind;

    /// Field naming the source (title or article title).
    fn identifier(&self) -> &str;

    /// Display text for a template placeholder, including derived fields.
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl Citable for Book {
    fn kind(&self) -> RecordKind {
        RecordKind::Book
    }

    fn identifier(&self) -> &str {
        &self.title
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        Some(match name {
            "authors" => Cow::Borrowed(self.authors.as_str()),
            "title" => Cow::Borrowed(self.title.as_str()),
            "edition" => Cow::Borrowed(self.edition.as_deref().unwrap_or("")),
            "edition_display" => Cow::Owned(edition_display(self.edition.as_deref())),
            "city" => Cow::Borrowed(self.city.as_str()),
            "publishing_house" => Cow::Borrowed(self.publishing_house.as_str()),
            "year" => Cow::Owned(self.year.to_string()),
            "pages" => Cow::Owned(self.pages.to_string()),
            _ => return None,
        })
    }
}

impl Citable for InternetResource {
    fn kind(&self) -> RecordKind {
        RecordKind::InternetResource
    }

    fn identifier(&self) -> &str {
        &self.article
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "article" => &self.article,
            "website" => &self.website,
            "link" => &self.link,
            "access_date" => &self.access_date,
            _ => return None,
        };
        Some(Cow::Borrowed(value.as_str()))
    }
}

impl Citable for ArticlesCollection {
    fn kind(&self) -> RecordKind {
        RecordKind::ArticlesCollection
    }

    fn identifier(&self) -> &str {
        &self.article_title
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        Some(match name {
            "authors" => Cow::Borrowed(self.authors.as_str()),
            "article_title" => Cow::Borrowed(self.article_title.as_str()),
            "collection_title" => Cow::Borrowed(self.collection_title.as_str()),
            "city" => Cow::Borrowed(self.city.as_str()),
            "publishing_house" => Cow::Borrowed(self.publishing_house.as_str()),
            "year" => Cow::Owned(self.year.to_string()),
            "pages" => Cow::Borrowed(self.pages.as_str()),
            _ => return None,
        })
    }
}

impl Citable for Dissertation {
    fn kind(&self) -> RecordKind {
        RecordKind::Dissertation
    }

    fn identifier(&self) -> &str {
        &self.article_title
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        Some(match name {
            "authors" => Cow::Borrowed(self.authors.as_str()),
            "article_title" => Cow::Borrowed(self.article_title.as_str()),
            "phd_or_cand" => Cow::Borrowed(self.phd_or_cand.as_str()),
            "branch_of_sciences" => Cow::Borrowed(self.branch_of_sciences.as_str()),
            "specialty_code" => Cow::Borrowed(self.specialty_code.as_str()),
            "publishing_city" => Cow::Borrowed(self.publishing_city.as_str()),
            "publishing_year" => Cow::Owned(self.publishing_year.to_string()),
            "pages" => Cow::Borrowed(self.pages.as_str()),
            _ => return None,
        })
    }
}

impl Citable for ArticlesNewspaper {
    fn kind(&self) -> RecordKind {
        RecordKind::ArticlesNewspaper
    }

    fn identifier(&self) -> &str {
        &self.article_title
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        Some(match name {
            "authors" => Cow::Borrowed(self.authors.as_str()),
            "article_title" => Cow::Borrowed(self.article_title.as_str()),
            "newspaper_name" => Cow::Borrowed(self.newspaper_name.as_str()),
            "publishing_year" => Cow::Owned(self.publishing_year.to_string()),
            "newspaper_publishing_date" => {
                Cow::Borrowed(self.newspaper_publishing_date.as_str())
            }
            "article_number" => Cow::Owned(self.article_number.to_string()),
            _ => return None,
        })
    }
}

impl Citable for Record {
    fn kind(&self) -> RecordKind {
        Record::kind(self)
    }

    fn identifier(&self) -> &str {
        Record::identifier(self)
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match self {
            Record::Book(book) => book.field(name),
            Record::InternetResource(resource) => resource.field(name),
            Record::ArticlesCollection(article) => article.field(name),
            Record::Dissertation(dissertation) => dissertation.field(name),
            Record::ArticlesNewspaper(article) => article.field(name),
        }
    }
}

/// Edition text placed before the city: `"3-е изд. – "`, or nothing when absent.
pub fn edition_display(edition: Option<&str>) -> String {
    match edition.map(str::trim) {
        Some(edition) if !edition.is_empty() => format!("{edition} изд. – "),
        _ => String::new(),
    }
}

/// Default observer: emit a tracing event naming the record being formatted.
pub fn log_formatting(kind: RecordKind, identifier: &str) {
    tracing::info!(kind = %kind, "formatting \"{}\" ...", identifier);
}

/// One record bound to one style template.
pub struct CitationFormatter<'a, R: Citable + ?Sized = Record> {
    record: &'a R,
    style: &'a CitationStyle,
    template: &'static str,
}

impl<'a, R: Citable + ?Sized> CitationFormatter<'a, R> {
    /// Bind `record` to the template `style` registers for its kind.
    pub fn new(record: &'a R, style: &'a CitationStyle) -> Result<Self, CitationError> {
        let kind = record.kind();
        let template = style
            .template(kind)
            .ok_or_else(|| CitationError::UnsupportedKind {
                kind,
                style: style.name.to_string(),
                identifier: record.identifier().to_string(),
            })?;
        Ok(Self {
            record,
            style,
            template,
        })
    }

    /// Substitute record fields into the template.
    pub fn render(&self, observer: Option<FormatObserver<'_>>) -> Result<String, CitationError> {
        if let Some(notify) = observer {
            notify(self.record.kind(), self.record.identifier());
        }
        substitute(self.template, |name| self.record.field(name)).map_err(|field| {
            CitationError::MissingField {
                kind: self.record.kind(),
                style: self.style.name.to_string(),
                field: field.to_string(),
                identifier: self.record.identifier().to_string(),
            }
        })
    }
}

/// Format a single record under `style` without an observer.
pub fn render<R: Citable + ?Sized>(record: &R, style: &CitationStyle) -> Result<String, CitationError> {
    CitationFormatter::new(record, style)?.render(None)
}

/// Formats a list of records under one style, ordered by rendered text.
pub struct CitationListFormatter<'a> {
    style: &'a CitationStyle,
    observer: Option<FormatObserver<'a>>,
}

impl<'a> CitationListFormatter<'a> {
    pub fn new(style: &'a CitationStyle) -> Self {
        Self {
            style,
            observer: None,
        }
    }

    /// Attach a callback invoked before each record is formatted.
    pub fn with_observer(mut self, observer: FormatObserver<'a>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn style(&self) -> &'a CitationStyle {
        self.style
    }

    /// Render every record and sort the strings by code point; equal strings keep input order.
    pub fn format(&self, records: &[Record]) -> Result<Vec<String>, CitationError> {
        let mut rendered = Vec::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            let formatter = CitationFormatter::new(record, self.style).map_err(|err| match err {
                CitationError::UnsupportedKind {
                    kind,
                    style,
                    identifier,
                } => CitationError::UnknownRecordKind {
                    kind,
                    style,
                    position: position + 1,
                    identifier,
                },
                other => other,
            })?;
            rendered.push(formatter.render(self.observer)?);
        }
        rendered.sort();
        Ok(rendered)
    }
}

/// Citations of one style, ready for rendering.
#[derive(Debug, Clone)]
pub struct FormattedList {
    pub style: &'static CitationStyle,
    pub entries: Vec<String>,
}

/// Format `records` under every style in `styles`.
///
/// Either every style succeeds or the first error is returned and no list is produced.
pub fn format_all_styles(
    records: &[Record],
    styles: &[&'static CitationStyle],
    observer: Option<FormatObserver<'_>>,
) -> Result<Vec<FormattedList>, CitationError> {
    let mut lists = Vec::with_capacity(styles.len());
    for &style in styles {
        let mut formatter = CitationListFormatter::new(style);
        if let Some(observer) = observer {
            formatter = formatter.with_observer(observer);
        }
        tracing::debug!(style = style.name, records = records.len(), "formatting list");
        lists.push(FormattedList {
            style,
            entries: formatter.format(records)?,
        });
    }
    Ok(lists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{APA, GOST, KindTemplate};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    fn book() -> Book {
        Book {
            authors: "Иванов И.М.".into(),
            title: "Наука как искусство".into(),
            edition: Some("3-е".into()),
            city: "СПб.".into(),
            publishing_house: "Просвещение".into(),
            year: 2020,
            pages: 999,
        }
    }

    fn internet_resource() -> InternetResource {
        InternetResource {
            article: "Наука как искусство".into(),
            website: "Ведомости".into(),
            link: "https://www.vedomosti.ru".into(),
            access_date: "01.01.2021".into(),
        }
    }

    fn articles_collection() -> ArticlesCollection {
        ArticlesCollection {
            authors: "Иванов И.М.".into(),
            article_title: "Наука как искусство".into(),
            collection_title: "Сборник научных трудов".into(),
            city: "СПб.".into(),
            publishing_house: "АСТ".into(),
            year: 2020,
            pages: "25-30".into(),
        }
    }

    fn dissertation() -> Dissertation {
        Dissertation {
            authors: "Иванов И.М.".into(),
            article_title: "Наука как искусство".into(),
            phd_or_cand: "д-р. / канд.".into(),
            branch_of_sciences: "экон.".into(),
            specialty_code: "111".into(),
            publishing_city: "Пермь".into(),
            publishing_year: 2023,
            pages: "1".into(),
        }
    }

    fn newspaper() -> ArticlesNewspaper {
        ArticlesNewspaper {
            authors: "Иванов И.М.".into(),
            article_title: "Наука как искусство".into(),
            newspaper_name: "Новая Газета".into(),
            publishing_year: 2023,
            newspaper_publishing_date: "01.01".into(),
            article_number: 1,
        }
    }

    #[test]
    fn gost_book() {
        assert_eq!(
            render(&book(), &GOST).unwrap(),
            "Иванов И.М. Наука как искусство. – 3-е изд. – СПб.: Просвещение, 2020. – 999 с."
        );
    }

    #[test]
    fn gost_book_without_edition() {
        let mut book = book();
        book.edition = None;
        assert_eq!(
            render(&book, &GOST).unwrap(),
            "Иванов И.М. Наука как искусство. – СПб.: Просвещение, 2020. – 999 с."
        );
    }

    #[test]
    fn gost_internet_resource() {
        assert_eq!(
            render(&internet_resource(), &GOST).unwrap(),
            "Наука как искусство // Ведомости URL: https://www.vedomosti.ru (дата обращения: 01.01.2021)."
        );
    }

    #[test]
    fn gost_articles_collection() {
        assert_eq!(
            render(&articles_collection(), &GOST).unwrap(),
            "Иванов И.М. Наука как искусство // Сборник научных трудов. – СПб.: АСТ, 2020. – С. 25-30."
        );
    }

    #[test]
    fn gost_dissertation() {
        assert_eq!(
            render(&dissertation(), &GOST).unwrap(),
            "Иванов И.М. Наука как искусство: дис. ... д-р. / канд. экон.: 111 Пермь, 2023. 1 с."
        );
    }

    #[test]
    fn gost_newspaper() {
        assert_eq!(
            render(&newspaper(), &GOST).unwrap(),
            "Иванов И.М. (2023) Наука как искусство // Новая Газета. 01.01."
        );
    }

    #[test]
    fn apa_book() {
        assert_eq!(
            render(&book(), &APA).unwrap(),
            "Иванов И.М. (2020). Наука как искусство."
        );
    }

    #[test]
    fn apa_internet_resource() {
        assert_eq!(
            render(&internet_resource(), &APA).unwrap(),
            "Ведомости. (n.d.). Наука как искусство. https://www.vedomosti.ru."
        );
    }

    #[test]
    fn apa_articles_collection() {
        assert_eq!(
            render(&articles_collection(), &APA).unwrap(),
            "Иванов И.М. (2020). Наука как искусство in Сборник научных трудов (p. 25-30)."
        );
    }

    #[test]
    fn apa_dissertation() {
        assert_eq!(
            render(&dissertation(), &APA).unwrap(),
            "Иванов И.М. (2023). Наука как искусство [д-р. / канд. экон. наук]. 1 с."
        );
    }

    #[test]
    fn apa_newspaper() {
        assert_eq!(
            render(&newspaper(), &APA).unwrap(),
            "Иванов И.М. (2023, 01.01.). Наука как искусство. Новая Газета. pp. 1 A."
        );
    }

    #[test]
    fn formatting_is_deterministic() {
        let record = Record::from(book());
        let first = render(&record, &GOST).unwrap();
        let second = render(&record, &GOST).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn edition_display_is_style_independent() {
        assert_eq!(edition_display(Some("3-е")), "3-е изд. – ");
        assert_eq!(edition_display(Some("")), "");
        assert_eq!(edition_display(None), "");

        let mut empty = book();
        empty.edition = Some(String::new());
        assert_eq!(empty.field("edition_display").unwrap(), "");
        assert_eq!(book().field("edition_display").unwrap(), "3-е изд. – ");
    }

    #[test]
    fn mixed_kinds_sort_by_rendered_text() {
        let records = vec![
            Record::from(book()),
            Record::from(internet_resource()),
            Record::from(articles_collection()),
        ];
        let formatted = CitationListFormatter::new(&GOST).format(&records).unwrap();
        assert_eq!(
            formatted,
            vec![
                render(&articles_collection(), &GOST).unwrap(),
                render(&book(), &GOST).unwrap(),
                render(&internet_resource(), &GOST).unwrap(),
            ]
        );
    }

    #[test]
    fn sort_order_depends_on_style() {
        let records = vec![Record::from(book()), Record::from(internet_resource())];
        let gost = CitationListFormatter::new(&GOST).format(&records).unwrap();
        let apa = CitationListFormatter::new(&APA).format(&records).unwrap();
        assert!(gost[0].starts_with("Иванов"));
        assert!(apa[0].starts_with("Ведомости"));
    }

    #[test]
    fn output_is_sorted_and_keeps_duplicates() {
        let records = vec![
            Record::from(newspaper()),
            Record::from(book()),
            Record::from(newspaper()),
            Record::from(dissertation()),
        ];
        let formatted = CitationListFormatter::new(&APA).format(&records).unwrap();
        assert_eq!(formatted.len(), 4);
        assert!(formatted.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn empty_input_yields_empty_list() {
        let formatted = CitationListFormatter::new(&GOST).format(&[]).unwrap();
        assert!(formatted.is_empty());
    }

    #[test]
    fn observer_sees_identifying_field() {
        let seen = RefCell::new(Vec::new());
        let observer = |kind: RecordKind, identifier: &str| {
            seen.borrow_mut().push((kind, identifier.to_string()));
        };
        let records = vec![Record::from(internet_resource()), Record::from(dissertation())];
        CitationListFormatter::new(&GOST)
            .with_observer(&observer)
            .format(&records)
            .unwrap();
        assert_eq!(
            seen.into_inner(),
            vec![
                (RecordKind::InternetResource, "Наука как искусство".to_string()),
                (RecordKind::Dissertation, "Наука как искусство".to_string()),
            ]
        );
    }

    static BOOKS_ONLY: CitationStyle = CitationStyle {
        name: "books-only",
        description: "covers books with a broken placeholder",
        templates: &[KindTemplate {
            kind: RecordKind::Book,
            text: "$authors, $isbn.",
        }],
    };

    static BOOKS_BRIEF: CitationStyle = CitationStyle {
        name: "books-brief",
        description: "covers books only",
        templates: &[KindTemplate {
            kind: RecordKind::Book,
            text: "$authors.",
        }],
    };

    #[test]
    fn unresolved_placeholder_is_missing_field() {
        let err = render(&book(), &BOOKS_ONLY).unwrap_err();
        assert_eq!(
            err,
            CitationError::MissingField {
                kind: RecordKind::Book,
                style: "books-only".to_string(),
                field: "isbn".to_string(),
                identifier: "Наука как искусство".to_string(),
            }
        );
    }

    #[test]
    fn error_messages_name_the_record() {
        let mut book = book();
        book.title = "Уникальное Название".into();
        let missing = render(&book, &BOOKS_ONLY).unwrap_err();
        assert!(missing.to_string().contains("Уникальное Название"));

        let mut resource = internet_resource();
        resource.article = "Редкая статья".into();
        let unknown = CitationListFormatter::new(&BOOKS_BRIEF)
            .format(&[Record::from(resource)])
            .unwrap_err();
        assert_eq!(
            unknown.to_string(),
            "record #1 (internet_resource \"Редкая статья\") cannot be formatted with style 'books-brief'"
        );
    }

    #[test]
    fn uncovered_kind_is_unsupported() {
        let err = render(&newspaper(), &BOOKS_ONLY).unwrap_err();
        assert!(matches!(
            err,
            CitationError::UnsupportedKind { kind: RecordKind::ArticlesNewspaper, .. }
        ));
    }

    #[test]
    fn list_reports_position_of_unknown_kind() {
        let records = vec![Record::from(book()), Record::from(newspaper())];
        let err = CitationListFormatter::new(&BOOKS_BRIEF)
            .format(&records)
            .unwrap_err();
        assert_eq!(
            err,
            CitationError::UnknownRecordKind {
                kind: RecordKind::ArticlesNewspaper,
                style: "books-brief".to_string(),
                position: 2,
                identifier: "Наука как искусство".to_string(),
            }
        );
    }

    #[test]
    fn all_styles_fail_together() {
        let records = vec![Record::from(newspaper())];
        assert!(format_all_styles(&records, &[&GOST, &BOOKS_ONLY], None).is_err());

        let lists = format_all_styles(&records, &[&GOST, &APA], None).unwrap();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[1].style.name, "apa");
    }

    #[test]
    fn builtin_placeholders_all_resolve() {
        let samples = [
            Record::from(book()),
            Record::from(internet_resource()),
            Record::from(articles_collection()),
            Record::from(dissertation()),
            Record::from(newspaper()),
        ];
        for style in [&GOST, &APA] {
            for record in &samples {
                for name in style.placeholders(record.kind()) {
                    assert!(record.field(name).is_some(), "{} ${}", style.name, name);
                }
            }
        }
    }
}
