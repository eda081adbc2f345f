use crate::error::CitationError;
use crate::models::RecordKind;

/// Describes a citation convention: one template per record kind.
#[derive(Debug, Clone)]
pub struct CitationStyle {
    pub name: &'static str,
    pub description: &'static str,
    pub templates: &'static [KindTemplate],
}

/// Template text bound to a [`RecordKind`] within a [`CitationStyle`].
#[derive(Debug, Clone)]
pub struct KindTemplate {
    pub kind: RecordKind,
    pub text: &'static str,
}

impl CitationStyle {
    /// Template registered for `kind`, if the style covers it.
    pub fn template(&self, kind: RecordKind) -> Option<&'static str> {
        self.templates
            .iter()
            .find(|tpl| tpl.kind == kind)
            .map(|tpl| tpl.text)
    }

    /// Placeholder names referenced by the template for `kind`, in order of appearance.
    pub fn placeholders(&self, kind: RecordKind) -> Vec<&'static str> {
        self.template(kind)
            .map(|text| {
                segments(text)
                    .into_iter()
                    .filter_map(|segment| match segment {
                        Segment::Placeholder(name) => Some(name),
                        Segment::Literal(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Registry of citation styles recognised by the formatter.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    styles: Vec<&'static CitationStyle>,
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StyleRegistry {
    /// Registry holding the built-in `gost` and `apa` styles.
    pub fn builtin() -> Self {
        Self {
            styles: vec![&GOST, &APA],
        }
    }

    /// Add a style, replacing any registered style with the same name.
    pub fn register(&mut self, style: &'static CitationStyle) {
        self.styles
            .retain(|existing| !existing.name.eq_ignore_ascii_case(style.name));
        self.styles.push(style);
    }

    /// Return the set of available styles.
    pub fn list(&self) -> &[&'static CitationStyle] {
        &self.styles
    }

    /// Resolve a style by name (case-insensitive).
    pub fn get(&self, name: &str) -> Result<&'static CitationStyle, CitationError> {
        self.styles
            .iter()
            .copied()
            .find(|style| style.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| CitationError::UnknownStyle(name.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// Split template text into literal runs and `$name` placeholders.
fn segments(template: &str) -> Vec<Segment<'_>> {
    let bytes = template.as_bytes();
    let mut out = Vec::new();
    let mut literal_start = 0;
    let mut idx = 0;
    while idx < bytes.len() {
        let starts_name = bytes[idx] == b'$'
            && bytes
                .get(idx + 1)
                .is_some_and(|b| b.is_ascii_alphabetic() || *b == b'_');
        if !starts_name {
            idx += 1;
            continue;
        }
        if literal_start < idx {
            out.push(Segment::Literal(&template[literal_start..idx]));
        }
        let name_start = idx + 1;
        let mut name_end = name_start;
        while name_end < bytes.len()
            && (bytes[name_end].is_ascii_alphanumeric() || bytes[name_end] == b'_')
        {
            name_end += 1;
        }
        out.push(Segment::Placeholder(&template[name_start..name_end]));
        idx = name_end;
        literal_start = idx;
    }
    if literal_start < bytes.len() {
        out.push(Segment::Literal(&template[literal_start..]));
    }
    out
}

/// Replace every `$name` in `template` with the value produced by `resolve`.
///
/// Runs a single pass; substituted values are never scanned again. Returns the
/// first placeholder `resolve` cannot answer.
pub(crate) fn substitute<'t, F, S>(template: &'t str, mut resolve: F) -> Result<String, &'t str>
where
    F: FnMut(&str) -> Option<S>,
    S: AsRef<str>,
{
    let mut out = String::with_capacity(template.len() * 2);
    for segment in segments(template) {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(name) => {
                let value = resolve(name).ok_or(name)?;
                out.push_str(value.as_ref());
            }
        }
    }
    Ok(out)
}

macro_rules! kind_tpl {
    ($kind:ident, $text:expr) => {
        KindTemplate {
            kind: RecordKind::$kind,
            text: $text,
        }
    };
}

static GOST_TEMPLATES: &[KindTemplate] = &[
    kind_tpl!(
        Book,
        "$authors $title. – $edition_display$city: $publishing_house, $year. – $pages с."
    ),
    kind_tpl!(
        InternetResource,
        "$article // $website URL: $link (дата обращения: $access_date)."
    ),
    kind_tpl!(
        ArticlesCollection,
        "$authors $article_title // $collection_title. – $city: $publishing_house, $year. – С. $pages."
    ),
    kind_tpl!(
        ArticlesNewspaper,
        "$authors ($publishing_year) $article_title // $newspaper_name. $newspaper_publishing_date."
    ),
    kind_tpl!(
        Dissertation,
        "$authors $article_title: дис. ... $phd_or_cand $branch_of_sciences: $specialty_code $publishing_city, $publishing_year. $pages с."
    ),
];

static APA_TEMPLATES: &[KindTemplate] = &[
    kind_tpl!(Book, "$authors ($year). $title."),
    kind_tpl!(InternetResource, "$website. (n.d.). $article. $link."),
    kind_tpl!(
        ArticlesCollection,
        "$authors ($year). $article_title in $collection_title (p. $pages)."
    ),
    kind_tpl!(
        ArticlesNewspaper,
        "$authors ($publishing_year, $newspaper_publishing_date.). $article_title. $newspaper_name. pp. $article_number A."
    ),
    kind_tpl!(
        Dissertation,
        "$authors ($publishing_year). $article_title [$phd_or_cand $branch_of_sciences наук]. $pages с."
    ),
];

/// ГОСТ Р 7.0.5-2008.
pub static GOST: CitationStyle = CitationStyle {
    name: "gost",
    description: "ГОСТ Р 7.0.5-2008 bibliographic reference.",
    templates: GOST_TEMPLATES,
};

/// American Psychological Association, 7th edition.
pub static APA: CitationStyle = CitationStyle {
    name: "apa",
    description: "APA 7th edition reference list entry.",
    templates: APA_TEMPLATES,
};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_adjacent_placeholders() {
        assert_eq!(
            segments("$edition_display$city: x"),
            vec![
                Segment::Placeholder("edition_display"),
                Segment::Placeholder("city"),
                Segment::Literal(": x"),
            ]
        );
    }

    #[test]
    fn lone_dollar_is_literal() {
        assert_eq!(
            segments("cost $5 $"),
            vec![Segment::Literal("cost $5 $")]
        );
    }

    #[test]
    fn substitution_is_single_pass() {
        let out = substitute("$a and $b", |name| match name {
            "a" => Some("$b"),
            "b" => Some("B"),
            _ => None,
        })
        .unwrap();
        assert_eq!(out, "$b and B");
    }

    #[test]
    fn substitution_reports_unresolved_name() {
        let err = substitute("$known $unknown.", |name| (name == "known").then_some("k"))
            .unwrap_err();
        assert_eq!(err, "unknown");
    }

    #[test]
    fn registry_lookup_is_case_insensitive() {
        let registry = StyleRegistry::builtin();
        assert_eq!(registry.get("GOST").unwrap().name, "gost");
        assert_eq!(registry.get("apa").unwrap().name, "apa");
        assert_eq!(
            registry.get("mla").unwrap_err(),
            CitationError::UnknownStyle("mla".to_string())
        );
    }

    #[test]
    fn builtin_styles_cover_every_kind() {
        for style in StyleRegistry::builtin().list() {
            for kind in RecordKind::ALL {
                assert!(style.template(kind).is_some(), "{} lacks {}", style.name, kind);
            }
        }
    }

    static CUSTOM: CitationStyle = CitationStyle {
        name: "gost",
        description: "override",
        templates: &[],
    };

    #[test]
    fn register_replaces_same_name() {
        let mut registry = StyleRegistry::builtin();
        registry.register(&CUSTOM);
        assert_eq!(registry.list().len(), 2);
        assert_eq!(registry.get("gost").unwrap().description, "override");
    }

    #[test]
    fn placeholders_follow_template_order() {
        assert_eq!(
            APA.placeholders(RecordKind::Book),
            vec!["authors", "year", "title"]
        );
    }
}
