//! Case-insensitive substring filtering for admin and directory listings.

/// A trimmed, lowercased search term. Blank input matches everything.
#[derive(Debug, Clone, Default)]
pub struct SearchTerm(Option<String>);

impl SearchTerm {
    pub fn new(raw: Option<&str>) -> Self {
        let term = raw
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);
        Self(term)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// True when any of the given fields contains the term.
    pub fn matches<'a, I>(&self, fields: I) -> bool
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let Some(term) = &self.0 else {
            return true;
        };
        fields
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(term.as_str()))
    }
}

/// Implemented by rows that can be narrowed by a [`SearchTerm`].
pub trait Searchable {
    fn search_fields(&self) -> Vec<Option<&str>>;
}

pub fn filter_by_term<T: Searchable>(rows: Vec<T>, term: &SearchTerm) -> Vec<T> {
    if term.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|row| term.matches(row.search_fields()))
        .collect()
}
