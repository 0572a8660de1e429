use crate::{
    foundation::error::{ReelError, ReelResult},
    site::content::Publication,
};

/// Free-text + year filter over the publication list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublicationFilter {
    /// Search text; blank matches everything.
    pub term: String,
    /// Publication year, or any year when `None`.
    pub year: Option<u32>,
}

impl PublicationFilter {
    /// Filter on `term` and `year`.
    pub fn new(term: impl Into<String>, year: Option<u32>) -> Self {
        Self {
            term: term.into(),
            year,
        }
    }

    /// Case-insensitive match on title, journal or any author, plus the year.
    pub fn matches(&self, p: &Publication) -> bool {
        if let Some(y) = self.year
            && p.year() != Some(y)
        {
            return false;
        }
        let term = self.term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        p.title.to_lowercase().contains(&term)
            || p.journal.to_lowercase().contains(&term)
            || p.authors.iter().any(|a| a.to_lowercase().contains(&term))
    }

    /// Matching publications, newest first.
    pub fn apply<'a>(&self, publications: &'a [Publication]) -> Vec<&'a Publication> {
        let mut out: Vec<&Publication> = publications.iter().filter(|p| self.matches(p)).collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        out
    }
}

/// Parse a year selector: `"all"` (or empty) means no year filter.
pub fn parse_year_filter(s: &str) -> ReelResult<Option<u32>> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    s.parse::<u32>()
        .map(Some)
        .map_err(|e| ReelError::validation(format!("year filter '{s}': {e}")))
}

/// Distinct publication years, newest first.
pub fn available_years(publications: &[Publication]) -> Vec<u32> {
    let mut years: Vec<u32> = publications.iter().filter_map(Publication::year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

#[cfg(test)]
#[path = "../../tests/unit/site/search.rs"]
mod tests;
