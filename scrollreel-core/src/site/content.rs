use std::collections::HashSet;

use crate::foundation::error::{ReelError, ReelResult};

/// Button at the end of an article.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CallToAction {
    /// Button label.
    pub text: String,
    /// Target URL or site path.
    pub link: String,
}

/// News article.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Article {
    /// URL key under `/news/`.
    pub slug: String,
    /// Headline.
    pub title: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Category label, e.g. `Award`.
    pub category: String,
    /// Byline.
    pub author: String,
    /// Teaser shown in the listing.
    pub summary: String,
    /// Full text.
    pub body: String,
    /// Cover image path; empty when there is none.
    #[serde(default)]
    pub hero_image: String,
    /// Gallery image paths.
    #[serde(default)]
    pub images: Vec<String>,
    /// Optional closing button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<CallToAction>,
    /// Embedded video, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

/// Paper listed on the disclosure page.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Publication {
    /// Unique key.
    pub id: String,
    /// Authors in citation order.
    pub authors: Vec<String>,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Paper title.
    pub title: String,
    /// Venue.
    pub journal: String,
    /// Venue kind, e.g. `journal` or `conference`.
    pub kind: String,
    /// Authors who belong to the team, highlighted in listings.
    #[serde(default)]
    pub team_members: Vec<String>,
}

impl Publication {
    /// Year prefix of `date`; `None` when it does not parse.
    pub fn year(&self) -> Option<u32> {
        self.date.get(..4)?.parse().ok()
    }
}

/// Training course.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Course {
    /// Course code, e.g. `VIS-101`.
    pub code: String,
    /// Course title.
    pub title: String,
    /// Audience level.
    pub level: String,
    /// Contact hours.
    pub duration_hours: u32,
    /// One-paragraph description.
    pub summary: String,
    /// Module titles in teaching order.
    #[serde(default)]
    pub modules: Vec<String>,
}

/// Read-only content tables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    articles: Vec<Article>,
    publications: Vec<Publication>,
    courses: Vec<Course>,
}

impl Catalog {
    /// Tables shipped with the crate.
    pub fn embedded() -> ReelResult<Self> {
        Self::from_json(
            include_str!("../../data/articles.json"),
            include_str!("../../data/publications.json"),
            include_str!("../../data/courses.json"),
        )
    }

    /// Parse the three tables. Keys must be non-empty and unique, ignoring ASCII case.
    pub fn from_json(articles: &str, publications: &str, courses: &str) -> ReelResult<Self> {
        let parse_err = |what: &str, e: serde_json::Error| {
            ReelError::serde(format!("parse {what} JSON: {e}"))
        };
        let catalog = Self {
            articles: serde_json::from_str(articles).map_err(|e| parse_err("articles", e))?,
            publications: serde_json::from_str(publications)
                .map_err(|e| parse_err("publications", e))?,
            courses: serde_json::from_str(courses).map_err(|e| parse_err("courses", e))?,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> ReelResult<()> {
        unique_keys("article slug", self.articles.iter().map(|a| a.slug.as_str()))?;
        unique_keys("publication id", self.publications.iter().map(|p| p.id.as_str()))?;
        unique_keys("course code", self.courses.iter().map(|c| c.code.as_str()))?;
        Ok(())
    }

    /// Articles in table order.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Articles by date, newest first.
    pub fn articles_newest_first(&self) -> Vec<&Article> {
        let mut out: Vec<&Article> = self.articles.iter().collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        out
    }

    /// Publications in table order.
    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    /// Courses in table order.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Article by exact slug.
    pub fn article(&self, slug: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.slug == slug)
    }

    /// Publication by exact id.
    pub fn publication(&self, id: &str) -> Option<&Publication> {
        self.publications.iter().find(|p| p.id == id)
    }

    /// Course codes match case-insensitively (`vis-101` finds `VIS-101`).
    pub fn course(&self, code: &str) -> Option<&Course> {
        self.courses
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }
}

fn unique_keys<'a>(what: &str, keys: impl Iterator<Item = &'a str>) -> ReelResult<()> {
    let mut seen = HashSet::new();
    for k in keys {
        if k.is_empty() {
            return Err(ReelError::validation(format!("empty {what}")));
        }
        if !seen.insert(k.to_ascii_lowercase()) {
            return Err(ReelError::validation(format!("duplicate {what} '{k}'")));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/site/content.rs"]
mod tests;
