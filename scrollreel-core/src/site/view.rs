use crate::site::{
    content::{Article, Catalog, Course, Publication},
    routes::{Route, SolutionTopic},
    search::PublicationFilter,
};

/// Sections under `/disclosure`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisclosureKind {
    /// Papers.
    Publications,
    /// Patents; none ship yet.
    Patents,
}

impl DisclosureKind {
    /// Section for a path segment.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "publications" => Some(Self::Publications),
            "patents" => Some(Self::Patents),
            _ => None,
        }
    }
}

/// What a route renders, with its content looked up.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "view", rename_all = "kebab-case")]
pub enum View<'a> {
    /// Landing page with the scrollytelling hero.
    Home,
    /// Company page.
    About,
    /// Topic index.
    Solutions {
        /// Every topic, in menu order.
        topics: Vec<SolutionTopic>,
    },
    /// One product page.
    Solution {
        /// Topic shown.
        topic: SolutionTopic,
    },
    /// Project showcase.
    Projects,
    /// Team page.
    Team,
    /// News listing.
    News {
        /// Newest first.
        articles: Vec<&'a Article>,
    },
    /// One article.
    NewsArticle {
        /// Article shown.
        article: &'a Article,
    },
    /// Course listing.
    Training {
        /// Courses in table order.
        courses: &'a [Course],
    },
    /// One course.
    Course {
        /// Course shown.
        course: &'a Course,
    },
    /// Publication listing with its year selector.
    Disclosure {
        /// Every year with a publication, newest first, ignoring the filter.
        years: Vec<u32>,
        /// Filtered publications, newest first.
        publications: Vec<&'a Publication>,
    },
    /// One disclosure section.
    DisclosureSection {
        /// Section shown.
        section: DisclosureKind,
        /// Filtered entries; always empty for patents.
        publications: Vec<&'a Publication>,
    },
    /// Contact page.
    GetInTouch,
    /// Standalone hero.
    HeroDemo,
    /// Unknown path, or a known path naming missing content.
    NotFound {
        /// Path without the base prefix.
        path: String,
    },
}

impl View<'_> {
    /// Whether this is [`View::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, View::NotFound { .. })
    }
}

/// Resolve `route` against `catalog`. Unknown keys become [`View::NotFound`]; never panics.
pub fn resolve<'a>(route: &Route, catalog: &'a Catalog) -> View<'a> {
    resolve_filtered(route, catalog, &PublicationFilter::default())
}

/// Like [`resolve`], with `filter` applied to publication listings.
pub fn resolve_filtered<'a>(
    route: &Route,
    catalog: &'a Catalog,
    filter: &PublicationFilter,
) -> View<'a> {
    let not_found = || View::NotFound {
        path: route.to_path(""),
    };
    match route {
        Route::Home => View::Home,
        Route::About => View::About,
        Route::Solutions => View::Solutions {
            topics: SolutionTopic::ALL.to_vec(),
        },
        Route::Solution { topic } => View::Solution { topic: *topic },
        Route::Projects => View::Projects,
        Route::Team => View::Team,
        Route::News => View::News {
            articles: catalog.articles_newest_first(),
        },
        Route::NewsArticle { slug } => match catalog.article(slug) {
            Some(article) => View::NewsArticle { article },
            None => not_found(),
        },
        Route::Training => View::Training {
            courses: catalog.courses(),
        },
        Route::Course { code } => match catalog.course(code) {
            Some(course) => View::Course { course },
            None => not_found(),
        },
        Route::Disclosure => View::Disclosure {
            years: crate::site::search::available_years(catalog.publications()),
            publications: filter.apply(catalog.publications()),
        },
        Route::DisclosureSection { section } => match DisclosureKind::from_slug(section) {
            Some(DisclosureKind::Publications) => View::DisclosureSection {
                section: DisclosureKind::Publications,
                publications: filter.apply(catalog.publications()),
            },
            Some(DisclosureKind::Patents) => View::DisclosureSection {
                section: DisclosureKind::Patents,
                publications: Vec::new(),
            },
            None => not_found(),
        },
        Route::GetInTouch => View::GetInTouch,
        Route::HeroDemo => View::HeroDemo,
        Route::NotFound { path } => View::NotFound { path: path.clone() },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/site/view.rs"]
mod tests;
