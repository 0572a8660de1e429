/// Product pages under `/solutions`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolutionTopic {
    /// Teleoperated driving.
    RemoteDriving,
    /// Road network digital twins.
    DigitalTwin,
    /// Multimodal traffic simulation.
    MultimodalSimulator,
    /// Traffic analysis tooling.
    TrafficAnalysisTools,
    /// Traffic data visualization.
    Visualization,
    /// VR road design review.
    VrRoadDesign,
}

impl SolutionTopic {
    /// Every topic, in menu order.
    pub const ALL: [Self; 6] = [
        Self::RemoteDriving,
        Self::DigitalTwin,
        Self::MultimodalSimulator,
        Self::TrafficAnalysisTools,
        Self::Visualization,
        Self::VrRoadDesign,
    ];

    /// Path segment of the topic.
    pub fn slug(self) -> &'static str {
        match self {
            Self::RemoteDriving => "remote-driving",
            Self::DigitalTwin => "digital-twin",
            Self::MultimodalSimulator => "multimodal-simulator",
            Self::TrafficAnalysisTools => "traffic-analysis-tools",
            Self::Visualization => "visualization",
            Self::VrRoadDesign => "vr-road-design",
        }
    }

    /// Inverse of `slug`.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.slug() == slug)
    }
}

/// A parsed site path.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "route", rename_all = "kebab-case")]
pub enum Route {
    /// `/`, the scrollytelling hero.
    Home,
    /// `/about`.
    About,
    /// `/solutions`, the topic index.
    Solutions,
    /// `/solutions/{topic}`.
    Solution {
        /// Known topic; unknown slugs parse as `NotFound`.
        topic: SolutionTopic,
    },
    /// `/projects`.
    Projects,
    /// `/team`.
    Team,
    /// `/news`.
    News,
    /// `/news/{slug}`.
    NewsArticle {
        /// Article slug, not yet looked up.
        slug: String,
    },
    /// `/training`.
    Training,
    /// `/training/{code}`.
    Course {
        /// Course code as written in the path.
        code: String,
    },
    /// `/disclosure`.
    Disclosure,
    /// `/disclosure/{section}`.
    DisclosureSection {
        /// Section slug, not yet checked.
        section: String,
    },
    /// `/get-in-touch`.
    GetInTouch,
    /// `/hero-demo`, the hero on its own.
    HeroDemo,
    /// Anything else.
    NotFound {
        /// The path it was parsed from.
        path: String,
    },
}

impl Route {
    /// Parse `path` as served under `base_path` (e.g. `/dochakWebsite`).
    ///
    /// Query strings, fragments and trailing slashes are ignored. Paths outside the base path are
    /// [`Route::NotFound`].
    pub fn parse(path: &str, base_path: &str) -> Self {
        let not_found = || Route::NotFound {
            path: path.to_string(),
        };

        let path_only = path.split(['?', '#']).next().unwrap_or_default();
        let base = base_path.trim_end_matches('/');
        let rest = if base.is_empty() {
            path_only
        } else {
            match path_only.strip_prefix(base) {
                Some(r) if r.is_empty() || r.starts_with('/') => r,
                _ => return not_found(),
            }
        };

        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["about"] => Route::About,
            ["solutions"] => Route::Solutions,
            ["solutions", topic] => match SolutionTopic::from_slug(topic) {
                Some(topic) => Route::Solution { topic },
                None => not_found(),
            },
            ["projects"] => Route::Projects,
            ["team"] => Route::Team,
            ["news"] => Route::News,
            ["news", slug] => Route::NewsArticle {
                slug: (*slug).to_string(),
            },
            ["training"] => Route::Training,
            ["training", code] => Route::Course {
                code: (*code).to_string(),
            },
            ["disclosure"] => Route::Disclosure,
            ["disclosure", section] => Route::DisclosureSection {
                section: (*section).to_string(),
            },
            ["get-in-touch"] => Route::GetInTouch,
            ["hero-demo"] => Route::HeroDemo,
            _ => not_found(),
        }
    }

    /// Site path of this route under `base_path`. `NotFound` returns the path it was parsed from.
    pub fn to_path(&self, base_path: &str) -> String {
        let tail = match self {
            Route::Home => String::new(),
            Route::About => "about".to_string(),
            Route::Solutions => "solutions".to_string(),
            Route::Solution { topic } => format!("solutions/{}", topic.slug()),
            Route::Projects => "projects".to_string(),
            Route::Team => "team".to_string(),
            Route::News => "news".to_string(),
            Route::NewsArticle { slug } => format!("news/{slug}"),
            Route::Training => "training".to_string(),
            Route::Course { code } => format!("training/{code}"),
            Route::Disclosure => "disclosure".to_string(),
            Route::DisclosureSection { section } => format!("disclosure/{section}"),
            Route::GetInTouch => "get-in-touch".to_string(),
            Route::HeroDemo => "hero-demo".to_string(),
            Route::NotFound { path } => return path.clone(),
        };
        format!("{}/{tail}", base_path.trim_end_matches('/'))
    }

    /// Whether this is [`Route::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Route::NotFound { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/site/routes.rs"]
mod tests;
