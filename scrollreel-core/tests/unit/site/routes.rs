use super::*;

const BASE: &str = "/dochakWebsite";

#[test]
fn parses_static_pages_under_base_path() {
    assert_eq!(Route::parse("/dochakWebsite", BASE), Route::Home);
    assert_eq!(Route::parse("/dochakWebsite/", BASE), Route::Home);
    assert_eq!(Route::parse("/dochakWebsite/about", BASE), Route::About);
    assert_eq!(Route::parse("/dochakWebsite/team/", BASE), Route::Team);
    assert_eq!(Route::parse("/dochakWebsite/get-in-touch", BASE), Route::GetInTouch);
    assert_eq!(Route::parse("/dochakWebsite/hero-demo", BASE), Route::HeroDemo);
}

#[test]
fn parses_parameterised_routes() {
    assert_eq!(
        Route::parse("/dochakWebsite/solutions/digital-twin/", BASE),
        Route::Solution {
            topic: SolutionTopic::DigitalTwin
        }
    );
    assert_eq!(
        Route::parse("/dochakWebsite/news/molit-award-2025?ref=home", BASE),
        Route::NewsArticle {
            slug: "molit-award-2025".to_string()
        }
    );
    assert_eq!(
        Route::parse("/dochakWebsite/training/VIS-101#modules", BASE),
        Route::Course {
            code: "VIS-101".to_string()
        }
    );
    assert_eq!(
        Route::parse("/dochakWebsite/disclosure/patents", BASE),
        Route::DisclosureSection {
            section: "patents".to_string()
        }
    );
}

#[test]
fn unknown_topic_and_deep_paths_are_not_found() {
    assert!(Route::parse("/dochakWebsite/solutions/teleportation", BASE).is_not_found());
    assert!(Route::parse("/dochakWebsite/news/a/b", BASE).is_not_found());
    assert!(Route::parse("/dochakWebsite/careers", BASE).is_not_found());
}

#[test]
fn paths_outside_base_are_not_found() {
    assert_eq!(
        Route::parse("/about", BASE),
        Route::NotFound {
            path: "/about".to_string()
        }
    );
    assert!(Route::parse("/dochakWebsiteX/about", BASE).is_not_found());
    assert_eq!(Route::parse("/about", ""), Route::About);
}

#[test]
fn to_path_round_trips_through_parse() {
    let routes = [
        Route::Home,
        Route::Solution {
            topic: SolutionTopic::VrRoadDesign,
        },
        Route::NewsArticle {
            slug: "traffictwin-v2-release".to_string(),
        },
        Route::Disclosure,
    ];
    for r in routes {
        let path = r.to_path(BASE);
        assert!(path.starts_with("/dochakWebsite/"), "{path}");
        assert_eq!(Route::parse(&path, BASE), r);
    }
}

#[test]
fn every_topic_slug_round_trips() {
    for t in SolutionTopic::ALL {
        assert_eq!(SolutionTopic::from_slug(t.slug()), Some(t));
    }
}
