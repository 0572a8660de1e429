use super::*;

fn catalog() -> Catalog {
    Catalog::embedded().unwrap()
}

#[test]
fn known_article_resolves() {
    let c = catalog();
    let route = Route::parse("/dochakWebsite/news/traffictwin-v2-release", "/dochakWebsite");
    match resolve(&route, &c) {
        View::NewsArticle { article } => assert_eq!(article.slug, "traffictwin-v2-release"),
        other => panic!("unexpected view {other:?}"),
    }
}

#[test]
fn unknown_keys_are_not_found() {
    let c = catalog();
    let misses = [
        Route::NewsArticle {
            slug: "does-not-exist".to_string(),
        },
        Route::Course {
            code: "XX-999".to_string(),
        },
        Route::DisclosureSection {
            section: "trademarks".to_string(),
        },
    ];
    for r in misses {
        assert!(resolve(&r, &c).is_not_found(), "{r:?}");
    }
    assert_eq!(
        resolve(
            &Route::NewsArticle {
                slug: "does-not-exist".to_string()
            },
            &c
        ),
        View::NotFound {
            path: "/news/does-not-exist".to_string()
        }
    );
}

#[test]
fn unknown_solution_topic_is_not_found() {
    let c = catalog();
    let route = Route::parse("/solutions/hoverboards", "");
    assert!(resolve(&route, &c).is_not_found());
}

#[test]
fn disclosure_lists_years_and_filtered_publications() {
    let c = catalog();
    match resolve(&Route::Disclosure, &c) {
        View::Disclosure {
            years,
            publications,
        } => {
            assert_eq!(years.first(), Some(&2026));
            assert_eq!(publications.len(), c.publications().len());
        }
        other => panic!("unexpected view {other:?}"),
    }

    let filter = PublicationFilter::new("", Some(2023));
    let route = Route::DisclosureSection {
        section: "publications".to_string(),
    };
    match resolve_filtered(&route, &c, &filter) {
        View::DisclosureSection {
            section,
            publications,
        } => {
            assert_eq!(section, DisclosureKind::Publications);
            assert!(!publications.is_empty());
            assert!(publications.iter().all(|p| p.year() == Some(2023)));
        }
        other => panic!("unexpected view {other:?}"),
    }
}

#[test]
fn patents_section_is_empty_not_missing() {
    let c = catalog();
    let route = Route::DisclosureSection {
        section: "patents".to_string(),
    };
    assert_eq!(
        resolve(&route, &c),
        View::DisclosureSection {
            section: DisclosureKind::Patents,
            publications: Vec::new(),
        }
    );
}

#[test]
fn view_serializes_with_tag() {
    let c = catalog();
    let json = serde_json::to_value(resolve(&Route::Training, &c)).unwrap();
    assert_eq!(json["view"], "training");
    assert_eq!(json["courses"].as_array().map(Vec::len), Some(5));
}
