use super::*;

fn window(a: u32, b: u32, c: u32, d: u32) -> OpacityWindow {
    OpacityWindow::new(a, b, c, d).unwrap()
}

fn card(position: CardCorner, title: &str) -> CornerCard {
    CornerCard {
        position,
        title: title.to_string(),
        metric: "10+".to_string(),
        link: "/training".to_string(),
        accent: Rgba8::parse_hex("#10b981").unwrap(),
    }
}

fn config() -> OverlayConfig {
    OverlayConfig {
        blocks: vec![
            OverlayBlock {
                id: "intro".to_string(),
                phase: Phase::Intro,
                window: window(1, 1, 20, 24),
                children: Vec::new(),
            },
            OverlayBlock {
                id: "deep-dive".to_string(),
                phase: Phase::DeepDive,
                window: window(49, 52, 74, 77),
                children: vec![OverlayChild {
                    id: "code".to_string(),
                    window: window(51, 53, 74, 77),
                }],
            },
        ],
        corner_cards: CornerCardsConfig {
            visible_from: 25,
            visible_to: 48,
            window: window(25, 32, 43, 48),
            slide_from: 25,
            slide_to: 32,
            slide_ease: Ease::Linear,
            cards: vec![
                card(CardCorner::TopLeft, "Research Papers"),
                card(CardCorner::BottomRight, "Integrated Solutions"),
            ],
        },
        glow: GlowConfig {
            window_start: 30,
            window_end: 70,
            base: 0.3,
            amplitude: 0.3,
            idle: 0.2,
        },
    }
}

#[test]
fn only_blocks_of_the_active_phase_are_reported() {
    let cfg = config();
    let s = cfg.state(FrameNumber(10), Phase::Intro);
    assert_eq!(s.blocks.len(), 1);
    assert_eq!(s.blocks[0].id, "intro");
    assert_eq!(s.blocks[0].opacity, 1.0);

    let s = cfg.state(FrameNumber(60), Phase::DeepDive);
    assert_eq!(s.blocks.len(), 1);
    assert_eq!(s.blocks[0].children.len(), 1);
    assert_eq!(s.blocks[0].children[0].opacity, 1.0);

    let s = cfg.state(FrameNumber(90), Phase::Cta);
    assert!(s.blocks.is_empty());
}

#[test]
fn staggered_child_trails_its_block() {
    let cfg = config();
    let s = cfg.state(FrameNumber(51), Phase::DeepDive);
    let block = &s.blocks[0];
    assert!(block.opacity > 0.0);
    assert_eq!(block.children[0].opacity, 0.0);
}

#[test]
fn cards_visible_only_inside_their_range() {
    let cfg = config();
    assert!(cfg.corner_cards.state(FrameNumber(24)).is_empty());
    assert!(cfg.corner_cards.state(FrameNumber(49)).is_empty());

    let at_start = cfg.corner_cards.state(FrameNumber(25));
    assert_eq!(at_start.len(), 2);
    assert!(at_start.iter().all(|c| c.hidden && c.opacity == 0.0));
    assert_eq!(at_start[0].slide, Vec2::new(-100.0, -100.0));
    assert_eq!(at_start[1].slide, Vec2::new(100.0, 100.0));

    let settled = cfg.corner_cards.state(FrameNumber(35));
    assert!(settled.iter().all(|c| !c.hidden && c.opacity == 1.0));
    assert!(settled.iter().all(|c| c.slide == Vec2::ZERO));
}

#[test]
fn glow_peaks_mid_window_and_idles_outside() {
    let g = config().glow;
    assert_eq!(g.intensity(FrameNumber(10)), 0.2);
    assert_eq!(g.intensity(FrameNumber(71)), 0.2);
    assert!((g.intensity(FrameNumber(30)) - 0.3).abs() < 1e-12);
    assert!((g.intensity(FrameNumber(50)) - 0.6).abs() < 1e-12);
}

#[test]
fn validate_rejects_cards_past_the_last_frame() {
    let mut cfg = config();
    assert!(cfg.validate(100).is_ok());
    cfg.corner_cards.visible_to = 120;
    assert!(matches!(cfg.validate(100), Err(ReelError::Validation(_))));
}

#[test]
fn validate_names_the_offending_block() {
    let mut cfg = config();
    cfg.blocks[1].children[0].window.peak_start = 80;
    let msg = cfg.validate(100).unwrap_err().to_string();
    assert!(msg.contains("deep-dive/code"), "{msg}");
}

#[test]
fn corner_serializes_kebab_case() {
    let s = serde_json::to_string(&CardCorner::BottomLeft).unwrap();
    assert_eq!(s, "\"bottom-left\"");
}
