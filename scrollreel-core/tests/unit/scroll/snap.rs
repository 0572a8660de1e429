use crate::sequence::holds::build_extended_sequence;

use super::*;

fn config() -> SnapConfig {
    SnapConfig {
        enabled: true,
        idle_ms: 300.0,
        max_frames_ahead: 6,
        max_velocity: 2.0,
        settle_ms: 500.0,
        points: [1, 6, 18, 31, 46, 50]
            .into_iter()
            .map(|f| SnapPoint {
                frame: FrameNumber(f),
                label: format!("p{f}"),
            })
            .collect(),
    }
}

fn geometry() -> ScrollGeometry {
    ScrollGeometry {
        scroll_y: 0.0,
        container_top: 0.0,
        container_height: 5900.0,
        viewport_height: 1000.0,
    }
}

fn slow_controller() -> SnapController {
    let mut c = SnapController::new(config());
    c.record_scroll(100.0, 0.0);
    c.record_scroll(150.0, 100.0);
    c
}

#[test]
fn snaps_forward_to_next_close_point_after_idle() {
    let seq = build_extended_sequence(50, &[]).unwrap();
    let mut c = slow_controller();
    assert!((c.velocity() - 0.5).abs() < 1e-12);

    let target = c
        .on_idle(450.0, FrameNumber(3), &geometry(), &seq)
        .unwrap();
    assert_eq!(target.frame, FrameNumber(6));
    assert_eq!(target.label, "p6");
    assert!(c.is_snapping());

    assert!((target.scroll_y - 500.0).abs() < 1e-6, "{}", target.scroll_y);
}

#[test]
fn waits_for_idle_time() {
    let seq = build_extended_sequence(50, &[]).unwrap();
    let mut c = slow_controller();
    assert!(c.on_idle(399.0, FrameNumber(3), &geometry(), &seq).is_none());
    assert!(!c.is_snapping());
}

#[test]
fn fast_scroll_does_not_snap() {
    let seq = build_extended_sequence(50, &[]).unwrap();
    let mut c = SnapController::new(config());
    c.record_scroll(0.0, 0.0);
    c.record_scroll(300.0, 100.0);
    assert!(c.velocity() >= 2.0);
    assert!(c.on_idle(1000.0, FrameNumber(3), &geometry(), &seq).is_none());
}

#[test]
fn distant_or_passed_points_are_ignored() {
    let seq = build_extended_sequence(50, &[]).unwrap();
    let mut c = slow_controller();
    assert!(c.on_idle(1000.0, FrameNumber(8), &geometry(), &seq).is_none());
    // Sitting on a point looks at the one after it.
    assert!(c.on_idle(1000.0, FrameNumber(6), &geometry(), &seq).is_none());
    assert!(c.on_idle(1000.0, FrameNumber(50), &geometry(), &seq).is_none());
}

#[test]
fn reach_is_exclusive_of_max_frames_ahead() {
    let seq = build_extended_sequence(50, &[]).unwrap();

    let mut c = slow_controller();
    assert!(c.on_idle(1000.0, FrameNumber(12), &geometry(), &seq).is_none());

    let mut c = slow_controller();
    let target = c
        .on_idle(1000.0, FrameNumber(13), &geometry(), &seq)
        .unwrap();
    assert_eq!(target.frame, FrameNumber(18));
}

#[test]
fn snap_in_flight_blocks_until_settled() {
    let seq = build_extended_sequence(50, &[]).unwrap();
    let mut c = slow_controller();
    assert!(c.on_idle(400.0, FrameNumber(3), &geometry(), &seq).is_some());
    assert!(c.on_idle(500.0, FrameNumber(3), &geometry(), &seq).is_none());

    c.snap_settled();
    assert!(!c.is_snapping());
    assert!(c.on_idle(600.0, FrameNumber(3), &geometry(), &seq).is_some());

    // Settles on its own once settle_ms has passed.
    assert!(c.on_idle(1200.0, FrameNumber(14), &geometry(), &seq).is_some());
}

#[test]
fn disabled_or_unsampled_never_snaps() {
    let seq = build_extended_sequence(50, &[]).unwrap();
    let mut off = SnapController::new(SnapConfig {
        enabled: false,
        ..config()
    });
    off.record_scroll(0.0, 0.0);
    assert!(off.on_idle(1000.0, FrameNumber(3), &geometry(), &seq).is_none());

    let mut fresh = SnapController::new(config());
    assert!(fresh.on_idle(1000.0, FrameNumber(3), &geometry(), &seq).is_none());
}

#[test]
fn validate_requires_ascending_points_in_range() {
    assert!(config().validate(50).is_ok());
    assert!(config().validate(40).is_err());

    let mut c = config();
    c.points.swap(1, 2);
    assert!(c.validate(50).is_err());
}

#[test]
fn defaults_fill_missing_timings() {
    let c: SnapConfig =
        serde_json::from_str(r#"{"max_frames_ahead": 6, "points": [{"frame": 6}]}"#).unwrap();
    assert!(c.enabled);
    assert_eq!(c.idle_ms, 300.0);
    assert_eq!(c.max_velocity, 2.0);
    assert_eq!(c.settle_ms, 500.0);
}
