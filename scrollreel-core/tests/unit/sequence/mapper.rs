use crate::sequence::holds::{HoldSpec, build_extended_sequence};

use super::*;

fn seq(total: u32, holds: &[HoldSpec]) -> FrameSequence {
    build_extended_sequence(total, holds).unwrap()
}

fn end_pause(total: u32) -> Vec<HoldSpec> {
    vec![
        HoldSpec::new(1, 5, "start"),
        HoldSpec::new(total / 2, 3, "mid"),
        HoldSpec::new(total, 10, "end"),
    ]
}

#[test]
fn endpoints_map_to_first_and_last_frame() {
    for total in [50, 100, 200] {
        let s = seq(total, &end_pause(total));
        assert_eq!(s.frame_at(0.0), FrameNumber(1));
        assert_eq!(s.frame_at(1.0), FrameNumber(total));
    }
}

#[test]
fn out_of_range_progress_is_clamped() {
    let s = seq(50, &end_pause(50));
    assert_eq!(s.frame_at(-0.5), FrameNumber(1));
    assert_eq!(s.frame_at(1.5), FrameNumber(50));
    assert_eq!(s.frame_at(f64::NAN), FrameNumber(1));
    assert_eq!(s.frame_at(f64::INFINITY), FrameNumber(50));
}

#[test]
fn mapping_is_monotonic_non_decreasing() {
    let s = seq(100, &end_pause(100));
    let mut prev = s.frame_at(0.0);
    for i in 1..=10_000 {
        let f = s.frame_at(f64::from(i) / 10_000.0);
        assert!(f >= prev, "frame went back at step {i}: {prev} -> {f}");
        prev = f;
    }
}

#[test]
fn mapping_follows_floor_of_scaled_index() {
    let s = seq(10, &[HoldSpec::new(5, 3, "")]);
    // table: 1 2 3 4 5 5 5 6 7 8 9 10 (len 12, last index 11)
    assert_eq!(s.len(), 12);
    assert_eq!(s.frame_at(3.5 / 11.0), FrameNumber(4));
    assert_eq!(s.frame_at(4.5 / 11.0), FrameNumber(5));
    assert_eq!(s.frame_at(6.5 / 11.0), FrameNumber(5));
    assert_eq!(s.frame_at(7.5 / 11.0), FrameNumber(6));
}

#[test]
fn hold_runs_are_sticky() {
    let s = seq(100, &end_pause(100));
    let hits = (0..=1000)
        .map(|i| s.frame_at(f64::from(i) / 1000.0))
        .filter(|f| *f == FrameNumber(100))
        .count();
    let plain = (0..=1000)
        .map(|i| s.frame_at(f64::from(i) / 1000.0))
        .filter(|f| *f == FrameNumber(70))
        .count();
    assert!(hits > 3 * plain, "end hold {hits} vs plain frame {plain}");
}

#[test]
fn progress_for_frame_inverts_mapping() {
    let s = seq(100, &end_pause(100));
    for f in 1..=100 {
        let p = s.progress_for_frame(FrameNumber(f));
        assert!((0.0..=1.0).contains(&p));
        assert!(s.frame_at(p) >= FrameNumber(f), "frame {f} at p={p}");
        if p > 0.0 {
            assert!(s.frame_at(p - 1e-9) < FrameNumber(f), "frame {f} not minimal");
        }
    }
    assert_eq!(s.progress_for_frame(FrameNumber(1)), 0.0);
    assert_eq!(s.progress_for_frame(FrameNumber(500)), 1.0);
}

#[test]
fn single_frame_sequence() {
    let s = seq(1, &[]);
    assert_eq!(s.frame_at(0.3), FrameNumber(1));
    assert_eq!(s.progress_for_frame(FrameNumber(1)), 0.0);
}
