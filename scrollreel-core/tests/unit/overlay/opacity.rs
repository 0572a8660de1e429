use super::*;

fn w(a: u32, b: u32, c: u32, d: u32) -> OpacityWindow {
    OpacityWindow::new(a, b, c, d).unwrap()
}

#[test]
fn outside_window_is_transparent() {
    let win = w(25, 32, 43, 48);
    assert_eq!(win.opacity(FrameNumber(24)), 0.0);
    assert_eq!(win.opacity(FrameNumber(49)), 0.0);
    assert_eq!(win.opacity(FrameNumber(0)), 0.0);
}

#[test]
fn plateau_is_opaque_and_ramps_are_linear() {
    let win = w(25, 32, 43, 48);
    assert_eq!(win.opacity(FrameNumber(25)), 0.0);
    assert_eq!(win.opacity(FrameNumber(32)), 1.0);
    assert_eq!(win.opacity(FrameNumber(40)), 1.0);
    assert_eq!(win.opacity(FrameNumber(43)), 1.0);
    assert!((win.opacity(FrameNumber(28)) - 3.0 / 7.0).abs() < 1e-12);
    assert!((win.opacity(FrameNumber(46)) - 0.4).abs() < 1e-12);
    assert_eq!(win.opacity(FrameNumber(48)), 0.0);
}

#[test]
fn degenerate_ramps_do_not_divide_by_zero() {
    let win = w(1, 1, 20, 24);
    assert_eq!(win.opacity(FrameNumber(1)), 1.0);

    let cta = w(78, 86, 100, 100);
    assert_eq!(cta.opacity(FrameNumber(100)), 1.0);
    assert!(cta.opacity(FrameNumber(82)) > 0.0);
}

#[test]
fn unordered_window_is_rejected() {
    let err = OpacityWindow::new(10, 5, 20, 30).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
}

#[test]
fn motion_holds_endpoints_outside_ramp() {
    let m = FrameMotion {
        start_frame: 25,
        end_frame: 32,
        from: Vec2::new(-100.0, -100.0),
        to: Vec2::ZERO,
        ease: Ease::Linear,
    };
    assert_eq!(frame_position(&m, FrameNumber(10)), Vec2::new(-100.0, -100.0));
    assert_eq!(frame_position(&m, FrameNumber(25)), Vec2::new(-100.0, -100.0));
    assert_eq!(frame_position(&m, FrameNumber(32)), Vec2::ZERO);
    assert_eq!(frame_position(&m, FrameNumber(40)), Vec2::ZERO);

    let mid = frame_position(&m, FrameNumber(29));
    let expect = -100.0 + 100.0 * 4.0 / 7.0;
    assert!((mid.x - expect).abs() < 1e-9);
    assert!((mid.y - expect).abs() < 1e-9);
}

#[test]
fn zero_length_motion_steps_at_end_frame() {
    let m = FrameMotion {
        start_frame: 10,
        end_frame: 10,
        from: Vec2::new(5.0, 0.0),
        to: Vec2::ZERO,
        ease: Ease::OutCubic,
    };
    assert_eq!(m.progress(FrameNumber(9)), 0.0);
    assert_eq!(m.progress(FrameNumber(10)), 1.0);
    assert_eq!(frame_position(&m, FrameNumber(10)), Vec2::ZERO);
}
