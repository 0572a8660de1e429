use std::{
    collections::HashSet,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use crate::{
    assets::{cache::ImageSource, manifest::FramePattern},
    foundation::error::ReelError,
};

use super::*;

struct StubSource {
    failing: HashSet<String>,
    order: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl StubSource {
    fn new(failing: &[&str]) -> Self {
        Self {
            failing: failing.iter().map(|s| s.to_string()).collect(),
            order: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl ImageSource for StubSource {
    fn load(&self, path: &str) -> ReelResult<PreparedImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.order.lock().unwrap().push(path.to_string());
        if self.failing.contains(path) {
            return Err(ReelError::asset(format!("404 {path}")));
        }
        Ok(PreparedImage::from_straight_rgba8(2, 1, vec![9; 8]))
    }
}

fn manifest(n: u32) -> FrameManifest {
    FrameManifest::from_pattern(&FramePattern::new("f_", 3, ".webp"), n).unwrap()
}

#[test]
fn plan_splits_priority_and_remaining() {
    let plan = PreloadPlan::new(&manifest(10), 4);
    let pri: Vec<u32> = plan.priority.iter().map(|(f, _)| f.0).collect();
    let rem: Vec<u32> = plan.remaining.iter().map(|(f, _)| f.0).collect();
    assert_eq!(pri, vec![1, 2, 3, 4]);
    assert_eq!(rem, vec![5, 6, 7, 8, 9, 10]);
    assert_eq!(plan.priority[0].1, "f_001.webp");

    let all_priority = PreloadPlan::new(&manifest(3), 40);
    assert_eq!(all_priority.priority.len(), 3);
    assert!(all_priority.remaining.is_empty());
}

#[test]
fn waves_run_in_order_and_progress_is_monotonic() {
    let src = Arc::new(StubSource::new(&[]));
    let cache = ImageCache::new(src.clone());
    let plan = PreloadPlan::new(&manifest(6), 2);

    let mut state = PreloadState::new();
    let mut seen = Vec::new();
    let outcome = run_waves(&plan, &cache, &CancellationToken::new(), |ev| {
        if let PreloadEvent::Progress(p) = ev {
            seen.push(p);
        }
        if matches!(ev, PreloadEvent::PriorityComplete) {
            seen.push(u8::MAX);
        }
        state.apply(ev);
    });

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(seen, vec![25, 50, u8::MAX, 63, 75, 88, 100]);
    let order = src.order.lock().unwrap().clone();
    assert_eq!(order.first().map(String::as_str), Some("f_001.webp"));
    assert_eq!(order.last().map(String::as_str), Some("f_006.webp"));
    assert!(state.is_ready());
    assert!(state.is_complete());
    assert_eq!(state.frames().len(), 6);
}

#[test]
fn failed_frame_is_skipped_and_fallback_covers_it() {
    let src = Arc::new(StubSource::new(&["f_007.webp"]));
    let cache = ImageCache::new(src.clone());
    let plan = PreloadPlan::new(&manifest(10), 4);

    let mut state = PreloadState::new();
    run_waves(&plan, &cache, &CancellationToken::new(), |ev| state.apply(ev));

    assert!(state.is_complete());
    assert_eq!(state.failed(), &[FrameNumber(7)]);
    assert!(!state.frames().contains(FrameNumber(7)));
    let (f, _) = state.frames().resolve(FrameNumber(7)).unwrap();
    assert_eq!(f, FrameNumber(6));
    assert_eq!(src.calls.load(Ordering::SeqCst), 10);
}

#[test]
fn cancelled_token_stops_before_loading() {
    let src = Arc::new(StubSource::new(&[]));
    let cache = ImageCache::new(src.clone());
    let plan = PreloadPlan::new(&manifest(5), 2);
    let token = CancellationToken::new();
    token.cancel();

    let mut events = 0;
    let outcome = run_waves(&plan, &cache, &token, |_| events += 1);
    assert_eq!(outcome, RunOutcome::Cancelled);
    assert_eq!(events, 0);
    assert_eq!(src.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn initial_state_is_loading() {
    let s = PreloadState::new();
    assert_eq!(s.priority, WaveStatus::Loading);
    assert_eq!(s.remaining, WaveStatus::Idle);
    assert_eq!(s.overall, WaveStatus::Loading);
    assert_eq!(s.progress, 0);
    assert!(!s.is_ready());
}

#[test]
fn worker_delivers_everything_through_wait() {
    let src = Arc::new(StubSource::new(&[]));
    let cache = Arc::new(ImageCache::new(src));
    let mut handle = spawn_preloader(PreloadPlan::new(&manifest(8), 3), cache).unwrap();

    let mut state = PreloadState::new();
    handle.wait(&mut state);
    assert!(handle.is_finished());
    assert!(state.is_complete());
    assert_eq!(state.progress, 100);
    assert_eq!(state.frames().len(), 8);
}

#[test]
fn cancelled_handle_applies_nothing() {
    let src = Arc::new(StubSource::new(&[]));
    let cache = Arc::new(ImageCache::new(src));
    let mut handle = spawn_preloader(PreloadPlan::new(&manifest(8), 3), cache).unwrap();
    handle.cancel();
    std::thread::sleep(Duration::from_millis(20));

    let mut state = PreloadState::new();
    assert_eq!(handle.drain(&mut state), 0);
    assert!(state.frames().is_empty());
    assert_eq!(state.overall, WaveStatus::Loading);
}
