use super::*;

#[test]
fn cancel_is_visible_through_clones() {
    let a = CancellationToken::new();
    let b = a.clone();
    assert!(b.is_live());
    a.cancel();
    assert!(b.is_cancelled());
}

#[test]
fn cancel_is_visible_across_threads() {
    let token = CancellationToken::new();
    let worker = {
        let token = token.clone();
        std::thread::spawn(move || {
            while token.is_live() {
                std::thread::yield_now();
            }
        })
    };
    token.cancel();
    worker.join().unwrap();
    assert!(token.is_cancelled());
}
