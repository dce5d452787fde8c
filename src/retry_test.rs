use super::*;

#[test]
fn fresh_token_is_not_cancelled() {
    assert!(!CancelToken::new().is_cancelled());
}

#[test]
fn cancel_marks_the_token() {
    let token = CancelToken::new();
    token.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn cancel_is_idempotent() {
    let token = CancelToken::new();
    token.cancel();
    token.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn clones_observe_the_same_flag() {
    // A task holds one clone while the owner keeps another; cancelling the
    // owner's copy must stop the task's ticks ("never found" teardown).
    let owner = CancelToken::new();
    let task = owner.clone();
    assert!(!task.is_cancelled());
    owner.cancel();
    assert!(task.is_cancelled());
}
