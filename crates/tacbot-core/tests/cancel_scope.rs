use tacbot_core::{CancelReason, CancelScope};

#[test]
fn cancelling_parent_propagates_to_every_descendant() {
    let root = CancelScope::root();
    let child = root.child();
    let grandchild = child.child_with_deadline(100);

    assert!(!grandchild.is_cancelled(0));

    root.cancel();

    assert!(child.is_cancelled(0));
    assert_eq!(grandchild.reason(0), Some(CancelReason::Cancelled));
}

#[test]
fn cancelling_child_leaves_parent_and_siblings_running() {
    let root = CancelScope::root();
    let a = root.child();
    let b = root.child();

    a.cancel();

    assert!(a.is_cancelled(0));
    assert!(!b.is_cancelled(0));
    assert!(!root.is_cancelled(0));
}

#[test]
fn deadline_fires_at_deadline_tick() {
    let root = CancelScope::root();
    let timed = root.child_with_deadline(10);

    assert!(!timed.is_cancelled(9));
    assert_eq!(timed.reason(10), Some(CancelReason::DeadlineReached));
    assert!(!root.is_cancelled(10));
}

#[test]
fn linked_scope_whichever_fires_first_wins() {
    let caller = CancelScope::root();
    let timed = caller.child_with_deadline(50);

    caller.cancel();
    assert_eq!(timed.reason(1), Some(CancelReason::Cancelled));

    let outer = CancelScope::root().child_with_deadline(5);
    let inner = outer.child_with_deadline(50);
    assert_eq!(inner.reason(5), Some(CancelReason::DeadlineReached));
}
