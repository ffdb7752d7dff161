use tacbot_core::{BbKey, Blackboard};

#[test]
fn blackboard_set_get_remove_roundtrip() {
    let k_u32 = BbKey::<u32>::new("shots");
    let k_str = BbKey::<String>::new("callout");

    let mut bb = Blackboard::new();
    assert!(!bb.contains(k_u32));

    bb.set(k_u32, 123);
    bb.set(k_str, "flank left".to_string());

    assert_eq!(bb.get(k_u32).copied(), Some(123));
    assert_eq!(bb.get(k_str).map(|s| s.as_str()), Some("flank left"));
    assert_eq!(bb.len(), 2);

    assert_eq!(bb.remove(k_u32), Some(123));
    assert_eq!(bb.get(k_u32), None);
}

#[test]
fn missing_key_reads_as_unknown_not_default() {
    let bb = Blackboard::new();
    assert_eq!(bb.get(BbKey::<f32>::new("distance")), None);
}

#[test]
fn get_or_insert_with_keeps_existing_value() {
    let key = BbKey::<Vec<u32>>::new("seen");
    let mut bb = Blackboard::new();

    bb.get_or_insert_with(key, Vec::new).push(4);
    bb.get_or_insert_with(key, || vec![99]).push(5);

    assert_eq!(bb.get(key), Some(&vec![4, 5]));
}

#[test]
#[should_panic(expected = "blackboard type mismatch")]
fn blackboard_type_mismatch_panics() {
    let mut bb = Blackboard::new();
    bb.set(BbKey::<u32>::new("ammo"), 1u32);
    let _ = bb.get(BbKey::<i32>::new("ammo"));
}
