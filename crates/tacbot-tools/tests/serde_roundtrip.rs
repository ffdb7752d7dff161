#![cfg(feature = "serde")]

use tacbot_tools::{TraceEvent, TraceLog};

#[test]
fn trace_log_json_roundtrip() {
    let log = TraceLog {
        events: vec![
            TraceEvent::new(1, "target.acquired").with_subject(7),
            TraceEvent::new(2, "combat.start").with_subject(7),
            TraceEvent::new(9, "shoot.burst").with_subject(7).with_detail(3),
        ],
    };

    let json = serde_json::to_string(&log).expect("serialize");
    let roundtrip: TraceLog = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(roundtrip, log);
}
