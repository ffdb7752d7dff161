use std::cell::RefCell;
use std::rc::Rc;

use tacbot_core::Blackboard;
use tacbot_tools::{emit, TraceEvent, TraceLog, TraceSink, TRACE_LOG, TRACE_SINK};

#[derive(Clone, Default)]
struct RcSink(Rc<RefCell<Vec<TraceEvent>>>);

impl TraceSink for RcSink {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}

#[test]
fn emit_is_a_no_op_without_log_or_sink() {
    let mut bb = Blackboard::new();
    emit(&mut bb, TraceEvent::new(1, "target.lost"));
    assert!(bb.is_empty());
}

#[test]
fn emit_writes_to_trace_log_when_present() {
    let mut bb = Blackboard::new();
    bb.set(TRACE_LOG, TraceLog::default());

    emit(
        &mut bb,
        TraceEvent::new(1, "target.acquired")
            .with_subject(10)
            .with_detail(20),
    );

    let log = bb.get(TRACE_LOG).unwrap();
    assert_eq!(log.events.len(), 1);
    assert_eq!(log.events[0].tick, 1);
    assert_eq!(log.events[0].tag, "target.acquired");
    assert_eq!(log.events[0].subject, 10);
    assert_eq!(log.events[0].detail, 20);
}

#[test]
fn emit_writes_to_both_log_and_sink_when_both_present() {
    let mut bb = Blackboard::new();
    bb.set(TRACE_LOG, TraceLog::default());

    let handle = RcSink::default();
    let shared = handle.0.clone();
    bb.set(TRACE_SINK, Box::new(handle) as Box<dyn TraceSink>);

    emit(&mut bb, TraceEvent::new(3, "combat.start"));

    let log = bb.get(TRACE_LOG).unwrap();
    assert_eq!(log.count("combat.start"), 1);

    let events = shared.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].tag, "combat.start");
}

#[test]
fn log_queries_filter_by_tag() {
    let mut log = TraceLog::default();
    log.push(TraceEvent::new(4, "roam.start"));
    log.push(TraceEvent::new(6, "combat.start"));
    log.push(TraceEvent::new(8, "roam.start"));

    assert_eq!(log.count("roam.start"), 2);
    assert_eq!(log.first_tick("combat.start"), Some(6));
    assert_eq!(log.first_tick("combat.end"), None);
}
