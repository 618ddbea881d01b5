use crate::sim::{SimTime, TransitionKind};
use crate::trace::{TraceEvent, TraceEventKind, TraceLogger};
use serde_json::Value;

#[test]
fn trace_event_serializes_flat_with_kind_tag() {
    let ev = TraceEvent::new(
        SimTime(1.5),
        "proc",
        SimTime(2.5),
        TraceEventKind::Transition {
            transition: TransitionKind::Confluent,
        },
    );
    let v: Value = serde_json::to_value(&ev).expect("serialize");
    assert_eq!(v["kind"], "transition");
    assert_eq!(v["transition"], "confluent");
    assert_eq!(v["t"], 1.5);
    assert_eq!(v["t_next"], 2.5);
    assert_eq!(v["model"], "proc");
}

#[test]
fn passive_t_next_is_omitted() {
    let ev = TraceEvent::new(SimTime(3.0), "gen", SimTime::INFINITY, TraceEventKind::Exit);
    assert_eq!(ev.t_next, None);
    let v: Value = serde_json::to_value(&ev).expect("serialize");
    assert!(v.get("t_next").is_none());

    let back: TraceEvent = serde_json::from_value(v).expect("deserialize");
    assert_eq!(back, ev);
}

#[test]
fn logger_writes_json_array() {
    let mut log = TraceLogger::default();
    log.push(TraceEvent::new(SimTime::ZERO, "gen", SimTime(1.0), TraceEventKind::Init));
    log.push(TraceEvent::new(
        SimTime(1.0),
        "gen",
        SimTime(2.0),
        TraceEventKind::Output { count: 1 },
    ));
    let raw = log.to_json_pretty().expect("json");
    let v: Value = serde_json::from_str(&raw).expect("parse");
    let arr = v.as_array().expect("array");
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["kind"], "init");
    assert_eq!(arr[1]["count"], 1);
}
