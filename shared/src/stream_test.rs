use super::*;

fn sample_result() -> RowResult {
    RowResult {
        question: "q".to_owned(),
        expected_answer: "a".to_owned(),
        model_a_response: "a".to_owned(),
        model_a_latency: 1.0,
        model_a_tokens: 10,
        model_a_cost: 0.001,
        model_a_accuracy: 1.0,
        model_b_response: "b".to_owned(),
        model_b_latency: 0.5,
        model_b_tokens: 8,
        model_b_cost: 0.0001,
        model_b_accuracy: 0.0,
        winner: "gpt-4".to_owned(),
    }
}

// =============================================================
// Event encoding
// =============================================================

#[test]
fn start_event_uses_type_discriminant() {
    let line = encode_event(&EvalEvent::Start { total_rows: 3 });
    assert!(line.ends_with('\n'));
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("json");
    assert_eq!(value["type"], "start");
    assert_eq!(value["total_rows"], 3);
}

#[test]
fn row_complete_round_trips() {
    let event = EvalEvent::RowComplete {
        row_number: 2,
        total_rows: 3,
        progress: 66,
        result: sample_result(),
    };
    let line = encode_event(&event);
    let decoded = decode_event(line.trim()).expect("decode");
    assert_eq!(decoded, event);
}

#[test]
fn decode_rejects_unknown_event_type() {
    let err = decode_event(r#"{"type":"heartbeat"}"#).expect_err("should fail");
    assert!(matches!(err, StreamError::Decode(_)));
}

#[test]
fn decode_rejects_non_json_line() {
    assert!(decode_event("not json at all").is_err());
}

#[test]
fn terminal_events_are_flagged() {
    assert!(EvalEvent::Complete { total_rows: 1 }.is_terminal());
    assert!(EvalEvent::Error { error: "boom".to_owned() }.is_terminal());
    assert!(!EvalEvent::Start { total_rows: 1 }.is_terminal());
    assert!(
        !EvalEvent::RowError { row_number: 1, error: "x".to_owned() }.is_terminal()
    );
}

// =============================================================
// LineSplitter
// =============================================================

#[test]
fn splitter_yields_complete_lines() {
    let mut splitter = LineSplitter::new();
    let lines = splitter.push(b"{\"a\":1}\n{\"b\":2}\n");
    assert_eq!(lines, vec!["{\"a\":1}".to_owned(), "{\"b\":2}".to_owned()]);
}

#[test]
fn splitter_buffers_partial_line_across_chunks() {
    let mut splitter = LineSplitter::new();
    assert!(splitter.push(b"{\"type\":\"row_co").is_empty());
    let lines = splitter.push(b"mplete\",\"row_number\":1}\n");
    assert_eq!(lines, vec!["{\"type\":\"row_complete\",\"row_number\":1}".to_owned()]);
}

#[test]
fn splitter_handles_multiple_lines_in_one_chunk_with_remainder() {
    let mut splitter = LineSplitter::new();
    let lines = splitter.push(b"one\ntwo\nthr");
    assert_eq!(lines, vec!["one".to_owned(), "two".to_owned()]);
    assert_eq!(splitter.finish(), Some("thr".to_owned()));
}

#[test]
fn splitter_drops_blank_lines_and_trims_crlf() {
    let mut splitter = LineSplitter::new();
    let lines = splitter.push(b"one\r\n\n\r\ntwo\n");
    assert_eq!(lines, vec!["one".to_owned(), "two".to_owned()]);
}

#[test]
fn splitter_finish_empty_when_stream_ends_cleanly() {
    let mut splitter = LineSplitter::new();
    let _ = splitter.push(b"done\n");
    assert_eq!(splitter.finish(), None);
}

#[test]
fn split_event_parses_once_fully_received() {
    // A row_complete event split mid-JSON across two reads must parse after
    // the second chunk arrives.
    let event = EvalEvent::RowComplete {
        row_number: 1,
        total_rows: 3,
        progress: 33,
        result: sample_result(),
    };
    let line = encode_event(&event);
    let bytes = line.as_bytes();
    let (head, tail) = bytes.split_at(bytes.len() / 2);

    let mut splitter = LineSplitter::new();
    assert!(splitter.push(head).is_empty());
    let lines = splitter.push(tail);
    assert_eq!(lines.len(), 1);
    assert_eq!(decode_event(&lines[0]).expect("decode"), event);
}
