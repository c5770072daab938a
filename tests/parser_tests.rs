use std::io::Write;
use tempfile::NamedTempFile;
use trace_pattern_studio::parser::{read_trace, EventKind, Trace};
use trace_pattern_studio::utils::error::TraceError;

#[test]
fn test_from_raw_tolerates_whitespace() {
    let trace = Trace::from_raw("enter:main, enter:work ,exit:work,\nexit:main,\n").unwrap();

    assert_eq!(trace.len(), 6);
    assert_eq!(trace.render(2).unwrap(), "enter:work");
    assert_eq!(trace.event(5).unwrap().kind, EventKind::Exit);
}

#[test]
fn test_read_trace_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "enter:a,enter:b,exit:b,exit:a").unwrap();

    let trace = read_trace(file.path()).unwrap();

    assert_eq!(trace.len(), 6);
    assert_eq!(trace.names(), &["a", "b", "root"]);
}

#[test]
fn test_read_missing_file() {
    let err = read_trace("/nonexistent/trace").unwrap_err();
    assert!(matches!(err, TraceError::Io(_)));
}

#[test]
fn test_malformed_entries() {
    for bad in ["call:a", "enter:", "enter"] {
        let input = format!("enter:x,{bad},exit:x");
        let result = Trace::from_raw(&input);
        assert!(
            matches!(result, Err(TraceError::MalformedEvent { index: 1, .. })),
            "{bad} should be malformed"
        );
    }
}

#[test]
fn test_unclosed_call_rejected() {
    let err = Trace::from_raw("enter:a,enter:b,exit:b").unwrap_err();
    match err {
        TraceError::UnbalancedTrace { reason, .. } => assert!(reason.contains("never exit")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_root_name_in_input_is_balanced() {
    let trace = Trace::from_raw("enter:root,exit:root").unwrap();
    assert_eq!(trace.len(), 4);
    assert_eq!(trace.names().len(), 1);
}
