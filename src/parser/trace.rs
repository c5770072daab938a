//! Trace construction.
//!
//! Raw traces arrive as comma-separated `<enter|exit>:<name>` entries, a
//! concatenation of complete call stacks. In order to detect a pattern the
//! finder relies on it being planted on top of some base function, so the
//! whole sequence is wrapped in a synthetic `root` frame. The wrapped sequence
//! is checked to be one complete, balanced call stack before anything else
//! gets to look at it.

use super::event::{parse_event, Event, EventKind, RawEvent, Symbol};
use crate::utils::config::ROOT_FUNCTION;
use crate::utils::error::TraceError;
use log::debug;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// A root-wrapped, balanced sequence of call events
///
/// Index 0 is always `enter:root` and the last index is always `exit:root`.
#[derive(Debug, Clone)]
pub struct Trace {
    events: Vec<Event>,
    names: Vec<String>,
}

impl Trace {
    /// Build a trace from individual `<enter|exit>:<name>` entries
    ///
    /// # Errors
    /// * `TraceError::MalformedEvent` - an entry does not parse
    /// * `TraceError::UnbalancedTrace` - the entries are not a sequence of
    ///   complete call stacks
    pub fn from_entries<I, S>(entries: I) -> Result<Self, TraceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let raw = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let entry = entry.as_ref();
                parse_event(entry).ok_or_else(|| TraceError::MalformedEvent {
                    index,
                    entry: entry.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_raw_events(raw)
    }

    /// Build a trace from comma-separated text
    ///
    /// Blank entries (e.g. a trailing comma or newline) are skipped.
    pub fn from_raw(text: &str) -> Result<Self, TraceError> {
        let mut raw = Vec::new();
        for (index, entry) in text.split(',').enumerate() {
            if entry.trim().is_empty() {
                continue;
            }

            let event = parse_event(entry).ok_or_else(|| TraceError::MalformedEvent {
                index,
                entry: entry.trim().to_string(),
            })?;
            raw.push(event);
        }

        Self::from_raw_events(raw)
    }

    /// The trace of an empty input: just the root frame
    pub fn empty() -> Self {
        Self {
            events: vec![Event::enter(Symbol(0)), Event::exit(Symbol(0))],
            names: vec![ROOT_FUNCTION.to_string()],
        }
    }

    fn from_raw_events(raw: Vec<RawEvent>) -> Result<Self, TraceError> {
        let mut name_set: BTreeSet<&str> = raw.iter().map(|e| e.function.as_str()).collect();
        name_set.insert(ROOT_FUNCTION);
        let names: Vec<String> = name_set.into_iter().map(str::to_string).collect();

        let intern = |name: &str| -> Symbol {
            // every name was inserted above
            let index = names.binary_search_by(|n| n.as_str().cmp(name)).unwrap_or(0);
            Symbol(index as u32)
        };

        let root = intern(ROOT_FUNCTION);
        let mut events = Vec::with_capacity(raw.len() + 2);
        events.push(Event::enter(root));
        events.extend(raw.iter().map(|e| Event {
            kind: e.kind,
            function: intern(&e.function),
        }));
        events.push(Event::exit(root));

        let trace = Self { events, names };
        trace.check_balanced()?;

        debug!(
            "Built trace: {} events, {} distinct functions",
            trace.len(),
            trace.names.len()
        );

        Ok(trace)
    }

    /// Walk the wrapped events with a call stack
    ///
    /// Errors carry the index in the unwrapped input.
    fn check_balanced(&self) -> Result<(), TraceError> {
        let last = self.events.len() - 1;
        let mut stack: Vec<Symbol> = vec![self.events[0].function];

        for (i, event) in self.events.iter().enumerate().take(last).skip(1) {
            match event.kind {
                EventKind::Enter => stack.push(event.function),
                EventKind::Exit => {
                    if stack.len() == 1 {
                        return Err(TraceError::UnbalancedTrace {
                            index: i - 1,
                            reason: format!(
                                "{} has no open call to exit",
                                self.render_event(*event)
                            ),
                        });
                    }

                    let open = stack.pop().unwrap_or(event.function);
                    if open != event.function {
                        return Err(TraceError::UnbalancedTrace {
                            index: i - 1,
                            reason: format!(
                                "{} does not close the innermost open call {}",
                                self.render_event(*event),
                                self.name(open)
                            ),
                        });
                    }
                }
            }
        }

        if stack.len() > 1 {
            return Err(TraceError::UnbalancedTrace {
                index: last - 1,
                reason: format!("{} call(s) never exit", stack.len() - 1),
            });
        }

        Ok(())
    }

    /// Number of events including the root frame
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when the trace holds nothing besides the root frame
    pub fn is_empty(&self) -> bool {
        self.events.len() <= 2
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event(&self, index: usize) -> Option<Event> {
        self.events.get(index).copied()
    }

    /// Events `start+1 ..= end`, the body of a pattern occurrence at `start`
    pub fn body(&self, start: usize, end: usize) -> &[Event] {
        let lo = (start + 1).min(self.events.len());
        let hi = (end + 1).clamp(lo, self.events.len());
        &self.events[lo..hi]
    }

    pub fn name(&self, symbol: Symbol) -> &str {
        self.names
            .get(symbol.index())
            .map(String::as_str)
            .unwrap_or("?")
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn symbol(&self, name: &str) -> Option<Symbol> {
        self.names
            .binary_search_by(|n| n.as_str().cmp(name))
            .ok()
            .map(|i| Symbol(i as u32))
    }

    /// Textual form of an event of this trace
    pub fn render_event(&self, event: Event) -> String {
        format!("{}:{}", event.kind, self.name(event.function))
    }

    pub fn render(&self, index: usize) -> Option<String> {
        self.event(index).map(|e| self.render_event(e))
    }
}

/// Read a comma-separated trace file
pub fn read_trace(path: impl AsRef<Path>) -> Result<Trace, TraceError> {
    let path = path.as_ref();
    debug!("Reading trace from: {}", path.display());

    let text = fs::read_to_string(path)?;
    Trace::from_raw(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_with_root() {
        let trace = Trace::from_entries(["enter:a", "exit:a"]).unwrap();
        assert_eq!(trace.len(), 4);
        assert_eq!(trace.render(0).unwrap(), "enter:root");
        assert_eq!(trace.render(1).unwrap(), "enter:a");
        assert_eq!(trace.render(3).unwrap(), "exit:root");
    }

    #[test]
    fn test_empty_input() {
        let trace = Trace::from_raw("").unwrap();
        assert_eq!(trace.len(), 2);
        assert!(trace.is_empty());
        assert_eq!(trace.render(0).unwrap(), Trace::empty().render(0).unwrap());
    }

    #[test]
    fn test_symbols_follow_name_order() {
        let trace = Trace::from_entries(["enter:zeta", "exit:zeta", "enter:alpha", "exit:alpha"])
            .unwrap();
        let alpha = trace.symbol("alpha").unwrap();
        let zeta = trace.symbol("zeta").unwrap();
        assert!(alpha < zeta);
        assert_eq!(trace.name(zeta), "zeta");
    }

    #[test]
    fn test_malformed_event_reports_index() {
        let err = Trace::from_raw("enter:a,oops,exit:a").unwrap_err();
        match err {
            TraceError::MalformedEvent { index, entry } => {
                assert_eq!(index, 1);
                assert_eq!(entry, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unbalanced_open_call() {
        let err = Trace::from_entries(["enter:a", "enter:b", "exit:b"]).unwrap_err();
        assert!(matches!(err, TraceError::UnbalancedTrace { .. }));
    }

    #[test]
    fn test_unbalanced_early_exit() {
        let err = Trace::from_entries(["exit:a", "enter:a"]).unwrap_err();
        match err {
            TraceError::UnbalancedTrace { index, .. } => assert_eq!(index, 0),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_mismatched_exit() {
        let err = Trace::from_entries(["enter:a", "enter:b", "exit:a", "exit:b"]).unwrap_err();
        match err {
            TraceError::UnbalancedTrace { index, .. } => assert_eq!(index, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_body_slice() {
        let trace = Trace::from_entries(["enter:a", "enter:b", "exit:b", "exit:a"]).unwrap();
        let body = trace.body(0, 4);
        assert_eq!(body.len(), 4);
        assert_eq!(trace.render_event(body[1]), "enter:b");
    }
}
