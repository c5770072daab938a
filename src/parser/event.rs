//! Call-trace events.
//!
//! A raw event is written `<enter|exit>:<functionName>`. Inside a [`Trace`](super::Trace)
//! function names are interned into [`Symbol`]s so events are small `Copy` keys
//! that can be hashed and compared cheaply during partitioning.

use std::fmt;
use std::str::FromStr;

/// Whether an event opens or closes a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Enter,
    Exit,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Enter => "enter",
            EventKind::Exit => "exit",
        }
    }
}

impl FromStr for EventKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enter" => Ok(EventKind::Enter),
            "exit" => Ok(EventKind::Exit),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interned function name
///
/// Symbols are assigned in name order, so comparing two symbols of the
/// same trace gives the same answer as comparing the names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(pub(crate) u32);

impl Symbol {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One enter or exit marker
///
/// Ordering is kind first (`Enter < Exit`) then function name, which matches
/// the ordering of the textual `enter:`/`exit:` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Event {
    pub kind: EventKind,
    pub function: Symbol,
}

impl Event {
    pub fn enter(function: Symbol) -> Self {
        Self {
            kind: EventKind::Enter,
            function,
        }
    }

    pub fn exit(function: Symbol) -> Self {
        Self {
            kind: EventKind::Exit,
            function,
        }
    }

    pub fn is_enter(&self) -> bool {
        self.kind == EventKind::Enter
    }

    /// Apply this event to a relative stack depth
    ///
    /// Returns `None` when an exit would leave the base of the stack.
    pub fn step_depth(&self, depth: usize) -> Option<usize> {
        match self.kind {
            EventKind::Enter => Some(depth + 1),
            EventKind::Exit => depth.checked_sub(1),
        }
    }
}

/// A parsed but not yet interned event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: EventKind,
    pub function: String,
}

/// Parse one `<enter|exit>:<name>` entry
///
/// Surrounding whitespace is ignored. Returns `None` for anything else,
/// including an empty function name.
pub fn parse_event(entry: &str) -> Option<RawEvent> {
    let (kind, name) = entry.trim().split_once(':')?;
    let kind = kind.parse::<EventKind>().ok()?;
    if name.is_empty() {
        return None;
    }

    Some(RawEvent {
        kind,
        function: name.to_string(),
    })
}
