//! Trigger detection for mention completion
//!
//! A trigger run is the trigger character (`+` for communities) followed by
//! zero or more non-whitespace characters. The trigger does not have to start a
//! word: in `a+b` the run is `+b`. Scanning resumes after the end of each run,
//! so `+foo+bar` is a single run.
//!
//! All offsets are character offsets into the composer text, not byte offsets.

use serde::{Deserialize, Serialize};

/// Span of text in the composer, in character offsets (`end` exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A collapsed selection (plain caret)
    pub fn caret(offset: usize) -> Self {
        Self { start: offset, end: offset }
    }

    /// Whether this selection touches `[start, end]`, inclusive on both ends
    ///
    /// Inclusive so that a caret sitting directly after a run still counts as
    /// being inside it.
    fn touches(&self, start: usize, end: usize) -> bool {
        self.start <= end && self.end >= start
    }
}

/// Trigger character a provider reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerPattern {
    pub trigger: char,
}

impl TriggerPattern {
    pub const COMMUNITY: Self = Self { trigger: '+' };

    pub fn new(trigger: char) -> Self {
        Self { trigger }
    }
}

/// The trigger run under the caret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    /// Text typed after the trigger character
    pub query_text: String,
    /// Span of the whole run, trigger character included
    pub range: SelectionRange,
}

/// Find the trigger run containing the selection
///
/// Returns `None` when no run touches the selection. A run with nothing typed
/// after the trigger is only returned when `force` is set; `force` never turns
/// text without a trigger into a match.
pub fn detect_trigger(
    text: &str,
    pattern: TriggerPattern,
    selection: SelectionRange,
    force: bool,
) -> Option<TriggerMatch> {
    let chars: Vec<char> = text.chars().collect();

    let mut i = 0;
    while i < chars.len() {
        if chars[i] != pattern.trigger {
            i += 1;
            continue;
        }

        let start = i;
        let end = run_end(&chars, start + 1);
        if selection.touches(start, end) {
            let query_text: String = chars[start + 1..end].iter().collect();
            if !query_text.is_empty() || force {
                return Some(TriggerMatch {
                    query_text,
                    range: SelectionRange::new(start, end),
                });
            }
        }
        i = end;
    }

    None
}

fn run_end(chars: &[char], from: usize) -> usize {
    let mut end = from;
    while end < chars.len() && !chars[end].is_whitespace() {
        end += 1;
    }
    end
}
