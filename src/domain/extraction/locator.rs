//! Recovery of a JSON payload embedded in free-form model output.
//!
//! Models often wrap their answer in commentary, or emit scratch objects before
//! the final one. [`PayloadLocator`] isolates the heuristic that picks the
//! payload so it can be replaced (e.g. for a model with a native structured
//! output mode) without touching parsing or validation.

/// Strategy for finding the JSON payload inside a model response.
pub trait PayloadLocator: Send + Sync {
    /// Returns the slice of `output` holding the payload, if any.
    fn locate<'a>(&self, output: &'a str) -> Option<&'a str>;
}

/// Selects the last brace-balanced `{...}` span in the output.
///
/// Spans are found left to right and never overlap; a `{` that is never closed
/// is skipped. Braces inside JSON string literals are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastJsonObject;

impl PayloadLocator for LastJsonObject {
    fn locate<'a>(&self, output: &'a str) -> Option<&'a str> {
        object_spans(output).last().map(|&(start, end)| &output[start..end])
    }
}

/// Treats the whole (trimmed) output as the payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeOutput;

impl PayloadLocator for WholeOutput {
    fn locate<'a>(&self, output: &'a str) -> Option<&'a str> {
        let trimmed = output.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Byte ranges of every non-overlapping balanced object, in order.
pub(crate) fn object_spans(s: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(offset) = s[pos..].find('{') {
        let start = pos + offset;
        match balanced_end(s, start) {
            Some(end) => {
                spans.push((start, end));
                pos = end;
            }
            None => pos = start + 1,
        }
    }

    spans
}

/// End (exclusive) of the object opening at `start`, if it closes.
fn balanced_end(s: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}
