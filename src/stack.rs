//! Stack snapshots taken when an error is created.
//!
//! Frames are symbolized with the [`backtrace`] crate and kept most recent
//! call first. Frames that belong to the symbolizer or to this crate's own
//! construction path are never part of a rendered trace.

use std::fmt::Write;
use std::path::Path;

use crate::config::DEFAULT_STACK_LIMIT;

/// Symbol prefixes of the symbolizer's own frames.
const SYMBOLIZER_PREFIXES: &[&str] = &["backtrace::", "<backtrace::"];

/// Fragments of this crate's symbols on the capture path.
const INTERNAL_MARKERS: &[&str] = &[
    "exterror::stack::",
    "exterror::location::",
    "exterror::error::ExtError",
    "<exterror::error::ExtError",
    "as exterror::traits::",
];

/// One symbolized stack frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Demangled function name without the symbol hash.
    pub name: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl Frame {
    /// True for frames that belong to the symbolizer or to this crate's capture path.
    pub fn is_internal(&self) -> bool {
        SYMBOLIZER_PREFIXES.iter().any(|prefix| self.name.starts_with(prefix))
            || INTERNAL_MARKERS.iter().any(|marker| self.name.contains(marker))
    }

    /// True when this frame points at `line` of a file whose path ends with `file`.
    pub fn is_at(&self, file: &str, line: u32) -> bool {
        self.line == Some(line) && self.is_in(file)
    }

    /// True when this frame's file path ends with `file`, compared component-wise.
    pub fn is_in(&self, file: &str) -> bool {
        match &self.file {
            Some(path) => Path::new(path).ends_with(file),
            None => false,
        }
    }
}

/// Symbolized frames of the current thread, most recent call first.
#[derive(Debug, Clone, Default)]
pub struct Frames {
    frames: Vec<Frame>,
}

impl Frames {
    /// Walks and symbolizes the current thread's stack.
    ///
    /// Inlined functions show up as separate frames. Frames that cannot be
    /// symbolized are skipped.
    #[inline(never)]
    pub fn capture() -> Self {
        let trace = backtrace::Backtrace::new();
        let mut frames = Vec::new();

        for frame in trace.frames() {
            for symbol in frame.symbols() {
                let Some(name) = symbol.name() else {
                    continue;
                };
                frames.push(Frame {
                    name: format!("{name:#}"),
                    file: symbol.filename().map(|path| path.display().to_string()),
                    line: symbol.lineno(),
                });
            }
        }

        Self { frames }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Index of the frame for the call site `file:line`.
    ///
    /// Prefers a non-internal frame at exactly that file and line. A call
    /// expression spread over several lines may be attributed to a
    /// neighbouring line, so the first non-internal frame in the same file is
    /// the second choice. Without either, the first non-internal frame is used.
    pub fn anchor(&self, file: &str, line: u32) -> Option<usize> {
        self.frames
            .iter()
            .position(|frame| !frame.is_internal() && frame.is_at(file, line))
            .or_else(|| self.frames.iter().position(|frame| !frame.is_internal() && frame.is_in(file)))
            .or_else(|| self.frames.iter().position(|frame| !frame.is_internal()))
    }

    /// Renders frames starting at `from`, truncated to at most `limit` bytes.
    ///
    /// Each frame is its function name followed, when known, by an indented
    /// `at file:line` line. Lines are separated by `\n` with no trailing newline.
    pub fn render(&self, from: usize, limit: usize) -> String {
        let mut out = String::with_capacity(limit.min(DEFAULT_STACK_LIMIT));

        for frame in self.frames.iter().skip(from) {
            if out.len() > limit {
                break;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&frame.name);
            if let Some(file) = &frame.file {
                let _ = write!(out, "\n    at {}:{}", file, frame.line.unwrap_or(0));
            }
        }

        truncate_at_boundary(&mut out, limit);
        out
    }
}

impl<'a> IntoIterator for &'a Frames {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Captures the caller's stack as text bounded to `limit` bytes.
///
/// The frames of this function and of the symbolizer are excluded, so the
/// first frame is the function that called `capture`.
#[inline(never)]
pub fn capture(limit: usize) -> String {
    let frames = Frames::capture();
    let from = frames.iter().position(|frame| !frame.is_internal()).unwrap_or(frames.len());
    frames.render(from, limit)
}

/// Captures the caller's stack with the default 4096 byte buffer.
#[inline(never)]
pub fn capture_default() -> String {
    capture(DEFAULT_STACK_LIMIT)
}

/// Shortens `text` to at most `limit` bytes without splitting a character.
pub(crate) fn truncate_at_boundary(text: &mut String, limit: usize) {
    if text.len() <= limit {
        return;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}
