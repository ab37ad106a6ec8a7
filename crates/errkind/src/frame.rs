//! Call-stack capture
//!
//! [`capture`] walks the current stack with the `backtrace` crate, drops its
//! own frames plus `skip` callers, and resolves at most `max_depth` frames to
//! `(function, file, line)` triples, outermost call first in the window,
//! i.e. the call site closest to `capture` comes first.
//!
//! ```text
//! backtrace::trace ... capture | skip frames ... | frame 0, frame 1, ... frame depth-1
//!                      ^ located by symbol address
//! ```

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Instant;

use crate::config::MAX_DEPTH;

/// Raw frames walked beyond `skip + max_depth`, to cover the unwinder's own
/// frames that sit above [`capture`].
const TRACE_SLACK: usize = 32;

/// Function name recorded when a location has no symbol.
const UNKNOWN_FUNCTION: &str = "<unknown>";

/// One resolved call-stack location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Demangled function path without the hash suffix
    pub function: String,
    /// Source file, empty when debug info is unavailable
    pub file: String,
    /// Source line, 0 when debug info is unavailable
    pub line: u32,
}

impl Frame {
    fn unknown() -> Self {
        Self {
            function: UNKNOWN_FUNCTION.to_string(),
            file: String::new(),
            line: 0,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.function, self.file, self.line)
    }
}

/// An immutable, cheaply cloned sequence of frames.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Frames(Arc<[Frame]>);

impl Frames {
    /// An empty sequence (capture throttled or disabled).
    pub fn empty() -> Self {
        Self::default()
    }
}

impl Deref for Frames {
    type Target = [Frame];

    fn deref(&self) -> &[Frame] {
        &self.0
    }
}

impl From<Vec<Frame>> for Frames {
    fn from(frames: Vec<Frame>) -> Self {
        Self(frames.into())
    }
}

impl fmt::Debug for Frames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for frame in self.0.iter() {
            list.entry(&format_args!("{}", frame));
        }
        list.finish()
    }
}

/// Capture up to `max_depth` frames, skipping `skip` frames above this
/// function's own caller chain.
///
/// `skip == 0` makes the caller of `capture` the first frame. `max_depth`
/// is clamped to [`MAX_DEPTH`]. A stack location without any resolvable
/// symbol is kept as an `<unknown>` frame.
#[inline(never)]
pub fn capture(skip: usize, max_depth: usize) -> Frames {
    let max_depth = max_depth.min(MAX_DEPTH);
    if max_depth == 0 {
        return Frames::empty();
    }
    let started = Instant::now();

    let limit = skip.saturating_add(max_depth + TRACE_SLACK);
    let mut raw = Vec::with_capacity(max_depth + TRACE_SLACK);
    backtrace::trace(|frame| {
        raw.push(frame.clone());
        raw.len() < limit
    });

    let start = own_frame_index(&raw).map_or(0, |idx| idx + 1).saturating_add(skip);

    let resolved = raw.iter().skip(start).map(|raw_frame| {
        let mut symbols = Vec::new();
        backtrace::resolve_frame(raw_frame, |symbol| symbols.push(resolve(symbol)));
        symbols
    });
    let frames = window(resolved, max_depth);

    tracing::trace!(frames = frames.len(), elapsed = ?started.elapsed(), "captured frames");
    frames.into()
}

/// Flatten per-location symbol lists into at most `max_depth` frames.
///
/// Inlined calls resolve to several symbols for one location; a location
/// with none becomes a single `<unknown>` frame.
fn window<I>(locations: I, max_depth: usize) -> Vec<Frame>
where
    I: IntoIterator<Item = Vec<Frame>>,
{
    let mut frames = Vec::with_capacity(max_depth);
    for symbols in locations {
        if symbols.is_empty() {
            frames.push(Frame::unknown());
        } else {
            frames.extend(symbols);
        }
        if frames.len() >= max_depth {
            frames.truncate(max_depth);
            break;
        }
    }
    frames
}

/// Index of [`capture`]'s own frame in a raw trace.
///
/// Symbol addresses are exact on most platforms; fall back to symbol names
/// where the unwinder only reports instruction pointers.
fn own_frame_index(raw: &[backtrace::Frame]) -> Option<usize> {
    let marker = capture as usize;
    if let Some(idx) = raw.iter().position(|f| f.symbol_address() as usize == marker) {
        return Some(idx);
    }

    raw.iter().position(|f| {
        let mut hit = false;
        backtrace::resolve_frame(f, |symbol| {
            if let Some(name) = symbol.name() {
                hit |= format!("{:#}", name).ends_with("frame::capture");
            }
        });
        hit
    })
}

fn resolve(symbol: &backtrace::Symbol) -> Frame {
    Frame {
        function: symbol
            .name()
            .map(|n| format!("{:#}", n))
            .unwrap_or_else(|| UNKNOWN_FUNCTION.to_string()),
        file: symbol
            .filename()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        line: symbol.lineno().unwrap_or(0),
    }
}
