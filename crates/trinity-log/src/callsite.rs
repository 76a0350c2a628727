//! Call-site resolution and stack traces
//!
//! The file and line of a log call come from `#[track_caller]` and are exact.
//! The calling function's name, and the stack trace appended to critical
//! records, come from walking the stack with the `backtrace` crate.

use std::fmt;
use std::panic::Location;
use std::path::Path;

use backtrace::Symbol;

use crate::record::CallerContext;

/// Number of frames from [`walk`] up to the code that called a public
/// logging method:
///
/// ```text
/// 0: callsite::walk
/// 1: Logger::dispatch
/// 2: Logger::info (or any other public entry point)
/// 3: call site
/// ```
///
/// Every public entry point calls `Logger::dispatch` directly. Entry points
/// that go through an extra helper frame use [`CallSite::nested`].
pub const CALLER_FRAME_OFFSET: usize = 3;

/// Name suffix identifying the frame of [`walk`] in a resolved backtrace
const WALK_ANCHOR: &str = "callsite::walk";

pub(crate) const UNKNOWN_FUNCTION: &str = "<unknown>";

/// Functions that belong to the Rust runtime, thread start-up or the test
/// harness rather than to application code
const RUNTIME_PREFIXES: &[&str] = &[
    "std::rt::",
    "std::sys",
    "std::panicking::",
    "std::panic::",
    "std::thread::",
    "core::ops::function::",
    "test::",
    "__rust",
];

const RUNTIME_NAMES: &[&str] = &[
    "main",
    "_start",
    "__libc_start_main",
    "__libc_start_call_main",
    "start_thread",
    "clone",
    "clone3",
    "__clone",
    "BaseThreadInitThunk",
    "RtlUserThreadStart",
    UNKNOWN_FUNCTION,
];

/// Where a log call came from, and how deep the logging machinery is above it
#[derive(Debug, Clone, Copy)]
pub(crate) struct CallSite {
    location: &'static Location<'static>,
    depth: usize,
}

impl CallSite {
    /// Call site of the nearest caller that is not `#[track_caller]`
    #[track_caller]
    pub(crate) fn here() -> Self {
        Self {
            location: Location::caller(),
            depth: CALLER_FRAME_OFFSET,
        }
    }

    /// Account for `extra` helper frames between the public entry point and
    /// `Logger::dispatch`
    pub(crate) fn nested(self, extra: usize) -> Self {
        Self {
            depth: self.depth + extra,
            ..self
        }
    }

    pub(crate) fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

/// One resolved frame of a stack trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Demangled function path without the symbol hash
    pub function: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl StackFrame {
    fn from_symbol(symbol: &Symbol) -> Self {
        Self {
            function: symbol
                .name()
                .map(|name| format!("{name:#}"))
                .unwrap_or_else(|| UNKNOWN_FUNCTION.to_string()),
            file: symbol.filename().map(|path| path.display().to_string()),
            line: symbol.lineno(),
        }
    }

    /// Function name without its module path or closure suffixes
    pub fn short_name(&self) -> &str {
        short_name(&self.function)
    }

    /// Whether this frame belongs to the runtime rather than application code
    pub fn is_runtime(&self) -> bool {
        RUNTIME_NAMES.contains(&self.function.as_str())
            || RUNTIME_PREFIXES
                .iter()
                .any(|prefix| self.function.starts_with(prefix))
            || self.function.contains("as core::ops::function::Fn")
    }

    fn is_walk(&self) -> bool {
        self.function.ends_with(WALK_ANCHOR)
    }

    fn in_file(&self, file: &str) -> bool {
        self.file
            .as_deref()
            .is_some_and(|path| Path::new(path).ends_with(file))
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "  at {} ({}:{})", self.function, file, line),
            (Some(file), None) => write!(f, "  at {} ({})", self.function, file),
            _ => write!(f, "  at {}", self.function),
        }
    }
}

/// Application frames from a call site outward, innermost first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackTrace {
    frames: Vec<StackFrame>,
}

impl StackTrace {
    fn from_frames(frames: &[StackFrame]) -> Self {
        Self {
            frames: frames
                .iter()
                .filter(|frame| !frame.is_runtime())
                .cloned()
                .collect(),
        }
    }

    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in &self.frames {
            writeln!(f, "{frame}")?;
        }
        Ok(())
    }
}

/// Result of one stack walk: who called, and the trace from there outward
#[derive(Debug, Clone)]
pub(crate) struct Walk {
    pub(crate) caller: CallerContext,
    pub(crate) trace: StackTrace,
}

/// Raw frames of one stack capture, symbolized front to back on demand
struct Frames {
    raw: Vec<backtrace::Frame>,
    next_raw: usize,
    resolved: Vec<StackFrame>,
}

impl Frames {
    fn capture() -> Self {
        let mut raw = Vec::new();
        backtrace::trace(|frame| {
            raw.push(frame.clone());
            true
        });
        Self {
            raw,
            next_raw: 0,
            resolved: Vec::new(),
        }
    }

    /// Symbolize one more raw frame; `false` once all are done
    fn resolve_next(&mut self) -> bool {
        let Some(frame) = self.raw.get(self.next_raw) else {
            return false;
        };
        self.next_raw += 1;
        let resolved = &mut self.resolved;
        backtrace::resolve_frame(frame, |symbol| resolved.push(StackFrame::from_symbol(symbol)));
        true
    }

    /// Symbolize until the frame `depth` above [`walk`] is available
    fn resolve_through(&mut self, depth: usize) {
        loop {
            let anchor = self.resolved.iter().position(StackFrame::is_walk);
            if anchor.is_some_and(|index| self.resolved.len() > index + depth) {
                return;
            }
            if !self.resolve_next() {
                return;
            }
        }
    }

    fn resolve_all(&mut self) {
        while self.resolve_next() {}
    }
}

/// Resolve the caller of a public logging method, and the stack trace from
/// there outward when `with_trace` is set.
///
/// Frames are symbolized only as far as the caller unless the trace is
/// wanted or the caller can't be found there.
#[inline(never)]
pub(crate) fn walk(site: CallSite, with_trace: bool) -> Walk {
    let file = site.location.file();
    let line = site.location.line();

    let mut frames = Frames::capture();
    frames.resolve_through(site.depth);
    let offset = frames
        .resolved
        .iter()
        .position(StackFrame::is_walk)
        .map(|index| index + site.depth);

    // Only the offset frame is final before the whole stack is symbolized
    let mut caller_index =
        locate_caller(&frames.resolved, site.depth, file, line).filter(|&index| Some(index) == offset);
    if caller_index.is_none() || with_trace {
        frames.resolve_all();
    }
    if caller_index.is_none() {
        caller_index = locate_caller(&frames.resolved, site.depth, file, line);
    }

    let frames = frames.resolved;
    let function = caller_index
        .map(|index| frames[index].short_name().to_string())
        .unwrap_or_else(|| UNKNOWN_FUNCTION.to_string());
    let trace = if with_trace {
        let trace_from = caller_index
            .or(offset)
            .unwrap_or(0)
            .min(frames.len());
        StackTrace::from_frames(&frames[trace_from..])
    } else {
        StackTrace::default()
    };

    Walk {
        caller: CallerContext::new(file, function, line),
        trace,
    }
}

/// Index of the caller among `frames`.
///
/// The frame `depth` above [`walk`] wins when it lies in the caller's file,
/// or when it has a name but no file (release builds without line tables).
/// Otherwise (inlined frames) the first frame matching the caller's file
/// and line, then the first frame in the caller's file.
fn locate_caller(frames: &[StackFrame], depth: usize, file: &str, line: u32) -> Option<usize> {
    let anchor = frames.iter().position(StackFrame::is_walk);
    let search_from = anchor.map_or(0, |index| index + 1).min(frames.len());

    anchor
        .map(|index| index + depth)
        .filter(|&index| {
            frames.get(index).is_some_and(|frame| {
                frame.in_file(file) || (frame.file.is_none() && frame.function != UNKNOWN_FUNCTION)
            })
        })
        .or_else(|| {
            let rest = &frames[search_from..];
            rest.iter()
                .position(|frame| frame.in_file(file) && frame.line == Some(line))
                .or_else(|| rest.iter().position(|frame| frame.in_file(file)))
                .map(|offset| search_from + offset)
        })
}

fn short_name(path: &str) -> &str {
    let mut name = path;
    while let Some(stripped) = name.strip_suffix("::{{closure}}") {
        name = stripped;
    }
    name.rsplit("::").next().unwrap_or(name)
}
