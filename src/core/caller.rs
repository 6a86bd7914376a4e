//! Call-site resolution
//!
//! Walks the current stack and returns the first frame that belongs neither
//! to this crate nor to the runtime. The number of unwinder frames sitting
//! above the walker is measured once per process and reused.

use once_cell::sync::OnceCell;
use serde::Serialize;
use std::fmt;

/// Maximum number of logical frames examined per walk
pub const MAXIMUM_CALLER_DEPTH: usize = 25;

/// Packages whose frames are never reported as the call site
const RUNTIME_PACKAGES: &[&str] = &["std", "core", "alloc", "backtrace"];

/// Name of the frame walker, located by name during calibration
const WALKER_NAME: &str = "capture_frames";

static MINIMUM_CALLER_DEPTH: OnceCell<usize> = OnceCell::new();

/// A resolved call site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caller {
    /// Top-level path segment of the function (the crate)
    pub package: String,
    /// Demangled function path without hash suffix
    pub function: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl Caller {
    /// `file:line`, or just the file when the line is unknown
    pub fn location(&self) -> Option<String> {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => Some(format!("{}:{}", file, line)),
            (Some(file), None) => Some(file.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location() {
            Some(location) => write!(f, "{} ({})", self.function, location),
            None => write!(f, "{}", self.function),
        }
    }
}

struct RawFrame {
    function: String,
    file: Option<String>,
    line: Option<u32>,
}

/// The crate this resolver is compiled into
pub fn logger_package() -> &'static str {
    package_of(module_path!())
}

/// Top-level path segment of a demangled symbol.
///
/// Handles trait-impl forms such as `<krate::Type as Trait>::method` by
/// taking the self type's crate.
pub fn package_of(symbol: &str) -> &str {
    let mut name = symbol.trim_start_matches(['<', '&', '*']);
    for prefix in ["dyn ", "mut ", "const "] {
        name = name.trim_start_matches(prefix);
    }
    let end = name
        .find(|c: char| c == ':' || c == '<' || c == ' ' || c == '>')
        .unwrap_or(name.len());
    &name[..end]
}

/// Resolve the first stack frame outside this crate.
///
/// Returns `None` when the stack is exhausted or no frame carries symbol
/// information; that is a valid outcome, not an error.
#[inline(never)]
pub fn resolve_caller() -> Option<Caller> {
    let skip = *MINIMUM_CALLER_DEPTH.get_or_init(calibrate);
    let own = logger_package();

    capture_frames(skip, MAXIMUM_CALLER_DEPTH)
        .into_iter()
        .find(|frame| {
            let package = package_of(&frame.function);
            !package.is_empty() && package != own && !RUNTIME_PACKAGES.contains(&package)
        })
        .map(|frame| Caller {
            package: package_of(&frame.function).to_string(),
            function: frame.function,
            file: frame.file,
            line: frame.line,
        })
}

/// Count the unwinder frames above the walker
fn calibrate() -> usize {
    let own = logger_package();
    capture_frames(0, MAXIMUM_CALLER_DEPTH)
        .iter()
        .position(|frame| {
            package_of(&frame.function) == own && frame.function.contains(WALKER_NAME)
        })
        .map_or(0, |index| index + 1)
}

#[inline(never)]
fn capture_frames(skip: usize, limit: usize) -> Vec<RawFrame> {
    let mut frames = Vec::with_capacity(limit.min(16));
    let mut index = 0usize;

    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if index >= skip && frames.len() < limit {
                frames.push(RawFrame {
                    function: symbol
                        .name()
                        .map(|name| format!("{:#}", name))
                        .unwrap_or_default(),
                    file: symbol.filename().map(|path| path.display().to_string()),
                    line: symbol.lineno(),
                });
            }
            index += 1;
        });
        frames.len() < limit
    });

    frames
}
