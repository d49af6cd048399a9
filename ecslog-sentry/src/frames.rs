use sentry_core::protocol::Frame;

/// Function-name prefixes of the logging facade itself.
const FACADE_FUNCTION_PREFIXES: &[&str] = &["ecslog::", "ecslog_core::"];

/// Module path of this crate, whose frames describe the bridge rather than
/// the caller.
const BRIDGE_MODULE: &str = "ecslog_sentry";
const BRIDGE_MODULE_PREFIX: &str = "ecslog_sentry::";

/// Module suffix marking test code, which stays in reports.
const TEST_MODULE_SUFFIX: &str = "tests";

/// Removes the logging machinery's own frames from a captured stacktrace.
///
/// Frames produced by the facade and by this bridge describe how an entry
/// was logged, not why, so dropping them leaves the report pointing at
/// caller code. Frames from `tests` modules are kept so tests can assert on
/// their own frames. Frame order is preserved, an empty input stays empty,
/// and filtering an already filtered list changes nothing.
pub fn filter_frames(frames: Vec<Frame>) -> Vec<Frame> {
    frames
        .into_iter()
        .filter(|frame| !is_bridge_frame(frame))
        .collect()
}

fn is_bridge_frame(frame: &Frame) -> bool {
    if let Some(function) = frame.function.as_deref() {
        if FACADE_FUNCTION_PREFIXES
            .iter()
            .any(|prefix| function_starts_with(function, prefix))
        {
            return true;
        }
    }
    match frame_module(frame) {
        Some(module) => is_bridge_module(module) && !module.ends_with(TEST_MODULE_SUFFIX),
        None => false,
    }
}

/// The module path of a frame, taken from the frame itself or derived from
/// its function name by dropping the trailing path segment.
fn frame_module(frame: &Frame) -> Option<&str> {
    if let Some(module) = frame.module.as_deref() {
        return Some(module);
    }
    let function = frame.function.as_deref()?;
    function.rfind("::").map(|idx| &function[..idx])
}

fn is_bridge_module(module: &str) -> bool {
    module.trim_start_matches("_<").trim_start_matches('<') == BRIDGE_MODULE
        || function_starts_with(module, BRIDGE_MODULE_PREFIX)
}

/// Checks whether a function name starts with the given path prefix.
///
/// Symbolized trait implementations wrap the implementing type in `<...>`
/// or `_<...>` and may render `::` as `.`, so the wrapping is stripped and
/// dots are allowed to stand in for colons before the prefix test.
fn function_starts_with(function: &str, prefix: &str) -> bool {
    let function = function.trim_start_matches('<').trim_start_matches("_<");

    if !function.is_char_boundary(prefix.len()) {
        return false;
    }

    function
        .chars()
        .zip(prefix.chars())
        .all(|(f, p)| f == p || f == '.' && p == ':')
}
