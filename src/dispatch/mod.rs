//! Dispatch-and-template core.
//!
//! [`Dispatcher`] decodes a stored function configuration, selects the
//! matching strategy, and wraps strategy failures with the function name and
//! the captured error chain. [`template::format`] performs the `{key}`
//! expansion every strategy uses.

mod dispatcher;
mod error;
pub mod template;

pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use template::TemplateError;

/// Maximum number of characters of an expanded prompt or statement that is
/// written to the log.
const LOG_PREVIEW_CHARS: usize = 200;

/// Returns at most the first 200 characters of `text` for logging.
pub(crate) fn log_preview(text: &str) -> &str {
    text.char_indices()
        .nth(LOG_PREVIEW_CHARS)
        .and_then(|(end, _)| text.get(..end))
        .unwrap_or(text)
}
