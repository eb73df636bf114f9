use log::warn;

use crate::Error;

/// Running count of failed operations, with their messages.
///
/// The fixture operations in this crate do not stop at the first failure.
/// Each failure increments the count and appends a line to the message, and
/// the operation continues with a zero value in place of the failed result.
/// Check the tally once a sequence of operations is done.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorTally {
    count: usize,
    message: String,
}

impl ErrorTally {
    /// An empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of errors recorded.
    pub fn count(&self) -> usize {
        self.count
    }

    /// True if no errors have been recorded.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The recorded error messages, one per line.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Record an error.
    pub fn record(&mut self, error: &Error) {
        warn!("{error}");
        self.count += 1;
        self.message.push_str(&error.to_string());
        self.message.push('\n');
    }

    /// Unwrap a result, recording the error and substituting the zero value
    /// of `T` on failure.
    pub fn check<T: Default>(&mut self, result: Result<T, Error>) -> T {
        result.unwrap_or_else(|e| {
            self.record(&e);
            T::default()
        })
    }

    /// Convert into a `Result`, failing if any error was recorded.
    pub fn into_result(self) -> Result<(), ErrorTally> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ErrorTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.count {
            1 => write!(f, "1 error occurred:\n{}", self.message.trim_end()),
            n => write!(f, "{n} errors occurred:\n{}", self.message.trim_end()),
        }
    }
}

impl std::error::Error for ErrorTally {}
