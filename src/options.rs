//! Configuration options for parsing and generation.
//!
//! - [`FormatOptions`]: main configuration struct
//! - [`LineEnding`]: line terminator written by the generator
//!
//! ## Examples
//!
//! ```rust
//! use tconf::{FormatOptions, LineEnding, Registry};
//!
//! let registry = Registry::new();
//!
//! // Windows line endings in generated text
//! let options = FormatOptions::new().with_line_ending(LineEnding::CrLf);
//! let generator = registry.generator_with_options(options);
//!
//! // Keep block headers as `Null` entries when parsing
//! let options = FormatOptions::new().with_block_headers(true);
//! let parser = registry.parser_with_options(options);
//! ```

/// Line terminator used by the generator.
///
/// The parser accepts both terminators regardless of this setting.
///
/// # Examples
///
/// ```rust
/// use tconf::LineEnding;
///
/// assert_eq!(LineEnding::Lf.as_str(), "\n");
/// assert_eq!(LineEnding::CrLf.as_str(), "\r\n");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Returns the string representation of this line ending.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Options shared by [`Parser`](crate::Parser) and [`Generator`](crate::Generator).
///
/// Indentation is fixed at [`INDENT_SIZE`](crate::format::INDENT_SIZE) spaces
/// and is not configurable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Terminator written after every generated line.
    pub line_ending: LineEnding,
    /// When set, every block header produces a `Null` entry carrying the
    /// comment written above it, mirroring what the generator accepts.
    pub record_block_headers: bool,
}

impl FormatOptions {
    /// Creates default options (`\n` line endings, block headers not recorded).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tconf::{FormatOptions, LineEnding};
    ///
    /// let options = FormatOptions::new();
    /// assert_eq!(options.line_ending, LineEnding::Lf);
    /// assert!(!options.record_block_headers);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the line ending used by the generator.
    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Controls whether the parser records block headers as `Null` entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tconf::FormatOptions;
    ///
    /// let options = FormatOptions::new().with_block_headers(true);
    /// assert!(options.record_block_headers);
    /// ```
    #[must_use]
    pub fn with_block_headers(mut self, record: bool) -> Self {
        self.record_block_headers = record;
        self
    }
}
