//! Error types for the parse → layout → render pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can surface from a single conversion call.
///
/// Only the input-level variants originate in this crate; codec and
/// filesystem failures are wrapped unchanged so callers can inspect them.
#[derive(Error, Debug)]
pub enum Error {
    /// The input text was blank or contained only whitespace.
    #[error("input is empty or contains no non-blank lines")]
    EmptyInput,

    /// A color specification could not be parsed.
    #[error("unsupported color format: {0:?}")]
    UnsupportedColorFormat(String),

    /// A JSON theme or option document was malformed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Resampling or RGB encoding failed.
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    /// Indexed-palette PNG encoding failed.
    #[error("png encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Writing the output file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::EmptyInput.to_string(),
            "input is empty or contains no non-blank lines"
        );
        let e = Error::UnsupportedColorFormat("#12".into());
        assert_eq!(e.to_string(), "unsupported color format: \"#12\"");
    }

    #[test]
    fn test_io_error_converts() {
        fn fails() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(Error::Io(_))));
    }
}
