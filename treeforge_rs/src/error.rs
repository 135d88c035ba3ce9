/// Error type for normalization and parsing.
#[derive(Debug)]
pub enum TreeError {
    /// No usable content after normalization.
    EmptyInput,
    /// First line cannot be interpreted as a root directory.
    MissingRoot,
    /// IO error
    Io(std::io::Error),
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::EmptyInput => {
                write!(f, "no valid content found in tree structure")
            }
            TreeError::MissingRoot => {
                write!(f, "invalid tree format: root directory not found")
            }
            TreeError::Io(e) => {
                write!(f, "IO error: {}", e)
            }
        }
    }
}

impl std::error::Error for TreeError {}

impl From<std::io::Error> for TreeError {
    fn from(e: std::io::Error) -> Self {
        TreeError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_empty_input() {
        let err = TreeError::EmptyInput;
        assert_eq!(format!("{}", err), "no valid content found in tree structure");
    }

    #[test]
    fn test_display_missing_root() {
        let err = TreeError::MissingRoot;
        assert_eq!(
            format!("{}", err),
            "invalid tree format: root directory not found"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TreeError = io_err.into();
        assert!(matches!(err, TreeError::Io(_)));
        assert!(format!("{}", err).contains("IO error"));
    }
}
