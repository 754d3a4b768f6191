use std::path::PathBuf;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Debug)]
pub enum Error {
    ParseError { file: PathBuf, message: String },
    MalformedTypeRef { input: String, message: String },
    AmbiguousSymbol { key: String, projects: Vec<String> },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::ParseError { file, message } => {
                write!(f, "parse error in {}: {}", file.display(), message)
            }
            Error::MalformedTypeRef { input, message } => {
                write!(f, "malformed type reference `{}`: {}", input, message)
            }
            Error::AmbiguousSymbol { key, projects } => {
                write!(f, "type `{}` is declared more than once (projects: {})", key, projects.join(", "))
            }
        }
    }
}

impl std::error::Error for Error {}
