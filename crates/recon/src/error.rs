use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (no sources, bad primary, impossible detail).
    ConfigValidation(String),
    /// A referenced source name (the primary, in particular) is not
    /// configured.
    UnknownSource(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::UnknownSource(name) => write!(f, "unknown source: {name}"),
        }
    }
}

impl std::error::Error for ReconError {}
