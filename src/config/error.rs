//! Errors raised while loading `seamless.toml`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{0}`")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("invalid TOML in `{path}`")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_read_error_names_file() {
        let err = ConfigError::Read(
            PathBuf::from("site/seamless.toml"),
            Error::new(ErrorKind::NotFound, "missing"),
        );
        assert_eq!(format!("{err}"), "cannot read config file `site/seamless.toml`");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_toml_error_keeps_parser_message() {
        let source = toml::from_str::<toml::Table>("[vocabulary").unwrap_err();
        let err = ConfigError::Toml {
            path: PathBuf::from("seamless.toml"),
            source,
        };
        assert_eq!(format!("{err}"), "invalid TOML in `seamless.toml`");
        assert!(err.source().is_some_and(|source| !source.to_string().is_empty()));
    }

    #[test]
    fn test_validation_message() {
        let err = ConfigError::Validation("[site.default_type] must not be empty".into());
        assert_eq!(
            format!("{err}"),
            "invalid configuration: [site.default_type] must not be empty"
        );
    }
}
