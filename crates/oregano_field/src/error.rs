//! Error types and result alias for the crate.
//!
//! Runtime operations on a field never fail; harvesting unknown ids or running
//! out of space are no-ops. Errors only come from rejecting a configuration.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_message_is_prefixed() {
        let err = Error::InvalidConfig("extent must be > 0".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: extent must be > 0"
        );
    }
}
