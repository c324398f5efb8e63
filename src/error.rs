//! Error types for the annotation-aware representer.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while representing or dumping a value.
///
/// Every variant is terminal for the current emit call.
#[derive(Debug, Error)]
pub enum Error {
    /// A skip predicate referenced by a property could not be instantiated.
    #[error("Cannot create an instance of {predicate} (property '{property}' of {type_name}): {source}")]
    Configuration {
        predicate: String,
        type_name: String,
        property: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Type metadata or a represented value violates the expected shape.
    #[error("Schema error in {type_name}.{property}: {message}")]
    Schema {
        type_name: String,
        property: String,
        message: String,
    },

    /// The node tree could not be written as YAML text.
    #[error("YAML emit error: {0}")]
    Emit(#[from] serde_yaml::Error),

    /// Writing output or reading a config file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn schema(
        type_name: impl Into<String>,
        property: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Schema {
            type_name: type_name.into(),
            property: property.into(),
            message: message.into(),
        }
    }

    /// Returns true for [`Error::Configuration`].
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }

    /// Returns true for [`Error::Schema`].
    pub fn is_schema(&self) -> bool {
        matches!(self, Error::Schema { .. })
    }
}
