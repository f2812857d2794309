//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the crate.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// The metadata source has no metadata for a requested class.
    #[from(ignore)]
    #[display("No metadata found for class {class}.")]
    NoMetadataFound {
        /// The class that was requested.
        class: String,
    },

    /// A property declares more than one type, so no single schema can be inferred.
    #[from(ignore)]
    #[display(
        "Property {class}::{property} defines more than one type. \
         Add a manual override to specify the one that should be documented."
    )]
    TypeInferenceAmbiguous {
        /// The declaring class.
        class: String,
        /// The property name.
        property: String,
    },

    /// A collection property has no inferable element type.
    #[from(ignore)]
    #[display(
        "Property {class}::{property} is a collection, but its element type isn't \
         specified. Add a manual override to make it explicit."
    )]
    TypeInferenceMissing {
        /// The declaring class.
        class: String,
        /// The property name.
        property: String,
    },

    /// A primitive kind that cannot be represented in a schema.
    #[from(ignore)]
    #[display(
        "Type \"{kind}\" is not supported in {class}::{property}. \
         Add a manual override to specify the schema manually."
    )]
    UnsupportedType {
        /// The declaring class.
        class: String,
        /// The property name.
        property: String,
        /// The offending type name.
        kind: String,
    },

    /// A merge source carries a key the target node kind does not declare.
    #[from(ignore)]
    #[display("Unknown key \"{key}\" while merging into {path}.")]
    UnknownMergeKey {
        /// Provenance path of the target node.
        path: String,
        /// The unrecognized key.
        key: String,
    },

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_conversion() {
        // Test that String defaults to General
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_no_metadata_display() {
        let err = AppError::NoMetadataFound {
            class: "App\\User".into(),
        };
        assert_eq!(format!("{}", err), "No metadata found for class App\\User.");
    }

    #[test]
    fn test_unknown_merge_key_display() {
        let err = AppError::UnknownMergeKey {
            path: "#/info".into(),
            key: "banana".into(),
        };
        assert!(format!("{}", err).contains("banana"));
        assert!(format!("{}", err).contains("#/info"));
    }
}
