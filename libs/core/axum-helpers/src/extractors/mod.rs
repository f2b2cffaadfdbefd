//! Extractors that reject with [`AppError`](crate::errors::AppError) JSON bodies.

pub mod uuid_path;
pub mod validated_json;

pub use uuid_path::{NestedUuidPath, UuidPath};
pub use validated_json::{ValidatedJson, ValidatedOptionalJson};
