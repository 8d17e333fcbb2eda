//! Document intake: the uploaded artifact and its routing category

pub mod classifier;
pub mod document;

pub use classifier::{guess_media_type, Classification, DocumentKind, TypeClassifier};
pub use document::UploadedDocument;
