pub mod completeness;
pub mod document;
pub mod handlers;
