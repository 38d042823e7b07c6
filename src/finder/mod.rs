pub mod dialog;
pub mod format;
pub mod handler;
pub mod normalize;
pub mod query;
pub mod validate;
