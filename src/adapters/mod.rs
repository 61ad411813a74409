pub mod presentation;
pub mod source;
