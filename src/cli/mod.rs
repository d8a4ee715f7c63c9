//! Thin command wrappers around the library core. All formatting lives
//! here; the core returns values and findings only.

pub mod check;
pub mod order;
pub mod validate;
