//! Small shared helpers: path normalization for the file table and
//! C-style numeric parsing for the calculation passes.

pub mod numeric;
pub mod paths;
