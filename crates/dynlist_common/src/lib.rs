//! Common building blocks shared by the dynlist crates, currently the collections.

pub mod collections;
pub mod prelude;
