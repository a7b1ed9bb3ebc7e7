pub use crate::collections::{DynList, ListError, TryReserveError};
pub use crate::dynlist;
