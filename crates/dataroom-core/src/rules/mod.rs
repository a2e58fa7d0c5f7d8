pub mod invariants;
pub mod naming;
pub mod validation;

pub use naming::{normalize_name, validate_name, NameRejection};
pub use validation::validate_state;
