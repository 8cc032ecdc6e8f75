pub mod importance;
pub mod status;

pub use importance::{feature_importance, normalize, separability};
pub use status::StatusClassifier;
