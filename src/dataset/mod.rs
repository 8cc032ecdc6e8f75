pub mod loader;
pub mod record;

pub use loader::{from_csv_reader, load_file};
pub use record::{Dataset, Label, Record, FAILURE_LABEL, NORMAL_LABEL, PREDICTION_FIELD};
