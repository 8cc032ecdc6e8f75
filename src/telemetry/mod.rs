pub mod equipment;
pub mod generator;

pub use equipment::EquipmentProfile;
pub use generator::TelemetryGenerator;
