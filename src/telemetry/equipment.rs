use crate::core::{ChannelSpec, NormalRange};
use crate::error::{Error, Result};
use serde::Serialize;

/// A simulated piece of hardware and the channels it reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentProfile {
    pub id: String,
    pub name: String,
    pub description: String,
    pub channels: Vec<ChannelSpec>,
}

pub type EquipmentProfileFactory = fn() -> EquipmentProfile;

// Wrapper for inventory collection
pub struct EquipmentProfileFactoryWrapper(pub EquipmentProfileFactory);

inventory::collect!(EquipmentProfileFactoryWrapper);

/// All registered profiles, sorted by id
pub fn catalog() -> Vec<EquipmentProfile> {
    let mut profiles = Vec::new();
    for wrapper in inventory::iter::<EquipmentProfileFactoryWrapper> {
        profiles.push((wrapper.0)());
    }
    profiles.sort_by(|a: &EquipmentProfile, b| a.id.cmp(&b.id));
    profiles
}

pub fn find(id: &str) -> Result<EquipmentProfile> {
    catalog()
        .into_iter()
        .find(|profile| profile.id == id)
        .ok_or_else(|| Error::UnknownEquipment(id.to_string()))
}

fn industrial_pump() -> EquipmentProfile {
    EquipmentProfile {
        id: "industrial-pump".to_string(),
        name: "Industrial Pump".to_string(),
        description: "Centrifugal pump with thermal, pressure and vibration sensing".to_string(),
        channels: vec![
            ChannelSpec::new("temperature", "Temperature", "°C", NormalRange::new(60.0, 80.0)),
            ChannelSpec::new("pressure", "Pressure", "PSI", NormalRange::new(100.0, 150.0)),
            ChannelSpec::new("vibration", "Vibration", "mm/s", NormalRange::new(0.5, 2.5)),
            ChannelSpec::new("flow-rate", "Flow Rate", "L/min", NormalRange::new(40.0, 60.0)),
        ],
    }
}

fn cnc_spindle() -> EquipmentProfile {
    EquipmentProfile {
        id: "cnc-spindle".to_string(),
        name: "CNC Spindle".to_string(),
        description: "Milling spindle drive".to_string(),
        channels: vec![
            ChannelSpec::new(
                "rotational-speed",
                "Rotational Speed",
                "RPM",
                NormalRange::new(1300.0, 2000.0),
            ),
            ChannelSpec::new("torque", "Torque", "Nm", NormalRange::new(20.0, 60.0)),
            ChannelSpec::new("tool-wear", "Tool Wear", "min", NormalRange::new(0.0, 200.0)),
            ChannelSpec::new(
                "process-temperature",
                "Process Temperature",
                "K",
                NormalRange::new(306.0, 312.0),
            ),
        ],
    }
}

fn power_unit() -> EquipmentProfile {
    EquipmentProfile {
        id: "power-unit".to_string(),
        name: "Power Unit".to_string(),
        description: "Motor power supply".to_string(),
        channels: vec![
            ChannelSpec::new("voltage", "Voltage", "V", NormalRange::new(220.0, 240.0)),
            ChannelSpec::new("current", "Current", "A", NormalRange::new(5.0, 15.0)),
            ChannelSpec::new("power", "Power Consumption", "kW", NormalRange::new(1.0, 3.5)),
        ],
    }
}

inventory::submit! { EquipmentProfileFactoryWrapper(industrial_pump) }
inventory::submit! { EquipmentProfileFactoryWrapper(cnc_spindle) }
inventory::submit! { EquipmentProfileFactoryWrapper(power_unit) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lists_builtin_profiles() {
        let ids: Vec<String> = catalog().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["cnc-spindle", "industrial-pump", "power-unit"]);
    }

    #[test]
    fn test_find() {
        let pump = find("industrial-pump").unwrap();
        assert_eq!(pump.channels.len(), 4);
        assert!(pump.channels.iter().all(|c| c.normal_range.min < c.normal_range.max));

        assert!(matches!(find("toaster"), Err(Error::UnknownEquipment(_))));
    }
}
