use anyhow::Result;
use roam_lab_abstract::{RoutingProtocol, SweepParameter};

/// Map a user-visible routing name to the protocol enum.
pub fn routing_by_name(name: &str) -> Result<RoutingProtocol> {
    match name.to_ascii_lowercase().as_str() {
        "olsr" => Ok(RoutingProtocol::Olsr),
        "aodv" => Ok(RoutingProtocol::Aodv),
        other => anyhow::bail!("Unknown routing protocol '{other}'. Try 'olsr' or 'aodv'."),
    }
}

/// Map a user-visible sweep name to the parameter enum.
pub fn sweep_by_name(name: &str) -> Result<SweepParameter> {
    let parameter = match name {
        "wifi-rate" | "wifi_data_rate" => SweepParameter::WifiDataRate,
        "csma-rate" | "csma_data_rate" => SweepParameter::CsmaDataRate,
        "app-rate" | "app_data_rate" => SweepParameter::AppDataRate,
        "speed" | "robot_speed" => SweepParameter::RobotSpeed,
        other => anyhow::bail!(
            "Unknown sweep parameter '{other}'. Try 'wifi-rate', 'csma-rate', 'app-rate' or 'speed'."
        ),
    };
    Ok(parameter)
}
