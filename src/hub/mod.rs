//! USB hub control via `uhubctl`.

mod parser;
mod power;

pub use parser::{TopologyParseError, TopologyReadError, TopologyReader, parse_topology};
pub use power::{
    POWER_OFF_SETTLE, POWER_ON_SETTLE, PortCycleError, PortPowerCycler, PowerAction,
};
