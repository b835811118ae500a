//! Network helpers: port specs, private address checks and host ranges

pub mod address;
pub mod ports;

pub use address::{is_private_ipv4, private_range_for, Ipv4Range};
pub use ports::{
    parse_port_range, parse_port_range_with, service_name, ParseMode, PortRangeError, PortSet,
};
