extern crate log;
pub mod geofile;
pub mod region;
pub mod telemetry;
