pub mod local_zone;

pub use local_zone::LocalZoneHandler;
