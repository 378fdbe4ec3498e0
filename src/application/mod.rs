// Application layer - Use cases and the ports they depend on
pub mod imaging_ports;
pub mod imaging_service;
