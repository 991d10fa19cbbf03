/// Scan pipeline core - domain model, status policies and matching services
///
/// Nothing in here talks to the network directly; services that need the
/// remote service are generic over the outbound ports.
pub mod domain;
pub mod policies;
pub mod services;
