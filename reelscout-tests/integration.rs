//! Integration tests for Reelscout
//!
//! These tests drive a `SearchController` end to end against the scripted,
//! demo, and HTTP catalogs. They cover response ordering, user-visible
//! scenarios, and the OMDb wire contract.

#[path = "integration/controller_races.rs"]
mod controller_races;

#[path = "integration/demo_scenarios.rs"]
mod demo_scenarios;

#[path = "integration/omdb_contract.rs"]
mod omdb_contract;
