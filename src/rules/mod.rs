//! Derived facts over the snapshot.
//!
//! This module contains the arithmetic and membership rules the resolver
//! applies on top of plain lookups: spacecraft mass, thrust accumulation,
//! maneuver timing, and what a spacecraft carries.

pub mod location;
pub mod maneuver;
pub mod spacecraft;

pub use location::{location_has_sample, location_has_supplies, surveyable_locations};
pub use maneuver::{
    ManeuverTiming, ThrustRule, adjust_maneuver, is_profile_open, profile_timing,
    required_thrust, total_thrust,
};
pub use spacecraft::{
    astronaut_ids, has_healthy_specialist, has_supplies, has_working_probe_or_capsule,
    idle_spacecraft, is_component_on_spacecraft, propulsion_ids, sort_component_ids,
    spacecraft_mass, spacecraft_of_component,
};
