//! Identifier newtypes for snapshot entities.
//!
//! The engine names every entity with a string. Wrapping each kind in its own
//! type keeps a spacecraft id from being passed where a component id belongs.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an id from anything string-like.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// An operator-controlled agency.
    AgencyId
);
string_id!(
    /// A spacecraft owned by an agency.
    SpacecraftId
);
string_id!(
    /// A single component instance (a specific rocket, astronaut, ...).
    ComponentId
);
string_id!(
    /// A component definition, shared by every instance of that component.
    DefinitionId
);
string_id!(
    /// A location on the maneuver graph.
    LocationId
);
string_id!(
    /// An advancement an agency can research.
    AdvancementId
);
string_id!(
    /// A mission card.
    MissionId
);
string_id!(
    /// A recurring maneuver window (slingshot opportunity).
    WindowId
);
string_id!(
    /// A maneuver edge, named `<origin>_to_<destination>`.
    ManeuverId
);

impl ManeuverId {
    /// Build the id of the maneuver from `origin` to `destination`.
    pub fn between(origin: &LocationId, destination: &LocationId) -> Self {
        Self(format!("{}_to_{}", origin, destination))
    }

    /// Split the id back into its origin and destination.
    ///
    /// Location ids may themselves contain underscores, so the split happens
    /// at the first `_to_` separator.
    pub fn endpoints(&self) -> Option<(LocationId, LocationId)> {
        let (origin, destination) = self.0.split_once("_to_")?;
        if origin.is_empty() || destination.is_empty() {
            return None;
        }
        Some((LocationId::new(origin), LocationId::new(destination)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maneuver_id_round_trips_endpoints() {
        let origin = LocationId::new("earth");
        let destination = LocationId::new("suborbital_flight");
        let id = ManeuverId::between(&origin, &destination);
        assert_eq!(id.as_str(), "earth_to_suborbital_flight");
        assert_eq!(id.endpoints(), Some((origin, destination)));
    }

    #[test]
    fn test_malformed_maneuver_id_has_no_endpoints() {
        assert_eq!(ManeuverId::new("earth").endpoints(), None);
        assert_eq!(ManeuverId::new("_to_mars").endpoints(), None);
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = SpacecraftId::new("s1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"s1\"");
        let back: SpacecraftId = serde_json::from_str("\"s1\"").unwrap();
        assert_eq!(back, id);
    }
}
