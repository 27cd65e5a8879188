//! Maneuver arithmetic.
//!
//! A maneuver succeeds when the propulsion fired delivers at least
//! `difficulty * mass` thrust. Variable-duration profiles let the operator
//! trade time for difficulty through an integer duration modifier; every chain
//! that flies a maneuver goes through [`adjust_maneuver`] so the tradeoff is
//! applied the same way everywhere.

use crate::ids::ComponentId;
use crate::snapshot::{ComponentKind, LookupError, ManeuverProfile, Snapshot};

/// Effective duration and difficulty of a profile after modification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManeuverTiming {
    pub duration: u32,
    pub difficulty: u32,
}

/// Apply a duration modifier to a profile's base duration and difficulty.
///
/// A non-negative modifier `m` stretches the flight by a factor of `m + 1`
/// and divides difficulty by the same factor, rounding up. A negative
/// modifier compresses the flight by a factor of `1 - m` (rounding duration
/// up) and multiplies difficulty by it. Raising the modifier never raises
/// both duration and difficulty.
pub fn adjust_maneuver(base_duration: u32, base_difficulty: u32, modifier: i32) -> ManeuverTiming {
    if modifier >= 0 {
        let factor = modifier as u32 + 1;
        ManeuverTiming {
            duration: base_duration.saturating_mul(factor),
            difficulty: base_difficulty.div_ceil(factor),
        }
    } else {
        let factor = modifier.unsigned_abs() + 1;
        ManeuverTiming {
            duration: base_duration.div_ceil(factor),
            difficulty: base_difficulty.saturating_mul(factor),
        }
    }
}

/// Timing of a profile flown with `modifier`.
///
/// Fixed-duration profiles ignore the modifier; their duration is zero and
/// their difficulty is the printed one.
pub fn profile_timing(profile: &ManeuverProfile, modifier: i32) -> ManeuverTiming {
    let difficulty = profile.difficulty.unwrap_or(0);
    match profile.duration {
        Some(duration) => adjust_maneuver(duration, difficulty, modifier),
        None => ManeuverTiming {
            duration: 0,
            difficulty,
        },
    }
}

/// Thrust required to move `mass` through a maneuver of `difficulty`.
pub fn required_thrust(difficulty: u32, mass: u32) -> u32 {
    difficulty.saturating_mul(mass)
}

/// Whether a profile can be flown in the snapshot's current year.
///
/// Profiles without a slingshot window are always open. A windowed profile is
/// open in `first_year` and every `interval` years after it.
pub fn is_profile_open(snapshot: &Snapshot, profile: &ManeuverProfile) -> Result<bool, LookupError> {
    let Some(window_id) = &profile.slingshot else {
        return Ok(true);
    };
    let window = snapshot.window(window_id)?;
    if snapshot.year < window.first_year {
        return Ok(false);
    }
    let elapsed = snapshot.year - window.first_year;
    if window.interval == 0 {
        return Ok(elapsed == 0);
    }
    Ok(elapsed % window.interval == 0)
}

/// How a propulsion component turns flight time into thrust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrustRule {
    /// Fires once, delivering its thrust whatever the duration.
    SingleBurn(u32),
    /// Delivers thrust every year of the flight.
    PerYear(u32),
}

impl ThrustRule {
    /// The rule for a component kind, if it produces thrust at all.
    pub fn for_kind(kind: &ComponentKind) -> Option<Self> {
        match kind {
            ComponentKind::Rocket { thrust } => Some(ThrustRule::SingleBurn(*thrust)),
            ComponentKind::IonThruster { thrust_per_year } => {
                Some(ThrustRule::PerYear(*thrust_per_year))
            }
            _ => None,
        }
    }

    /// Thrust delivered over a flight of `years`.
    pub fn thrust_over(self, years: u32) -> u32 {
        match self {
            ThrustRule::SingleBurn(thrust) => thrust,
            ThrustRule::PerYear(per_year) => per_year.saturating_mul(years),
        }
    }
}

/// Total thrust delivered by `components` over a flight of `years`.
///
/// Components that are not propulsion contribute nothing.
pub fn total_thrust(
    snapshot: &Snapshot,
    components: &[ComponentId],
    years: u32,
) -> Result<u32, LookupError> {
    let mut total: u32 = 0;
    for id in components {
        let definition = snapshot.definition_of(id)?;
        if let Some(rule) = ThrustRule::for_kind(&definition.kind) {
            total = total.saturating_add(rule.thrust_over(years));
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::WindowId;
    use crate::snapshot::ManeuverWindow;
    use crate::tests::fixtures::SnapshotBuilder;

    #[test]
    fn test_zero_modifier_is_identity() {
        assert_eq!(
            adjust_maneuver(3, 5, 0),
            ManeuverTiming {
                duration: 3,
                difficulty: 5
            }
        );
    }

    #[test]
    fn test_slowing_down_halves_difficulty_rounding_up() {
        assert_eq!(
            adjust_maneuver(1, 3, 1),
            ManeuverTiming {
                duration: 2,
                difficulty: 2
            }
        );
        assert_eq!(
            adjust_maneuver(2, 3, 2),
            ManeuverTiming {
                duration: 6,
                difficulty: 1
            }
        );
    }

    #[test]
    fn test_speeding_up_raises_difficulty() {
        assert_eq!(
            adjust_maneuver(4, 2, -1),
            ManeuverTiming {
                duration: 2,
                difficulty: 4
            }
        );
        assert_eq!(
            adjust_maneuver(1, 2, -2),
            ManeuverTiming {
                duration: 1,
                difficulty: 6
            }
        );
    }

    #[test]
    fn test_adjust_never_raises_both() {
        for base_duration in 0..6 {
            for base_difficulty in 0..9 {
                for modifier in -5..6 {
                    let lower = adjust_maneuver(base_duration, base_difficulty, modifier - 1);
                    let upper = adjust_maneuver(base_duration, base_difficulty, modifier);
                    assert!(
                        !(upper.duration > lower.duration && upper.difficulty > lower.difficulty),
                        "modifier {} raised both for ({}, {})",
                        modifier,
                        base_duration,
                        base_difficulty
                    );
                    assert!(upper.duration >= lower.duration);
                    assert!(upper.difficulty <= lower.difficulty);
                }
            }
        }
    }

    #[test]
    fn test_fixed_duration_profile_ignores_modifier() {
        let profile = ManeuverProfile {
            difficulty: Some(4),
            ..Default::default()
        };
        assert_eq!(
            profile_timing(&profile, 3),
            ManeuverTiming {
                duration: 0,
                difficulty: 4
            }
        );
    }

    #[test]
    fn test_thrust_rules_differ_by_kind() {
        assert_eq!(ThrustRule::SingleBurn(4).thrust_over(0), 4);
        assert_eq!(ThrustRule::SingleBurn(4).thrust_over(3), 4);
        assert_eq!(ThrustRule::PerYear(5).thrust_over(0), 0);
        assert_eq!(ThrustRule::PerYear(5).thrust_over(3), 15);
        assert_eq!(ThrustRule::for_kind(&ComponentKind::Probe), None);
    }

    #[test]
    fn test_total_thrust_sums_rockets_and_ion_thrusters() {
        let snapshot = SnapshotBuilder::new()
            .rocket_definition("juno", 4, 1)
            .ion_definition("ion", 5, 1)
            .probe_definition("probe", 1)
            .agency("nasa", 0)
            .component("nasa", "r1", "juno")
            .component("nasa", "i1", "ion")
            .component("nasa", "p1", "probe")
            .build();

        let ids = [
            ComponentId::new("r1"),
            ComponentId::new("i1"),
            ComponentId::new("p1"),
        ];
        assert_eq!(total_thrust(&snapshot, &ids, 2).unwrap(), 14);
        assert_eq!(total_thrust(&snapshot, &ids, 0).unwrap(), 4);
        assert_eq!(total_thrust(&snapshot, &[], 2).unwrap(), 0);
        assert!(total_thrust(&snapshot, &[ComponentId::new("missing")], 1).is_err());
    }

    #[test]
    fn test_slingshot_window_opens_on_interval() {
        let mut snapshot = SnapshotBuilder::new().build();
        snapshot.maneuver_windows.insert(
            WindowId::new("jupiter"),
            ManeuverWindow {
                first_year: 1960,
                interval: 4,
            },
        );
        let profile = ManeuverProfile {
            slingshot: Some(WindowId::new("jupiter")),
            ..Default::default()
        };

        snapshot.year = 1956;
        assert!(!is_profile_open(&snapshot, &profile).unwrap());
        snapshot.year = 1960;
        assert!(is_profile_open(&snapshot, &profile).unwrap());
        snapshot.year = 1962;
        assert!(!is_profile_open(&snapshot, &profile).unwrap());
        snapshot.year = 1968;
        assert!(is_profile_open(&snapshot, &profile).unwrap());
    }

    #[test]
    fn test_undefined_window_is_a_lookup_error() {
        let snapshot = SnapshotBuilder::new().build();
        let profile = ManeuverProfile {
            slingshot: Some(WindowId::new("venus")),
            ..Default::default()
        };
        assert_eq!(
            is_profile_open(&snapshot, &profile).unwrap_err(),
            LookupError::Window(WindowId::new("venus"))
        );
    }
}
