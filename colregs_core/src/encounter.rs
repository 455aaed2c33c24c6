//! Encounter classification (COLREGs Rules 13–15) from own-ship's frame.
//!
//! # Evaluation order (first match wins)
//! 1. Range beyond `safe_distance` → SAFE
//! 2. Dead-ahead sector AND near-reciprocal course → HEAD_ON
//! 3. Stern sector AND own-ship faster → OVERTAKING
//! 4. (optional) own-ship in the target's stern sector AND target faster → OVERTAKEN
//! 5. Starboard bow sector → CROSSING_GIVE_WAY
//! 6. Port bow sector → CROSSING_STAND_ON
//! 7. Otherwise → SAFE (no defined encounter)
//!
//! Classification is directional: `classify(a, b)` and `classify(b, a)` are
//! independent evaluations.

use crate::{
    config::{ConfigWarning, EncounterConfig, Sector, ANGLE_EPSILON},
    error::{ColregsError, Result},
    geometry::{self, MIN_RANGE},
    types::{EncounterSituation, EncounterType, VesselState},
};

/// Classifies the encounter between own-ship and one target.
#[derive(Clone, Debug)]
pub struct EncounterClassifier {
    config: EncounterConfig,
    dead_ahead: Sector,
}

impl Default for EncounterClassifier {
    fn default() -> Self {
        let config = EncounterConfig::default();
        Self {
            dead_ahead: config.dead_ahead_sector(),
            config,
        }
    }
}

fn check_vessel(role: &str, v: &VesselState) -> Result<()> {
    if !(v.position.x.is_finite() && v.position.y.is_finite()) {
        return Err(ColregsError::input(format!("{role} position must be finite")));
    }
    if !v.heading.is_finite() {
        return Err(ColregsError::input(format!("{role} heading must be finite")));
    }
    if !v.speed.is_finite() || v.speed < 0.0 {
        return Err(ColregsError::input(format!(
            "{role} speed must be finite and >= 0, got {}",
            v.speed
        )));
    }
    Ok(())
}

impl EncounterClassifier {
    /// Build a classifier, rejecting malformed configuration.
    pub fn new(config: EncounterConfig) -> Result<Self> {
        Self::with_warnings(config).map(|(classifier, _)| classifier)
    }

    /// Like [`EncounterClassifier::new`], also returning the sector overlap
    /// findings from the same validation pass.
    pub fn with_warnings(config: EncounterConfig) -> Result<(Self, Vec<ConfigWarning>)> {
        let warnings = config.validate()?;
        let classifier = Self {
            dead_ahead: config.dead_ahead_sector(),
            config,
        };
        Ok((classifier, warnings))
    }

    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }

    /// Classify the target from own-ship's point of view.
    ///
    /// Coincident positions are not an error: the range is reported as 0 and
    /// the type as SAFE, since no bearing exists.
    pub fn classify(&self, own: &VesselState, target: &VesselState) -> Result<EncounterSituation> {
        check_vessel("own-ship", own)?;
        check_vessel("target", target)?;

        let distance = geometry::distance(&own.position, &target.position);
        let relative_course = geometry::relative_course(own.heading, target.heading);

        if distance < MIN_RANGE {
            tracing::debug!(relative_course, "coincident positions, bearing undefined");
            return Ok(EncounterSituation {
                encounter_type: EncounterType::Safe,
                relative_bearing: 0.0,
                relative_course,
                distance: 0.0,
                aspect_angle: 0.0,
            });
        }

        let relative_bearing =
            geometry::relative_bearing(&own.position, own.heading, &target.position);
        let aspect_angle =
            geometry::aspect_angle(target.heading, &own.position, &target.position);

        let encounter_type = if distance > self.config.safe_distance {
            EncounterType::Safe
        } else {
            self.encounter_type(
                relative_bearing,
                relative_course,
                aspect_angle,
                own.speed,
                target.speed,
            )
        };

        tracing::debug!(
            %encounter_type,
            relative_bearing,
            relative_course,
            distance,
            "classified encounter"
        );

        Ok(EncounterSituation {
            encounter_type,
            relative_bearing,
            relative_course,
            distance,
            aspect_angle,
        })
    }

    /// Classify both directions: (own-ship's view, target's view).
    pub fn classify_pair(
        &self,
        own: &VesselState,
        target: &VesselState,
    ) -> Result<(EncounterSituation, EncounterSituation)> {
        Ok((self.classify(own, target)?, self.classify(target, own)?))
    }

    fn encounter_type(
        &self,
        bearing: f64,
        course: f64,
        aspect: f64,
        own_speed: f64,
        target_speed: f64,
    ) -> EncounterType {
        let c = &self.config;
        let reciprocal =
            (course - 180.0).abs() <= c.reciprocal_course_tolerance + ANGLE_EPSILON;

        if self.dead_ahead.contains(bearing) && reciprocal {
            EncounterType::HeadOn
        } else if c.stern_sector.contains(bearing) && own_speed > target_speed {
            EncounterType::Overtaking
        } else if c.infer_overtaken && c.stern_sector.contains(aspect) && target_speed > own_speed
        {
            EncounterType::Overtaken
        } else if c.starboard_bow.contains(bearing) {
            EncounterType::CrossingGiveWay
        } else if c.port_bow.contains(bearing) {
            EncounterType::CrossingStandOn
        } else {
            EncounterType::Safe
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn classifier(safe_distance: f64) -> EncounterClassifier {
        EncounterClassifier::new(EncounterConfig::default().with_safe_distance(safe_distance))
            .unwrap()
    }

    /// Target placed at `bearing` (deg, relative to a north-bound own-ship).
    fn at_bearing(bearing: f64, range: f64, heading: f64, speed: f64) -> VesselState {
        let b = bearing.to_radians();
        VesselState::new(range * b.sin(), range * b.cos(), heading, speed)
    }

    #[test]
    fn head_on() {
        let own = VesselState::new(0.0, 0.0, 0.0, 10.0);
        let ts = VesselState::new(0.0, 2000.0, 180.0, 10.0);
        let s = classifier(3000.0).classify(&own, &ts).unwrap();
        assert_eq!(s.encounter_type, EncounterType::HeadOn);
        assert_abs_diff_eq!(s.relative_bearing, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.relative_course, 180.0, epsilon = 1e-9);
    }

    #[test]
    fn crossing_give_way_scenario() {
        let own = VesselState::new(0.0, 0.0, 0.0, 10.0);
        let ts = VesselState::new(1000.0, 500.0, 270.0, 12.0);
        let s = EncounterClassifier::default().classify(&own, &ts).unwrap();
        assert_eq!(s.encounter_type, EncounterType::CrossingGiveWay);
        assert_abs_diff_eq!(s.relative_bearing, 63.43, epsilon = 0.01);
        assert_abs_diff_eq!(s.distance, 1118.03, epsilon = 0.01);
    }

    #[test]
    fn crossing_stand_on() {
        let own = VesselState::new(0.0, 0.0, 0.0, 10.0);
        let ts = VesselState::new(-1000.0, 1000.0, 90.0, 12.0);
        let s = classifier(3000.0).classify(&own, &ts).unwrap();
        assert_eq!(s.encounter_type, EncounterType::CrossingStandOn);
        assert!(s.relative_bearing > 247.5 && s.relative_bearing < 355.0);
    }

    #[test]
    fn overtaking_requires_own_ship_faster() {
        let own = VesselState::new(0.0, 1000.0, 0.0, 15.0);
        let ts = VesselState::new(0.0, 0.0, 0.0, 8.0);
        let c = classifier(3000.0);
        let s = c.classify(&own, &ts).unwrap();
        assert_eq!(s.encounter_type, EncounterType::Overtaking);
        assert_abs_diff_eq!(s.relative_bearing, 180.0, epsilon = 1e-9);

        let slow = VesselState { speed: 5.0, ..own };
        assert_eq!(c.classify(&slow, &ts).unwrap().encounter_type, EncounterType::Safe);
    }

    #[test]
    fn faster_target_abaft_the_beam_is_not_overtaking() {
        let own = VesselState::new(0.0, 0.0, 0.0, 10.0);
        let ts = VesselState::new(1732.0, -1000.0, 0.0, 15.0);
        let s = classifier(3000.0).classify(&own, &ts).unwrap();
        assert_abs_diff_eq!(s.relative_bearing, 120.0, epsilon = 0.01);
        assert_eq!(s.encounter_type, EncounterType::Safe);
    }

    #[test]
    fn overtaken_inferred_from_target_frame() {
        let mut cfg = EncounterConfig::default();
        cfg.infer_overtaken = true;
        let c = EncounterClassifier::new(cfg).unwrap();
        // Faster target ahead on the same course: own-ship is in its stern sector
        let own = VesselState::new(0.0, 0.0, 0.0, 8.0);
        let ts = VesselState::new(0.0, 1000.0, 0.0, 15.0);
        let (mine, theirs) = c.classify_pair(&own, &ts).unwrap();
        assert_eq!(mine.encounter_type, EncounterType::Overtaken);
        assert_eq!(theirs.encounter_type, EncounterType::Overtaking);

        // Disabled by default
        let s = EncounterClassifier::default().classify(&own, &ts).unwrap();
        assert_eq!(s.encounter_type, EncounterType::Safe);
    }

    #[test]
    fn out_of_range_is_safe_but_observable() {
        let own = VesselState::new(0.0, 0.0, 0.0, 10.0);
        let ts = VesselState::new(5000.0, 0.0, 180.0, 10.0);
        let s = classifier(3000.0).classify(&own, &ts).unwrap();
        assert_eq!(s.encounter_type, EncounterType::Safe);
        assert_abs_diff_eq!(s.distance, 5000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.relative_bearing, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn coincident_positions_are_not_an_error() {
        let own = VesselState::new(10.0, 10.0, 0.0, 10.0);
        let ts = VesselState::new(10.0, 10.0, 90.0, 5.0);
        let s = EncounterClassifier::default().classify(&own, &ts).unwrap();
        assert_eq!(s.encounter_type, EncounterType::Safe);
        assert_eq!(s.distance, 0.0);
        assert_abs_diff_eq!(s.relative_course, 90.0, epsilon = 1e-12);
    }

    #[test]
    fn negative_speed_rejected() {
        let own = VesselState::new(0.0, 0.0, 0.0, -1.0);
        let ts = VesselState::new(0.0, 100.0, 0.0, 5.0);
        let c = EncounterClassifier::default();
        assert!(matches!(c.classify(&own, &ts), Err(ColregsError::InvalidInput(_))));
        assert!(c.classify(&ts, &own).is_err());
    }

    #[test]
    fn every_bearing_maps_to_its_sector() {
        let c = EncounterClassifier::default();
        let own = VesselState::new(0.0, 0.0, 0.0, 10.0);
        for i in 0..720 {
            let b = i as f64 * 0.5;
            // Crossing course, slower target: head-on and overtaken cannot fire
            let ts = at_bearing(b, 1000.0, 90.0, 5.0);
            let s = c.classify(&own, &ts).unwrap();
            let expected = if b > 5.0 && b < 112.5 {
                EncounterType::CrossingGiveWay
            } else if (112.5..=247.5).contains(&b) {
                EncounterType::Overtaking
            } else if b > 247.5 && b < 355.0 {
                EncounterType::CrossingStandOn
            } else {
                EncounterType::Safe
            };
            assert_eq!(s.encounter_type, expected, "bearing {b}");
        }
    }

    #[test]
    fn boundaries_fall_on_documented_side() {
        let c = EncounterClassifier::default();
        let own = VesselState::new(0.0, 0.0, 0.0, 10.0);

        // 112.5° belongs to the stern sector, not the starboard bow
        let ts = at_bearing(112.5, 1000.0, 90.0, 12.0);
        assert_eq!(c.classify(&own, &ts).unwrap().encounter_type, EncounterType::Safe);
        let ts = at_bearing(112.4, 1000.0, 90.0, 12.0);
        assert_eq!(
            c.classify(&own, &ts).unwrap().encounter_type,
            EncounterType::CrossingGiveWay
        );

        // 247.5° belongs to the stern sector, not the port bow
        let ts = at_bearing(247.5, 1000.0, 90.0, 5.0);
        assert_eq!(c.classify(&own, &ts).unwrap().encounter_type, EncounterType::Overtaking);
        let ts = at_bearing(247.6, 1000.0, 90.0, 5.0);
        assert_eq!(
            c.classify(&own, &ts).unwrap().encounter_type,
            EncounterType::CrossingStandOn
        );

        // Just off the bow: starboard sector starts after 5°
        let ts = at_bearing(5.7, 1000.0, 270.0, 10.0);
        assert_eq!(
            c.classify(&own, &ts).unwrap().encounter_type,
            EncounterType::CrossingGiveWay
        );
    }

    #[test]
    fn head_on_sector_and_course_tolerance() {
        let c = EncounterClassifier::default();
        let own = VesselState::new(0.0, 0.0, 0.0, 10.0);

        // Dead-ahead wraps through north
        let ts = at_bearing(355.0, 1000.0, 180.0, 10.0);
        assert_eq!(c.classify(&own, &ts).unwrap().encounter_type, EncounterType::HeadOn);
        let ts = at_bearing(6.0, 1000.0, 180.0, 10.0);
        assert_eq!(c.classify(&own, &ts).unwrap().encounter_type, EncounterType::HeadOn);

        // Course tolerance is inclusive at 12°
        let ts = at_bearing(0.0, 1000.0, 168.0, 10.0);
        assert_eq!(c.classify(&own, &ts).unwrap().encounter_type, EncounterType::HeadOn);
        let ts = at_bearing(0.0, 1000.0, 192.0, 10.0);
        assert_eq!(c.classify(&own, &ts).unwrap().encounter_type, EncounterType::HeadOn);
        let ts = at_bearing(0.0, 1000.0, 167.0, 10.0);
        assert_eq!(c.classify(&own, &ts).unwrap().encounter_type, EncounterType::Safe);

        // Just outside the dead-ahead sector on the starboard side
        let ts = at_bearing(6.5, 1000.0, 180.0, 10.0);
        assert_eq!(
            c.classify(&own, &ts).unwrap().encounter_type,
            EncounterType::CrossingGiveWay
        );
    }

    #[test]
    fn crossing_roles_are_complementary_at_defaults() {
        let c = EncounterClassifier::default();
        let own = VesselState::new(0.0, 0.0, 0.0, 10.0);
        let ts = VesselState::new(1000.0, 1000.0, 270.0, 12.0);
        let (mine, theirs) = c.classify_pair(&own, &ts).unwrap();
        assert_eq!(mine.encounter_type, EncounterType::CrossingGiveWay);
        assert_eq!(theirs.encounter_type, EncounterType::CrossingStandOn);
        assert_abs_diff_eq!(mine.aspect_angle, theirs.relative_bearing, epsilon = 1e-9);
    }

    #[test]
    fn rotated_frame_gives_same_result() {
        let c = EncounterClassifier::default();
        let own = VesselState::new(0.0, 0.0, 90.0, 10.0);
        // Heading east, the starboard bow lies to the south-east
        let ts = VesselState::new(500.0, -1000.0, 0.0, 12.0);
        let s = c.classify(&own, &ts).unwrap();
        assert_abs_diff_eq!(s.relative_bearing, 63.43, epsilon = 0.01);
        assert_eq!(s.encounter_type, EncounterType::CrossingGiveWay);
    }
}
