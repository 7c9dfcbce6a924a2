#[cfg(test)]
mod tests {
    use glam::DVec2;

    use crate::commands::SimCommand;
    use crate::config::{default_catalogue, Tuning};
    use crate::constants::*;
    use crate::enums::*;
    use crate::error::ConfigError;
    use crate::events::SimEvent;
    use crate::state::FrameSnapshot;
    use crate::types::{step_towards, Circle, EntityId, Rect, SimTime};

    // ---- Tuning ----

    #[test]
    fn test_default_tuning_is_valid() {
        let tuning = Tuning::default();
        tuning.validate().unwrap();
        assert_eq!(tuning.bullet_types.len(), 3);
        assert_eq!(tuning.bullet_types[0].pattern, ShootPattern::Direct);
        assert_eq!(tuning.bullet_types[1].pattern, ShootPattern::Spread);
        assert_eq!(tuning.bullet_types[2].pattern, ShootPattern::Guided);
    }

    #[test]
    fn test_only_alt_types_support_alt() {
        let catalogue = default_catalogue();
        assert!(!catalogue[0].supports_alt());
        assert!(catalogue[1].supports_alt());
        assert!(catalogue[2].supports_alt());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json_str(r#"{ "max_energy": 20.0, "starting_energy": 5.0 }"#)
            .unwrap();
        assert_eq!(tuning.max_energy, 20.0);
        assert_eq!(tuning.starting_energy, 5.0);
        assert_eq!(tuning.energy_regen_rate, DEFAULT_ENERGY_REGEN);
        assert_eq!(tuning.bullet_types, default_catalogue());
    }

    #[test]
    fn test_bullet_type_json_override() {
        let json = r#"{
            "bullet_types": [
                { "name": "Lance", "pattern": "Direct", "speed": 5.0, "rate_of_fire": 0.5 }
            ]
        }"#;
        let tuning = Tuning::from_json_str(json).unwrap();
        assert_eq!(tuning.bullet_types.len(), 1);
        let lance = &tuning.bullet_types[0];
        assert_eq!(lance.name, "Lance");
        assert_eq!(lance.speed, 5.0);
        assert!(lance.pooled, "unspecified fields fall back to defaults");
        assert!(lance.alt.is_none());
    }

    #[test]
    fn test_empty_catalogue_rejected() {
        let err = Tuning::from_json_str(r#"{ "bullet_types": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err}");
    }

    #[test]
    fn test_guided_without_timers_rejected() {
        let json = r#"{ "bullet_types": [ { "name": "Broken", "pattern": "Guided" } ] }"#;
        let err = Tuning::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("guided"), "got {err}");
    }

    #[test]
    fn test_negative_speed_rejected() {
        let json = r#"{ "bullet_types": [ { "name": "Back", "speed": -1.0 } ] }"#;
        let err = Tuning::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("Back.speed"), "got {err}");
    }

    #[test]
    fn test_starting_energy_above_max_rejected() {
        let json = r#"{ "max_energy": 2.0, "starting_energy": 3.0 }"#;
        assert!(matches!(
            Tuning::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Tuning::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    // ---- Geometry ----

    #[test]
    fn test_category_mask() {
        let mask = CategoryMask::ENEMY | CategoryMask::DESTROY_ZONE;
        assert!(mask.contains(TargetCategory::Enemy));
        assert!(mask.contains(TargetCategory::DestroyZone));
        assert!(!mask.contains(TargetCategory::RangeLimit));
        assert!(CategoryMask::NONE.is_empty());
        assert!(CategoryMask::ALL.contains(TargetCategory::RangeLimit));
    }

    #[test]
    fn test_circle_contains_boundary() {
        let c = Circle::new(DVec2::new(1.0, 1.0), 2.0);
        assert!(c.contains(DVec2::new(3.0, 1.0)));
        assert!(!c.contains(DVec2::new(3.1, 1.0)));
    }

    #[test]
    fn test_rect_from_any_corners() {
        let r = Rect::from_corners(DVec2::new(2.0, -1.0), DVec2::new(-2.0, 1.0));
        assert_eq!(r.min, DVec2::new(-2.0, -1.0));
        assert_eq!(r.max, DVec2::new(2.0, 1.0));
        assert!(r.contains(DVec2::ZERO));
        assert!(!r.contains(DVec2::new(0.0, 1.5)));
    }

    #[test]
    fn test_step_towards_never_overshoots() {
        let from = DVec2::ZERO;
        let to = DVec2::new(3.0, 4.0);
        assert_eq!(step_towards(from, to, 1.0), DVec2::new(0.6, 0.8));
        assert_eq!(step_towards(from, to, 10.0), to);
        assert_eq!(step_towards(to, to, 1.0), to);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..TICK_RATE {
            time.advance();
        }
        assert_eq!(time.tick, TICK_RATE as u64);
        assert!((time.elapsed_secs - 1.0).abs() < 1e-9);
    }

    // ---- Wire shapes ----

    #[test]
    fn test_command_is_tagged() {
        let cmd = SimCommand::SelectBulletType { index: 2 };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains(r#""type":"SelectBulletType""#), "got {json}");
        let back: SimCommand = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, SimCommand::SelectBulletType { index: 2 }));
    }

    #[test]
    fn test_snapshot_with_events_serializes() {
        let snapshot = FrameSnapshot {
            events: vec![
                SimEvent::ProjectileResolved {
                    projectile: EntityId(7),
                    cause: ResolveCause::Expired,
                    position: DVec2::new(1.0, 2.0),
                },
                SimEvent::PlaySound {
                    name: SOUND_EXPLODE.into(),
                    position: DVec2::ZERO,
                },
            ],
            ..Default::default()
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: FrameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.events, snapshot.events);
    }
}
