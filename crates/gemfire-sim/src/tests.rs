//! Tests for the simulation engine: firing, pooling, guidance, resolution.

use glam::DVec2;

use gemfire_core::commands::{InputFrame, SimCommand};
use gemfire_core::components::{Projectile, Target};
use gemfire_core::config::{AltFire, BulletType, GuidedParams, MiniBurst, Tuning};
use gemfire_core::enums::*;
use gemfire_core::events::SimEvent;
use gemfire_core::state::FrameSnapshot;

use crate::engine::{SimConfig, SimulationEngine};
use crate::entity_id;
use crate::projectile::SubPoolMember;
use crate::systems::contacts::CollisionEvent;

// ---- Helpers ----

fn engine_with(bullet_types: Vec<BulletType>) -> SimulationEngine {
    SimulationEngine::new(SimConfig {
        seed: 7,
        tuning: Tuning {
            bullet_types,
            ..Tuning::default()
        },
    })
}

fn started(mut engine: SimulationEngine) -> SimulationEngine {
    engine.queue_command(SimCommand::StartSession);
    engine
}

fn aim_right(fire: bool, alt_fire: bool) -> InputFrame {
    InputFrame {
        fire,
        alt_fire,
        aim: DVec2::new(10.0, 0.0),
    }
}

fn count(snap: &FrameSnapshot, pred: impl Fn(&SimEvent) -> bool) -> usize {
    snap.events.iter().filter(|e| pred(e)).count()
}

fn resolved_with(snap: &FrameSnapshot, cause: ResolveCause) -> bool {
    snap.events
        .iter()
        .any(|e| matches!(e, SimEvent::ProjectileResolved { cause: c, .. } if *c == cause))
}

fn guided(tracking_secs: f64, life_secs: f64) -> BulletType {
    BulletType {
        name: "Guided".into(),
        pattern: ShootPattern::Guided,
        speed: 6.0,
        range: 100.0,
        rate_of_fire: 0.0,
        trail: TrailKind::Trail,
        effect_radius: 1.0,
        guided: Some(GuidedParams {
            tracking_secs,
            life_secs,
        }),
        ..BulletType::default()
    }
}

/// Tick with fire held until the first shot leaves, then release.
fn fire_once(engine: &mut SimulationEngine, input: InputFrame) -> FrameSnapshot {
    engine.set_input(input);
    for _ in 0..600 {
        let snap = engine.tick();
        if count(&snap, |e| matches!(e, SimEvent::ShotFired { .. })) > 0 {
            engine.set_input(InputFrame::default());
            return snap;
        }
    }
    panic!("no shot fired");
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let make = || {
        let mut engine = started(SimulationEngine::new(SimConfig {
            seed: 12345,
            ..Default::default()
        }));
        engine.queue_command(SimCommand::SelectBulletType { index: 1 });
        engine.spawn_range_targets(6);
        engine.set_input(aim_right(true, true));
        engine
    };
    let mut engine_a = make();
    let mut engine_b = make();

    for _ in 0..300 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds_diverge() {
    let make = |seed| {
        let mut engine = started(SimulationEngine::new(SimConfig {
            seed,
            ..Default::default()
        }));
        engine.queue_command(SimCommand::SelectBulletType { index: 1 });
        engine.set_input(aim_right(true, false));
        engine
    };
    let mut engine_a = make(111);
    let mut engine_b = make(222);

    let mut diverged = false;
    for _ in 0..120 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "spread shots should differ between seeds");
}

// ---- Session control ----

#[test]
fn test_setup_phase_does_not_tick() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.set_input(aim_right(true, false));
    for _ in 0..30 {
        let snap = engine.tick();
        assert_eq!(snap.phase, GamePhase::Setup);
        assert_eq!(snap.time.tick, 0);
        assert!(snap.projectiles.is_empty());
    }
}

#[test]
fn test_pause_freezes_projectiles() {
    let mut engine = started(engine_with(vec![BulletType::default()]));
    let snap = fire_once(&mut engine, aim_right(true, false));
    let before = snap.projectiles[0].position;

    engine.queue_command(SimCommand::Pause);
    for _ in 0..10 {
        let snap = engine.tick();
        assert_eq!(snap.phase, GamePhase::Paused);
        assert_eq!(snap.projectiles[0].position, before);
    }

    engine.queue_command(SimCommand::Resume);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert!(snap.projectiles[0].position.x > before.x);
}

#[test]
fn test_select_invalid_index_keeps_selection() {
    let mut engine = started(SimulationEngine::new(SimConfig::default()));
    engine.tick();
    engine.queue_command(SimCommand::SelectBulletType { index: 42 });
    let snap = engine.tick();
    assert_eq!(snap.emitter.bullet_type, 0);
    assert_eq!(count(&snap, |e| matches!(e, SimEvent::BulletTypeChanged { .. })), 0);
}

#[test]
fn test_cycle_wraps_around_catalogue() {
    let mut engine = started(SimulationEngine::new(SimConfig::default()));
    engine.tick();
    let types = engine.tuning().bullet_types.len();
    for expected in (1..types).chain(std::iter::once(0)) {
        engine.queue_command(SimCommand::CycleBulletType);
        let snap = engine.tick();
        assert_eq!(snap.emitter.bullet_type, expected);
        assert_eq!(
            snap.emitter.bullet_name,
            engine.tuning().bullet_types[expected].name
        );
    }
}

#[test]
fn test_move_caster_moves_muzzle_and_region() {
    let mut engine = started(engine_with(vec![BulletType::default()]));
    engine.queue_command(SimCommand::MoveCaster {
        position: DVec2::new(2.0, 3.0),
    });
    let snap = fire_once(
        &mut engine,
        InputFrame {
            fire: true,
            alt_fire: false,
            aim: DVec2::new(12.0, 3.0),
        },
    );
    assert_eq!(snap.emitter.caster_position, DVec2::new(2.0, 3.0));
    let p = &snap.projectiles[0];
    assert!((p.position.y - 3.0).abs() < 1e-9);
    assert!(p.position.x > 2.0);
}

// ---- Direct fire ----

#[test]
fn test_direct_velocity_includes_speed_bonus() {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: 1,
        tuning: Tuning {
            caster: gemfire_core::config::CasterTuning {
                speed_bonus: 2.0,
                ..Default::default()
            },
            bullet_types: vec![BulletType {
                speed: 5.0,
                ..BulletType::default()
            }],
            ..Tuning::default()
        },
    });
    engine.queue_command(SimCommand::StartSession);
    let snap = fire_once(&mut engine, aim_right(true, false));

    assert_eq!(snap.projectiles.len(), 1);
    let v = snap.projectiles[0].velocity;
    assert!((v - DVec2::new(7.0, 0.0)).length() < 1e-12);
}

#[test]
fn test_direct_out_of_range_fizzles_and_returns_to_pool() {
    let mut engine = started(engine_with(vec![BulletType::default()]));
    fire_once(&mut engine, aim_right(true, false));

    let mut fizzled = None;
    for _ in 0..120 {
        let snap = engine.tick();
        if resolved_with(&snap, ResolveCause::OutOfRange) {
            fizzled = Some(snap);
            break;
        }
    }
    let snap = fizzled.expect("projectile should leave the range");
    let position = snap
        .events
        .iter()
        .find_map(|e| match e {
            SimEvent::ProjectileResolved { position, .. } => Some(*position),
            _ => None,
        })
        .unwrap();
    assert!(snap.events.contains(&SimEvent::SpawnEffect {
        effect: EffectKind::Fizzle,
        position,
    }));
    assert!(snap.projectiles.is_empty());
    assert_eq!(snap.emitter.pool_size, 1);
    assert_eq!(snap.emitter.pool_free, 1);
}

#[test]
fn test_direct_hit_damages_target() {
    let mut engine = started(engine_with(vec![BulletType::default()]));
    engine.queue_command(SimCommand::SpawnTarget {
        position: DVec2::new(5.0, 0.0),
        health: 2.5,
        radius: 0.5,
    });
    engine.set_input(aim_right(true, false));

    let mut damage = Vec::new();
    let mut destroyed = 0;
    for _ in 0..180 {
        let snap = engine.tick();
        for event in &snap.events {
            match event {
                SimEvent::Damage { amount, remaining, .. } => damage.push((*amount, *remaining)),
                SimEvent::TargetDestroyed { .. } => destroyed += 1,
                _ => {}
            }
        }
    }

    assert_eq!(damage, vec![(1.0, 1.5), (1.0, 0.5), (1.0, 0.0)]);
    assert_eq!(destroyed, 1);
    assert!(engine.tick().targets.is_empty());
}

#[test]
fn test_non_pooled_projectile_is_destroyed() {
    let mut engine = started(engine_with(vec![BulletType {
        pooled: false,
        ..BulletType::default()
    }]));
    fire_once(&mut engine, aim_right(true, false));
    for _ in 0..120 {
        engine.tick();
    }
    assert_eq!(engine.world().query::<&Projectile>().iter().count(), 0);
    assert_eq!(engine.emitter().pool().len(), 0);
}

// ---- Pooling ----

#[test]
fn test_switching_type_destroys_pooled_instances() {
    let mut engine = started(SimulationEngine::new(SimConfig::default()));
    engine.set_input(aim_right(true, false));
    let mut snap = FrameSnapshot::default();
    for _ in 0..50 {
        snap = engine.tick();
    }
    assert_eq!(snap.projectiles.len(), 3);
    assert_eq!(snap.emitter.pool_size, 3);

    engine.set_input(InputFrame::default());
    engine.queue_command(SimCommand::CycleBulletType);
    let snap = engine.tick();
    assert!(snap.events.contains(&SimEvent::PoolCleared { destroyed: 3 }));
    assert!(snap.projectiles.is_empty());
    assert_eq!(snap.emitter.pool_size, 0);
    assert_eq!(engine.world().query::<&Projectile>().iter().count(), 0);

    let snap = fire_once(&mut engine, aim_right(true, false));
    assert_eq!(snap.emitter.pool_size, 1);
    assert_eq!(snap.projectiles[0].bullet_type, 1);
}

#[test]
fn test_pool_reuses_released_instances() {
    let mut engine = started(engine_with(vec![BulletType::default()]));
    let first = fire_once(&mut engine, aim_right(true, false)).projectiles[0].id;
    for _ in 0..90 {
        engine.tick();
    }
    assert_eq!(engine.emitter().pool().free_len(), 1);

    let second = fire_once(&mut engine, aim_right(true, false)).projectiles[0].id;
    assert_eq!(first, second);
    assert_eq!(engine.emitter().pool().len(), 1);
}

// ---- Alternate fire ----

#[test]
fn test_alt_rejection_once_per_hold() {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: 3,
        tuning: Tuning {
            starting_energy: 0.0,
            ..Tuning::default()
        },
    });
    engine.queue_command(SimCommand::StartSession);
    engine.queue_command(SimCommand::SelectBulletType { index: 1 });

    let mut rejections = 0;
    engine.set_input(aim_right(false, true));
    for _ in 0..60 {
        let snap = engine.tick();
        rejections += count(&snap, |e| matches!(e, SimEvent::AltFireRejected { .. }));
        assert_eq!(count(&snap, |e| matches!(e, SimEvent::ShotFired { .. })), 0);
    }
    assert_eq!(rejections, 1);

    engine.set_input(InputFrame::default());
    let snap = engine.tick();
    assert!(!snap.emitter.feedback_running);

    engine.set_input(aim_right(false, true));
    let snap = engine.tick();
    assert_eq!(count(&snap, |e| matches!(e, SimEvent::AltFireRejected { .. })), 1);
    assert!(snap.emitter.energy < 2.0);
}

#[test]
fn test_feedback_blinks_gauge() {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: 3,
        tuning: Tuning {
            starting_energy: 0.0,
            ..Tuning::default()
        },
    });
    engine.queue_command(SimCommand::StartSession);
    engine.queue_command(SimCommand::SelectBulletType { index: 1 });
    engine.set_input(aim_right(false, true));

    let mut flashes = Vec::new();
    for _ in 0..60 {
        let snap = engine.tick();
        for event in snap.events {
            if let SimEvent::EnergyGaugeFlash { visible } = event {
                flashes.push(visible);
            }
        }
    }
    assert_eq!(flashes, vec![false, true, false, true, false, true]);
}

#[test]
fn test_energy_stays_within_bounds() {
    let mut engine = started(SimulationEngine::new(SimConfig::default()));
    engine.queue_command(SimCommand::SelectBulletType { index: 1 });
    for i in 0..600 {
        engine.set_input(aim_right(i % 3 == 0, i % 2 == 0));
        let snap = engine.tick();
        assert!(snap.emitter.energy >= 0.0);
        assert!(snap.emitter.energy <= snap.emitter.max_energy);
    }
}

// ---- Guided flight ----

#[test]
fn test_guided_without_contacts_expires_on_schedule() {
    let mut engine = started(engine_with(vec![guided(1.0, 3.0)]));
    engine.set_input(aim_right(true, false));
    let first = engine.tick();
    assert_eq!(count(&first, |e| matches!(e, SimEvent::ShotFired { .. })), 1);
    engine.set_input(InputFrame::default());

    let mut resolved = None;
    for _ in 0..400 {
        let snap = engine.tick();
        assert!(snap.projectiles.iter().all(|p| !p.locked));
        if resolved_with(&snap, ResolveCause::Expired) {
            resolved = Some(snap);
            break;
        }
    }
    let snap = resolved.expect("guided projectile should expire");
    assert_eq!(snap.time.tick, 180);
    assert!((snap.time.elapsed_secs - 3.0).abs() < 1e-9);
    // Guided projectiles always explode on resolution.
    assert_eq!(
        count(&snap, |e| matches!(
            e,
            SimEvent::SpawnEffect {
                effect: EffectKind::Explosion,
                ..
            }
        )),
        1
    );
}

#[test]
fn test_guided_locks_on_and_lights_trail() {
    let mut engine = started(engine_with(vec![guided(0.2, 5.0)]));
    engine.queue_command(SimCommand::SpawnTarget {
        position: DVec2::new(3.0, 3.0),
        health: 10.0,
        radius: 0.5,
    });
    let launch = fire_once(&mut engine, aim_right(true, false));
    assert!(!launch.projectiles[0].trail_on);

    let mut locked = false;
    let mut trail_lit = false;
    let mut hit = false;
    for _ in 0..300 {
        let snap = engine.tick();
        if snap.projectiles.iter().any(|p| p.locked && p.trail_on) {
            locked = true;
        }
        trail_lit |= snap
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::TrailChanged { on: true, .. }));
        if resolved_with(&snap, ResolveCause::Hit) {
            hit = true;
            assert_eq!(count(&snap, |e| matches!(e, SimEvent::Damage { .. })), 1);
            break;
        }
    }
    assert!(locked, "projectile never locked on");
    assert!(trail_lit, "trail never switched on");
    assert!(hit, "projectile never reached the target");
}

#[test]
fn test_guided_direct_hit_on_large_target_deals_damage() {
    let mut engine = started(engine_with(vec![guided(0.2, 5.0)]));
    engine.queue_command(SimCommand::SpawnTarget {
        position: DVec2::new(4.0, 0.0),
        health: 10.0,
        radius: 3.0,
    });
    fire_once(&mut engine, aim_right(true, false));

    let mut hit = None;
    for _ in 0..120 {
        let snap = engine.tick();
        if resolved_with(&snap, ResolveCause::Hit) {
            hit = Some(snap);
            break;
        }
    }
    let snap = hit.expect("guided shot should strike the target");
    assert_eq!(count(&snap, |e| matches!(e, SimEvent::Damage { .. })), 1);
    assert_eq!(snap.targets[0].health, 9.0);
}

// ---- Sub-projectiles ----

fn bursting() -> BulletType {
    BulletType {
        range: 2.0,
        alt: Some(AltFire {
            cost: 1.0,
            strength: 1.0,
            speed: 6.0,
            spread: 0.0,
            rate_of_fire: 0.5,
            burst: Some(MiniBurst {
                count: 4,
                strength: 0.5,
                speed: 3.0,
                life_secs: 0.5,
                effect_radius: 0.5,
            }),
        }),
        ..guided(0.1, 10.0)
    }
}

#[test]
fn test_alt_guided_bursts_into_minis() {
    let mut engine = started(engine_with(vec![bursting()]));
    fire_once(&mut engine, aim_right(false, true));

    let mut burst = None;
    for _ in 0..300 {
        let snap = engine.tick();
        if count(&snap, |e| matches!(e, SimEvent::SubProjectilesSpawned { .. })) > 0 {
            burst = Some(snap);
            break;
        }
    }
    let snap = burst.expect("parent should resolve and burst");
    assert!(resolved_with(&snap, ResolveCause::OutOfRange));
    assert!(snap.events.iter().any(|e| matches!(
        e,
        SimEvent::SubProjectilesSpawned { count: 4, .. }
    )));
    assert_eq!(snap.minis.len(), 4);
    assert!(snap.projectiles.is_empty());

    // Minis live at most twice their nominal life span.
    for _ in 0..61 {
        engine.tick();
    }
    assert!(engine.tick().minis.is_empty());
}

#[test]
fn test_pooled_parent_recycles_its_minis() {
    let mut engine = started(engine_with(vec![bursting()]));
    for _ in 0..3 {
        fire_once(&mut engine, aim_right(false, true));
        for _ in 0..240 {
            engine.tick();
        }
    }
    assert_eq!(engine.emitter().pool().len(), 1);
    let members = engine.world().query::<&SubPoolMember>().iter().count();
    assert_eq!(members, 4);
}

#[test]
fn test_primary_guided_shot_has_no_burst() {
    let mut engine = started(engine_with(vec![bursting()]));
    fire_once(&mut engine, aim_right(true, false));
    for _ in 0..240 {
        let snap = engine.tick();
        assert_eq!(
            count(&snap, |e| matches!(e, SimEvent::SubProjectilesSpawned { .. })),
            0
        );
    }
}

// ---- Kill zones and collisions ----

#[test]
fn test_kill_zone_resolves_after_grace_period() {
    let mut engine = started(engine_with(vec![BulletType::default()]));
    engine.queue_command(SimCommand::SpawnKillZone {
        min: DVec2::new(0.9, -1.0),
        max: DVec2::new(3.0, 1.0),
    });
    fire_once(&mut engine, aim_right(true, false));

    let mut entered = None;
    let mut resolved = None;
    for _ in 0..60 {
        let snap = engine.tick();
        if entered.is_none() && snap.projectiles.iter().any(|p| p.position.x >= 0.9) {
            entered = Some(snap.time.tick);
        }
        if resolved_with(&snap, ResolveCause::KillZone) {
            resolved = Some(snap.time.tick);
            assert_eq!(
                count(&snap, |e| matches!(e, SimEvent::ProjectileResolved { .. })),
                1
            );
            break;
        }
        assert!(!resolved_with(&snap, ResolveCause::OutOfRange));
    }
    let (entered, resolved) = (entered.unwrap(), resolved.unwrap());
    assert_eq!(resolved - entered, 6);
    assert_eq!(engine.pending_deferred(), 0);
}

#[test]
fn test_duplicate_collisions_damage_once() {
    let mut engine = started(engine_with(vec![BulletType::default()]));
    engine.queue_command(SimCommand::SpawnTarget {
        position: DVec2::new(0.0, 20.0),
        health: 3.0,
        radius: 0.5,
    });
    fire_once(&mut engine, aim_right(true, false));

    let projectile = engine
        .world()
        .query::<&Projectile>()
        .iter()
        .map(|(e, _)| e)
        .next()
        .unwrap();
    let target = engine
        .world()
        .query::<&Target>()
        .iter()
        .map(|(e, _)| e)
        .next()
        .unwrap();

    let hit = CollisionEvent {
        projectile,
        other: Some(target),
        category: TargetCategory::Enemy,
        kind: ContactKind::Enter,
    };
    engine.queue_collision(hit);
    engine.queue_collision(hit);
    let snap = engine.tick();

    assert_eq!(
        snap.events
            .iter()
            .filter(|e| matches!(e, SimEvent::Damage { .. }))
            .collect::<Vec<_>>(),
        vec![&SimEvent::Damage {
            target: entity_id(target),
            amount: 1.0,
            remaining: 2.0,
        }]
    );
    assert_eq!(
        count(&snap, |e| matches!(e, SimEvent::ProjectileResolved { .. })),
        1
    );

    // A late report after release is ignored too.
    engine.queue_collision(hit);
    let snap = engine.tick();
    assert_eq!(count(&snap, |e| matches!(e, SimEvent::Damage { .. })), 0);
    assert_eq!(snap.targets[0].health, 2.0);
}

#[test]
fn test_untracked_contact_kinds_are_ignored() {
    let mut engine = started(engine_with(vec![BulletType::default()]));
    fire_once(&mut engine, aim_right(true, false));
    let projectile = engine
        .world()
        .query::<&Projectile>()
        .iter()
        .map(|(e, _)| e)
        .next()
        .unwrap();

    engine.queue_collision(CollisionEvent {
        projectile,
        other: None,
        category: TargetCategory::Enemy,
        kind: ContactKind::Exit,
    });
    engine.queue_collision(CollisionEvent {
        projectile,
        other: None,
        category: TargetCategory::RangeLimit,
        kind: ContactKind::Enter,
    });
    let snap = engine.tick();
    assert_eq!(snap.projectiles.len(), 1);
    assert_eq!(
        count(&snap, |e| matches!(e, SimEvent::ProjectileResolved { .. })),
        0
    );
}
