use lattice_particles_core::{
    seed_for_layer, ControllerState, ParticleConfigPatch, ParticleController, ParticleRegistry,
    ParticleSnapshot, ParticleSystemConfig, SimError,
};
use lattice_test_fixtures::particle_systems;

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn assert_same(a: &ParticleSnapshot, b: &ParticleSnapshot) {
    assert_eq!(a.frame(), b.frame());
    assert_eq!(a.count(), b.count(), "frame {}", a.frame());
    for (p, q) in a.iter().zip(b.iter()) {
        assert_eq!(p.id, q.id);
        approx(p.x, q.x, 1e-4);
        approx(p.y, q.y, 1e-4);
        approx(p.vx, q.vx, 1e-4);
        approx(p.vy, q.vy, 1e-4);
    }
}

fn fixture(name: &str) -> (ParticleSystemConfig, f32) {
    let cfg = particle_systems::load(name).unwrap();
    let fps = particle_systems::fps(name).unwrap().unwrap_or(30.0);
    (cfg, fps)
}

fn busy_config() -> ParticleSystemConfig {
    let (mut cfg, _) = fixture("snow");
    cfg.collision.enabled = true;
    cfg.collision.particle_collision = true;
    cfg
}

const SCRUB: [f64; 7] = [45.0, 15.0, 60.0, 30.0, 5.0, 75.0, 40.0];

#[test]
fn scrub_order_does_not_change_snapshots() {
    for name in particle_systems::keys() {
        let (cfg, fps) = fixture(&name);
        let mut forward = ParticleController::new(1234, cfg.clone(), fps);
        let a: Vec<_> = SCRUB
            .iter()
            .map(|&f| forward.evaluate_at_frame(f).unwrap())
            .collect();

        let mut reversed = ParticleController::new(1234, cfg, fps);
        let b: Vec<_> = SCRUB
            .iter()
            .rev()
            .map(|&f| reversed.evaluate_at_frame(f).unwrap())
            .collect();

        for (snap, rev) in a.iter().zip(b.iter().rev()) {
            assert_same(snap, rev);
        }
    }
}

#[test]
fn same_controller_scrubbing_back_and_forth() {
    let mut c = ParticleController::new(99, busy_config(), 24.0);
    let first: Vec<_> = SCRUB.iter().map(|&f| c.evaluate_at_frame(f).unwrap()).collect();
    for (&f, snap) in SCRUB.iter().zip(&first).rev() {
        assert_same(snap, &c.evaluate_at_frame(f).unwrap());
    }
    // A cold linear run agrees with the scrubbed results.
    let mut cold = ParticleController::new(99, busy_config(), 24.0);
    assert_same(&first[5], &cold.evaluate_at_frame(75.0).unwrap());
}

#[test]
fn scrubbing_under_tight_retention_matches_cold_runs() {
    let cfg = ParticleSystemConfig {
        checkpoint_interval: 3,
        max_checkpoints: 3,
        ..busy_config()
    };
    assert!(!cfg.turbulence_fields.is_empty());
    let frames = [45.0, 15.0, 60.0, 30.0, 5.0, 75.0, 40.0, 44.0, 16.0, 61.0];

    let mut scrubbed = ParticleController::new(321, cfg.clone(), 24.0);
    for &f in &frames {
        let warm = scrubbed.evaluate_at_frame(f).unwrap();
        assert!(scrubbed.checkpoint_count() <= 3);
        let mut cold = ParticleController::new(321, cfg.clone(), 24.0);
        assert_eq!(warm, cold.evaluate_at_frame(f).unwrap(), "frame {f}");
    }
}

#[test]
fn same_seed_same_snapshots_different_seed_diverges() {
    let (cfg, fps) = fixture("fountain");
    let mut a = ParticleController::new(7, cfg.clone(), fps);
    let mut b = ParticleController::new(7, cfg.clone(), fps);
    let mut c = ParticleController::new(8, cfg, fps);
    for f in [0.0, 1.0, 10.0, 33.0] {
        assert_same(&a.evaluate_at_frame(f).unwrap(), &b.evaluate_at_frame(f).unwrap());
    }
    let sa = a.evaluate_at_frame(10.0).unwrap();
    let sc = c.evaluate_at_frame(10.0).unwrap();
    assert!(sa.count() > 0);
    let differs = sa
        .iter()
        .zip(sc.iter())
        .any(|(p, q)| p.x != q.x || p.y != q.y);
    assert!(differs);
}

#[test]
fn reset_round_trip() {
    let (cfg, fps) = fixture("fireworks");
    let mut c = ParticleController::new(5, cfg, fps);
    let first = c.evaluate_at_frame(50.0).unwrap();
    c.evaluate_at_frame(20.0).unwrap();
    c.reset();
    assert_eq!(c.state(), ControllerState::Fresh);
    let again = c.evaluate_at_frame(50.0).unwrap();
    assert_eq!(first, again);
}

#[test]
fn gravity_change_invalidates_cached_frames() {
    let (cfg, fps) = fixture("fountain");
    let mut c = ParticleController::new(3, cfg, fps);
    let before = c.evaluate_at_frame(20.0).unwrap();
    c.update_config(ParticleConfigPatch {
        gravity: Some(-600.0),
        ..ParticleConfigPatch::default()
    });
    assert_eq!(c.state(), ControllerState::Fresh);
    let after = c.evaluate_at_frame(20.0).unwrap();
    assert_eq!(before.count(), after.count());
    let moved = before
        .iter()
        .zip(after.iter())
        .any(|(p, q)| (p.y - q.y).abs() > 1e-3);
    assert!(moved);
}

#[test]
fn negative_max_particles_is_clamped() {
    let cfg = ParticleSystemConfig {
        max_particles: -1,
        ..ParticleSystemConfig::default()
    };
    let mut c = ParticleController::new(1, cfg, 30.0);
    assert_eq!(c.config().max_particles, 1000);
    let snap = c.evaluate_at_frame(30.0).unwrap();
    assert!(snap.count() > 0);
}

#[test]
fn particle_limit_is_never_exceeded() {
    let mut cfg = ParticleSystemConfig::default();
    cfg.max_particles = 25;
    cfg.emitters[0].rate = 1_000.0;
    cfg.emitters[0].lifetime = 50.0;
    let mut c = ParticleController::new(1, cfg, 30.0);
    for f in [1.0, 10.0, 60.0] {
        assert!(c.evaluate_at_frame(f).unwrap().count() <= 25);
    }
}

#[test]
fn non_finite_frames_are_rejected() {
    let mut c = ParticleController::new(1, ParticleSystemConfig::default(), 30.0);
    c.evaluate_at_frame(10.0).unwrap();
    let count = c.checkpoint_count();
    assert!(matches!(
        c.evaluate_at_frame(f64::NAN),
        Err(SimError::NonFiniteFrame { .. })
    ));
    assert_eq!(c.checkpoint_count(), count);
}

#[test]
fn negative_and_fractional_frames_normalize() {
    let mut c = ParticleController::new(1, ParticleSystemConfig::default(), 30.0);
    assert_eq!(c.evaluate_at_frame(-20.0).unwrap().frame(), 0);
    let a = c.evaluate_at_frame(12.75).unwrap();
    let b = c.evaluate_at_frame(12.0).unwrap();
    assert_eq!(a.frame(), 12);
    assert!(a.shares_buffer(&b));
}

#[test]
fn checkpoints_stay_bounded() {
    let cfg = ParticleSystemConfig {
        checkpoint_interval: 5,
        max_checkpoints: 8,
        ..ParticleSystemConfig::default()
    };
    let mut c = ParticleController::new(1, cfg, 30.0);
    for f in (0..400).step_by(7).rev() {
        c.evaluate_at_frame(f as f64).unwrap();
        assert!(c.checkpoint_count() <= 8);
    }
    assert_eq!(c.checkpoint_frames().first(), Some(&0));
}

#[test]
fn snapshots_are_detached_from_later_evaluation() {
    let mut c = ParticleController::new(1, ParticleSystemConfig::default(), 30.0);
    let early = c.evaluate_at_frame(10.0).unwrap();
    let copy: Vec<_> = early.particles().to_vec();
    c.evaluate_at_frame(90.0).unwrap();
    c.reset();
    c.evaluate_at_frame(10.0).unwrap();
    assert_eq!(early.particles(), copy.as_slice());
}

#[test]
fn registry_seed_is_stable_across_instances() {
    let cfg = ParticleSystemConfig::default();
    let mut r1 = ParticleRegistry::new(30.0);
    let mut r2 = ParticleRegistry::new(30.0);
    let s1 = r1.get_controller("layer-7", &cfg).seed();
    let s2 = r2.get_controller("layer-7", &cfg).seed();
    assert_eq!(s1, s2);
    assert_eq!(s1, seed_for_layer("layer-7"));
    assert_ne!(s1, seed_for_layer("layer-8"));
    assert_same(
        &r1.evaluate_layer("layer-7", 40.0, &cfg).unwrap(),
        &r2.evaluate_layer("layer-7", 40.0, &cfg).unwrap(),
    );
}

#[test]
fn registry_clear_builds_a_new_equivalent_controller() {
    let (cfg, fps) = fixture("snow");
    let mut reg = ParticleRegistry::new(fps);
    let before = reg.evaluate_layer("bg", 30.0, &cfg).unwrap();
    reg.clear();
    assert!(!reg.contains("bg"));
    let c = reg.get_controller("bg", &cfg);
    assert_eq!(c.state(), ControllerState::Fresh);
    assert_eq!(c.checkpoint_count(), 0);
    let after = c.evaluate_at_frame(30.0).unwrap();
    assert_eq!(before, after);
}
