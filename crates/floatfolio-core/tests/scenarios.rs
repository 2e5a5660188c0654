//! End-to-end scenarios for the frame scheduler.
//!
//! A: eight idle tiles settle in bounds.
//! B: the info panel follows an opened tile and stops drawing when closed.
//! C: card-stack swipes step the index only past the threshold.
//!
//! Run:
//!   cargo test -p floatfolio-core --test scenarios

use std::collections::HashMap;

use floatfolio_core::{
    CardTransition, FormFactor, InputEvent, Mode, PointerField, ProjectInfo, RecordingOverlay,
    RecordingPanel, RecordingScene, SimConfig, Simulation, Size, TileSpec, TouchPhase, Vec2,
};
use pretty_assertions::assert_eq;

const VIEWPORT: Size = Size::new(1000.0, 800.0);
const TILE: Size = Size::new(150.0, 100.0);

fn portfolio(config: SimConfig, form_factor: FormFactor) -> Simulation {
    let mut sim = Simulation::new(config, VIEWPORT, form_factor).expect("valid setup");
    for i in 0..8 {
        sim.add_tile(TileSpec::new(format!("project-{i}.png"), TILE))
            .expect("valid tile");
    }
    sim
}

fn catalog() -> HashMap<String, ProjectInfo> {
    (0..8)
        .map(|i| {
            (
                format!("project-{i}.png"),
                ProjectInfo::new(format!("Project {i}"), format!("Description {i}")),
            )
        })
        .collect()
}

fn assert_in_bounds(sim: &Simulation) {
    for (index, tile) in sim.tiles().iter().enumerate() {
        let bounds = sim.tile_bounds(index).expect("registered");
        assert!(tile.pos.is_finite(), "tile {index} not finite: {:?}", tile.pos);
        assert!(
            bounds.contains(tile.pos),
            "tile {index} at {:?} outside {:?}",
            tile.pos,
            bounds
        );
    }
}

// ── Scenario A ──────────────────────────────────────────────────────────

#[test]
fn scenario_a_idle_tiles_stay_at_rest() {
    let mut sim = portfolio(SimConfig::regular(), FormFactor::Regular);
    let mut scene = RecordingScene::new();
    let mut overlay = RecordingOverlay::new();

    for _ in 0..100 {
        let report = sim.step(&mut scene, &mut overlay);
        assert!(!report.physics_ran);
        assert_eq!(report.events, 0);
        assert_in_bounds(&sim);
    }

    for tile in sim.tiles() {
        assert!(tile.speed() < 1e-9, "speed {}", tile.speed());
    }
    assert_eq!(scene.tiles().count(), 8);
}

#[test]
fn scenario_a_large_idle_tiles_stay_in_bounds() {
    let mut sim =
        Simulation::new(SimConfig::regular(), VIEWPORT, FormFactor::Regular).expect("valid setup");
    for i in 0..8 {
        sim.add_tile(TileSpec::new(format!("project-{i}.png"), Size::new(400.0, 300.0)))
            .expect("valid tile");
    }
    let mut scene = RecordingScene::new();
    let mut overlay = RecordingOverlay::new();
    for _ in 0..100 {
        sim.step(&mut scene, &mut overlay);
        assert_in_bounds(&sim);
    }

    // Shrinking the viewport before any interaction still re-clamps.
    sim.resize(Size::new(400.0, 300.0)).unwrap();
    sim.step(&mut scene, &mut overlay);
    assert!(!sim.is_physics_active());
    assert_in_bounds(&sim);
    for (index, pos) in scene.tiles() {
        assert_eq!(pos, sim.tile(index).unwrap().pos);
    }
}

#[test]
fn latched_idle_tiles_do_not_collide() {
    let mut sim = portfolio(SimConfig::regular(), FormFactor::Regular);
    let mut scene = RecordingScene::new();
    let mut overlay = RecordingOverlay::new();

    // A pointer far off-screen latches physics without pushing anything.
    sim.push_input(InputEvent::pointer(-1000.0, -1000.0)).unwrap();
    for _ in 0..100 {
        let report = sim.step(&mut scene, &mut overlay);
        assert!(report.physics_ran);
        assert_eq!(report.contacts, 0);
    }
    for tile in sim.tiles() {
        assert!(tile.speed() < 1e-9, "speed {}", tile.speed());
    }
    assert_in_bounds(&sim);
}

#[test]
fn scenario_a_kicked_tile_settles() {
    let mut sim = portfolio(SimConfig::regular(), FormFactor::Regular);
    let mut scene = RecordingScene::new();
    let mut overlay = RecordingOverlay::new();

    let center = sim.tile(0).unwrap().center();
    sim.push_input(InputEvent::pointer(center.x, center.y)).unwrap();
    let mut last = None;
    for _ in 0..1000 {
        last = Some(sim.step(&mut scene, &mut overlay));
    }
    let report = last.unwrap();
    assert!(report.max_speed < 1e-3, "max speed {}", report.max_speed);
    assert_in_bounds(&sim);
    // Pushed straight up.
    let tile = sim.tile(0).unwrap();
    assert!(tile.pos.y < 64.0);
    assert!((tile.pos.x - 50.0).abs() < 1e-9);
}

#[test]
fn pointer_on_center_gives_full_strength() {
    let config = SimConfig::regular();
    let field = PointerField::new(&config.pointer);
    let center = Vec2::new(125.0, 114.0);
    let delta = field.impulse(center, center).expect("in range");
    assert!((delta.length() - config.pointer.repel_strength).abs() < 1e-12);

    let mut sim = portfolio(config.clone(), FormFactor::Regular);
    let center = sim.tile(0).unwrap().center();
    sim.push_input(InputEvent::pointer(center.x, center.y)).unwrap();
    sim.step(&mut RecordingScene::new(), &mut RecordingOverlay::new());
    let vel = sim.tile(0).unwrap().vel;
    let expected = config.pointer.repel_strength * config.physics.friction;
    assert!((vel.length() - expected).abs() < 1e-12);
    assert!(vel.y < 0.0);
}

// ── Scenario B ──────────────────────────────────────────────────────────

#[test]
fn scenario_b_panel_follows_opened_tile() {
    let mut config = SimConfig::regular();
    config.info_box.connection_distance = 100.0;
    let mut sim = portfolio(config, FormFactor::Regular);
    let content = catalog();
    let mut panel = RecordingPanel::new();
    let mut scene = RecordingScene::new();
    let mut overlay = RecordingOverlay::new();

    let opened = sim.open_tile(3, &content, &mut panel).unwrap();
    assert_eq!(opened.map(|info| info.title.as_str()), Some("Project 3"));
    assert_eq!(sim.active_tile(), Some(3));

    let target = sim.tile(3).unwrap().center();
    let mut last = sim.info_box().center().distance(target);
    assert!(last > 100.0);
    for _ in 0..1500 {
        let report = sim.step(&mut scene, &mut overlay);
        assert!(report.connector_drawn);
        let now = sim.info_box().center().distance(target);
        assert!(now <= last + 1e-9, "distance grew: {last} -> {now}");
        last = now;
    }
    assert!(last - 100.0 < 0.5, "gap left: {}", last - 100.0);
    assert_eq!(scene.info_box(), Some(sim.info_box().position()));
    assert_eq!(overlay.commands().len(), 2);

    sim.close_panel(&mut panel);
    assert_eq!(sim.active_tile(), None);
    assert!(panel.showing().is_none());
    let report = sim.step(&mut scene, &mut overlay);
    assert!(!report.connector_drawn);
    assert_eq!(report.info_box_distance, None);
    assert!(overlay.is_blank());
}

#[test]
fn connector_stays_clear_without_selection() {
    let mut sim = portfolio(SimConfig::regular(), FormFactor::Regular);
    let mut overlay = RecordingOverlay::new();
    let mut scene = RecordingScene::new();
    for _ in 0..10 {
        let report = sim.step(&mut scene, &mut overlay);
        assert!(!report.connector_drawn);
        assert!(overlay.is_blank());
    }
    assert_eq!(overlay.clears(), 10);
    assert_eq!(scene.info_box(), None);
}

// ── Scenario C ──────────────────────────────────────────────────────────

fn swipe(sim: &mut Simulation, dx: f64) -> Option<CardTransition> {
    sim.push_input(InputEvent::touch(TouchPhase::Start, 300.0, 500.0))
        .unwrap();
    sim.push_input(InputEvent::touch(TouchPhase::Move, 300.0 + dx, 500.0))
        .unwrap();
    sim.push_input(InputEvent::touch(TouchPhase::End, 300.0 + dx, 500.0))
        .unwrap();
    sim.step(&mut RecordingScene::new(), &mut RecordingOverlay::new())
        .card_transition
}

#[test]
fn scenario_c_swipe_threshold() {
    let mut sim = portfolio(SimConfig::constrained(), FormFactor::Constrained);
    assert_eq!(sim.mode(), Mode::CardStack);
    assert_eq!(sim.card_stack().current_index(), 0);

    assert_eq!(swipe(&mut sim, -80.0), Some(CardTransition { from: 0, to: 1 }));
    assert_eq!(sim.card_stack().current_index(), 1);

    assert_eq!(swipe(&mut sim, 30.0), None);
    assert_eq!(sim.card_stack().current_index(), 1);
}

#[test]
fn card_poses_follow_index() {
    let mut sim = portfolio(SimConfig::constrained(), FormFactor::Constrained);
    let mut scene = RecordingScene::new();
    let mut overlay = RecordingOverlay::new();
    swipe(&mut sim, -80.0);
    swipe(&mut sim, -80.0);
    sim.step(&mut scene, &mut overlay);
    // Nothing changed since the last swipe: no restyle.
    assert!(scene.cards().next().is_none());

    sim.push_input(InputEvent::touch(TouchPhase::Start, 0.0, 0.0))
        .unwrap();
    sim.push_input(InputEvent::touch(TouchPhase::Move, 10.0, 0.0))
        .unwrap();
    sim.step(&mut scene, &mut overlay);

    let visible: Vec<usize> = scene
        .cards()
        .filter(|(_, pose)| pose.visible)
        .map(|(index, _)| index)
        .collect();
    assert_eq!(visible, vec![0, 1, 2, 3, 4]);
    let front = scene.card(2).unwrap();
    assert_eq!(front.z_index, 100);
    assert_eq!(front.translate_x, 10.0);
    assert_eq!(scene.card(6).unwrap().opacity, 0.0);
}
