#![no_main]

use std::collections::HashMap;

use arbitrary::Arbitrary;
use floatfolio_core::{
    FormFactor, InputEvent, Mode, NullOverlay, OrientationCapability, ProjectInfo, RecordingPanel,
    RecordingScene, SimConfig, Simulation, Size, TileSpec, TouchPhase,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Pointer { x: i16, y: i16 },
    Touch { phase: u8, x: i16, y: i16 },
    Tilt { beta: Option<i16>, gamma: Option<i16> },
    Resize { width: u16, height: u16 },
    Open { index: u8 },
    Close,
    FormFactor { constrained: bool },
    Step,
}

#[derive(Debug, Arbitrary)]
struct Input {
    constrained: bool,
    tilt: bool,
    tiles: Vec<(u8, u8)>,
    ops: Vec<Op>,
}

fn phase(raw: u8) -> TouchPhase {
    match raw % 4 {
        0 => TouchPhase::Start,
        1 => TouchPhase::Move,
        2 => TouchPhase::End,
        _ => TouchPhase::Cancel,
    }
}

fuzz_target!(|input: Input| {
    let config = if input.constrained {
        SimConfig::constrained()
    } else {
        SimConfig::regular()
    };
    let form_factor = if input.constrained {
        FormFactor::Constrained
    } else {
        FormFactor::Regular
    };
    let mut sim = Simulation::new(config, Size::new(1000.0, 800.0), form_factor)
        .expect("preset is valid");
    for (i, &(w, h)) in input.tiles.iter().take(24).enumerate() {
        let size = Size::new(f64::from(w) + 20.0, f64::from(h) + 20.0);
        sim.add_tile(TileSpec::new(format!("t{i}"), size))
            .expect("finite tile size");
    }
    if input.tilt {
        sim.set_orientation_capability(OrientationCapability::NotRequired);
    }
    let content: HashMap<String, ProjectInfo> = (0..sim.tile_count())
        .map(|i| (format!("t{i}"), ProjectInfo::new("t", "d")))
        .collect();
    let mut panel = RecordingPanel::new();
    let mut scene = RecordingScene::new();

    for op in input.ops.into_iter().take(512) {
        match op {
            Op::Pointer { x, y } => {
                let _ = sim.push_input(InputEvent::pointer(f64::from(x), f64::from(y)));
            }
            Op::Touch { phase: raw, x, y } => {
                let _ = sim.push_input(InputEvent::touch(phase(raw), f64::from(x), f64::from(y)));
            }
            Op::Tilt { beta, gamma } => {
                let _ = sim.push_input(InputEvent::Orientation {
                    beta: beta.map(f64::from),
                    gamma: gamma.map(f64::from),
                });
            }
            Op::Resize { width, height } => {
                let _ = sim.resize(Size::new(f64::from(width), f64::from(height)));
            }
            Op::Open { index } => {
                let _ = sim.open_tile(usize::from(index), &content, &mut panel);
            }
            Op::Close => sim.close_panel(&mut panel),
            Op::FormFactor { constrained } => sim.set_form_factor(if constrained {
                FormFactor::Constrained
            } else {
                FormFactor::Regular
            }),
            Op::Step => {
                let report = sim.step(&mut scene, &mut NullOverlay);
                assert!(report.max_speed.is_finite(), "non-finite speed");
                if sim.mode() == Mode::ContinuousPhysics {
                    for (index, tile) in sim.tiles().iter().enumerate() {
                        assert!(tile.pos.is_finite() && tile.vel.is_finite());
                        let bounds = sim.tile_bounds(index).expect("registered");
                        assert!(bounds.contains(tile.pos), "tile {index} escaped");
                    }
                }
                if report.info_box_distance.is_some() {
                    let pos = sim.info_box().position();
                    assert!(pos.is_finite());
                    assert!(sim.info_box_bounds().contains(pos), "info box escaped");
                }
                assert!(
                    sim.card_stack().current_index() < sim.tile_count().max(1),
                    "card index out of range"
                );
            }
        }
    }
});
