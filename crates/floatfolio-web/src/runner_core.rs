#![forbid(unsafe_code)]

//! Platform-independent runner core wrapping [`Simulation`].
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and the native test harness. No JS/WASM types here.
//!
//! Placements are kept per index, latest write wins, so undrained frames
//! never grow the buffers past one record per tile. The host drains them as
//! flat `f64` arrays, in index order:
//!
//! - tile positions: `[index, x, y]` per written tile,
//! - card poses: `[index, translate_x, scale, opacity, z_index, visible]`
//!   per written card (`visible` is `1.0` or `0.0`).

use std::collections::{BTreeMap, HashMap};

use floatfolio_core::{
    CardPose, FormFactor, FrameReport, InfoPanel, InputEvent, OrientationCapability,
    Overlay, ProjectInfo, Scene, SimConfig, SimError, Simulation, Size, TileSpec, Vec2,
};
use serde::Deserialize;
use tracing::debug;

/// Log lines kept between `take_logs` calls.
const MAX_LOGS: usize = 512;

/// Values per tile record in the position buffer.
pub const TILE_RECORD_LEN: usize = 3;

/// Values per card record in the pose buffer.
pub const CARD_RECORD_LEN: usize = 6;

fn push_bounded<T>(queue: &mut Vec<T>, item: T, limit: usize) {
    if queue.len() >= limit {
        let overflow = queue.len() - limit + 1;
        queue.drain(..overflow);
    }
    queue.push(item);
}

/// One catalog entry as supplied by the page.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    title: String,
    #[serde(default)]
    description: String,
}

/// Parse a catalog JSON object keyed by asset id:
/// `{"kiln.png": {"title": "...", "description": "..."}}`.
pub fn parse_catalog(json: &str) -> Result<HashMap<String, ProjectInfo>, serde_json::Error> {
    let entries: HashMap<String, CatalogEntry> = serde_json::from_str(json)?;
    Ok(entries
        .into_iter()
        .map(|(asset_id, entry)| (asset_id, ProjectInfo::new(entry.title, entry.description)))
        .collect())
}

/// Parse an orientation capability label.
#[must_use]
pub fn parse_capability(kind: &str) -> Option<OrientationCapability> {
    match kind {
        "unavailable" => Some(OrientationCapability::Unavailable),
        "not_required" => Some(OrientationCapability::NotRequired),
        "permission_required" => Some(OrientationCapability::PermissionRequired),
        _ => None,
    }
}

/// Scene holding the latest undrained placement per index.
#[derive(Debug, Default)]
struct FlatScene {
    tiles: BTreeMap<usize, Vec2>,
    cards: BTreeMap<usize, CardPose>,
    info_box: Option<Vec2>,
}

impl FlatScene {
    fn take_tiles(&mut self) -> Vec<f64> {
        let tiles = std::mem::take(&mut self.tiles);
        let mut out = Vec::with_capacity(tiles.len() * TILE_RECORD_LEN);
        for (index, pos) in tiles {
            out.extend_from_slice(&[index as f64, pos.x, pos.y]);
        }
        out
    }

    fn take_cards(&mut self) -> Vec<f64> {
        let cards = std::mem::take(&mut self.cards);
        let mut out = Vec::with_capacity(cards.len() * CARD_RECORD_LEN);
        for (index, pose) in cards {
            out.extend_from_slice(&[
                index as f64,
                pose.translate_x,
                pose.scale,
                pose.opacity,
                f64::from(pose.z_index),
                if pose.visible { 1.0 } else { 0.0 },
            ]);
        }
        out
    }
}

impl Scene for FlatScene {
    fn place_tile(&mut self, index: usize, pos: Vec2) {
        self.tiles.insert(index, pos);
    }

    fn place_info_box(&mut self, pos: Vec2) {
        self.info_box = Some(pos);
    }

    fn style_card(&mut self, index: usize, pose: &CardPose) {
        self.cards.insert(index, *pose);
    }
}

/// Panel state mirrored for the host.
#[derive(Debug, Default)]
struct PanelState {
    showing: Option<ProjectInfo>,
}

impl InfoPanel for PanelState {
    fn show(&mut self, info: &ProjectInfo) {
        self.showing = Some(info.clone());
    }

    fn hide(&mut self) {
        self.showing = None;
    }
}

/// Platform-independent portfolio runner.
#[derive(Debug)]
pub struct RunnerCore {
    sim: Simulation,
    catalog: HashMap<String, ProjectInfo>,
    scene: FlatScene,
    panel: PanelState,
    logs: Vec<String>,
}

#[cfg_attr(not(test), allow(dead_code))]
impl RunnerCore {
    /// Runner using the preset matching the form factor.
    pub fn new(width: f64, height: f64, constrained: bool) -> Result<Self, SimError> {
        let config = if constrained {
            SimConfig::constrained()
        } else {
            SimConfig::regular()
        };
        Self::with_config(config, width, height, constrained)
    }

    /// Runner with an explicit configuration.
    pub fn with_config(
        config: SimConfig,
        width: f64,
        height: f64,
        constrained: bool,
    ) -> Result<Self, SimError> {
        let form_factor = if constrained {
            FormFactor::Constrained
        } else {
            FormFactor::Regular
        };
        let sim = Simulation::new(config, Size::new(width, height), form_factor)?;
        let mut core = Self {
            sim,
            catalog: HashMap::new(),
            scene: FlatScene::default(),
            panel: PanelState::default(),
            logs: Vec::new(),
        };
        let mode = core.sim.mode();
        core.log(format!("runner_init mode={mode} width={width} height={height}"));
        Ok(core)
    }

    /// Runner with a JSON configuration document.
    pub fn from_config_json(
        json: &str,
        width: f64,
        height: f64,
        constrained: bool,
    ) -> Result<Self, SimError> {
        let config = SimConfig::from_json_str(json)?;
        Self::with_config(config, width, height, constrained)
    }

    fn log(&mut self, line: String) {
        push_bounded(&mut self.logs, line, MAX_LOGS);
    }

    #[must_use]
    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Register the next tile. Returns its index, or `None` for an invalid
    /// size.
    pub fn add_tile(&mut self, asset_id: &str, width: f64, height: f64) -> Option<usize> {
        match self
            .sim
            .add_tile(TileSpec::new(asset_id, Size::new(width, height)))
        {
            Ok(index) => Some(index),
            Err(err) => {
                self.log(format!("add_tile_rejected asset_id={asset_id}: {err}"));
                None
            }
        }
    }

    pub fn set_tile_size(&mut self, index: usize, width: f64, height: f64) -> bool {
        match self.sim.set_tile_size(index, Size::new(width, height)) {
            Ok(()) => true,
            Err(err) => {
                self.log(format!("set_tile_size_rejected: {err}"));
                false
            }
        }
    }

    pub fn set_info_box_size(&mut self, width: f64, height: f64) -> bool {
        match self.sim.set_info_box_size(Size::new(width, height)) {
            Ok(()) => true,
            Err(err) => {
                self.log(format!("set_info_box_size_rejected: {err}"));
                false
            }
        }
    }

    /// Replace the content catalog. Returns the number of entries.
    pub fn load_catalog(&mut self, json: &str) -> Result<usize, serde_json::Error> {
        let catalog = parse_catalog(json)?;
        let count = catalog.len();
        self.catalog = catalog;
        self.log(format!("catalog_loaded entries={count}"));
        Ok(count)
    }

    /// Decode a JSON input event and queue it for the next frame.
    ///
    /// Returns `false` for malformed, unknown or non-finite events.
    pub fn push_encoded_input(&mut self, json: &str) -> bool {
        let event = match InputEvent::from_json_str(json) {
            Ok(event) => event,
            Err(err) => {
                debug!(error = %err, "rejected encoded input");
                return false;
            }
        };
        match self.sim.push_input(event) {
            Ok(()) => true,
            Err(err) => {
                debug!(error = %err, kind = event.kind(), "rejected input event");
                false
            }
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        match self.sim.resize(Size::new(width, height)) {
            Ok(()) => true,
            Err(err) => {
                self.log(format!("resize_rejected: {err}"));
                false
            }
        }
    }

    /// Switch between regular and constrained layouts.
    pub fn set_form_factor(&mut self, constrained: bool) {
        let form_factor = if constrained {
            FormFactor::Constrained
        } else {
            FormFactor::Regular
        };
        let before = self.sim.mode();
        self.sim.set_form_factor(form_factor);
        if self.sim.mode() != before {
            self.log(format!("mode_changed from={before} to={}", self.sim.mode()));
        }
    }

    /// Open tile `index`. Returns its content, or `None` if the index is
    /// unknown or the tile has no catalog entry.
    pub fn open_tile(&mut self, index: usize) -> Option<ProjectInfo> {
        match self.sim.open_tile(index, &self.catalog, &mut self.panel) {
            Ok(Some(info)) => {
                let info = info.clone();
                self.log(format!("tile_opened index={index} title={}", info.title));
                Some(info)
            }
            Ok(None) => {
                self.log(format!("tile_without_content index={index}"));
                None
            }
            Err(err) => {
                self.log(format!("open_tile_rejected: {err}"));
                None
            }
        }
    }

    pub fn close_panel(&mut self) {
        self.sim.close_panel(&mut self.panel);
    }

    /// Content currently shown in the panel.
    #[must_use]
    pub fn showing(&self) -> Option<&ProjectInfo> {
        self.panel.showing.as_ref()
    }

    /// Report the orientation capability by label. Returns `false` for an
    /// unknown label.
    pub fn set_orientation_capability(&mut self, kind: &str) -> bool {
        let Some(capability) = parse_capability(kind) else {
            self.log(format!("unknown_orientation_capability kind={kind}"));
            return false;
        };
        self.sim.set_orientation_capability(capability);
        self.log(format!(
            "orientation_capability kind={kind} gate={:?}",
            self.sim.orientation_gate()
        ));
        true
    }

    /// Whether the host should show its orientation permission prompt.
    #[must_use]
    pub fn needs_orientation_prompt(&self) -> bool {
        self.sim.orientation_gate().needs_prompt()
    }

    pub fn orientation_permission(&mut self, granted: bool) {
        self.sim.orientation_permission(granted);
        self.log(format!(
            "orientation_permission granted={granted} gate={:?}",
            self.sim.orientation_gate()
        ));
    }

    /// Run one frame, drawing the connector onto `overlay`.
    pub fn step<O: Overlay + ?Sized>(&mut self, overlay: &mut O) -> FrameReport {
        let dropped_before = self.sim.dropped_inputs();
        let report = self.sim.step(&mut self.scene, overlay);
        let dropped = self.sim.dropped_inputs() - dropped_before;
        if dropped > 0 {
            self.log(format!("input_dropped count={dropped}"));
        }
        if let Some(transition) = report.card_transition {
            self.log(format!(
                "card_changed from={} to={}",
                transition.from, transition.to
            ));
        }
        report
    }

    /// Drain the latest tile positions written since the last call.
    pub fn take_tile_positions(&mut self) -> Vec<f64> {
        self.scene.take_tiles()
    }

    /// Drain the latest card poses written since the last call.
    pub fn take_card_poses(&mut self) -> Vec<f64> {
        self.scene.take_cards()
    }

    /// Latest info-panel position written by a frame.
    #[must_use]
    pub fn info_box_position(&self) -> Option<Vec2> {
        self.scene.info_box
    }

    pub fn take_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs)
    }
}
