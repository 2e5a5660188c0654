#![forbid(unsafe_code)]

//! Host collaborators.
//!
//! The simulation never touches page elements directly. It writes positions
//! and card styles through [`Scene`], draws the connector through
//! [`Overlay`], reads project text through [`ContentLookup`] and toggles the
//! info panel through [`InfoPanel`]. Tile elements are addressed by their
//! registration index.
//!
//! Recording implementations are provided for tests, benches and the WASM
//! runner's flat buffers.

use std::collections::{BTreeMap, HashMap};

use crate::card_stack::CardPose;
use crate::config::ConnectorStyle;
use crate::geometry::Vec2;

/// Title and description shown in the info panel for one tile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectInfo {
    pub title: String,
    pub description: String,
}

impl ProjectInfo {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Positions and styles the tile elements.
pub trait Scene {
    /// Move tile `index` so its top-left corner sits at `pos`.
    fn place_tile(&mut self, index: usize, pos: Vec2);

    /// Move the info panel so its top-left corner sits at `pos`.
    fn place_info_box(&mut self, pos: Vec2);

    /// Apply a card-stack pose to tile `index`.
    fn style_card(&mut self, index: usize, pose: &CardPose);
}

/// Full-viewport drawing surface for the connector.
pub trait Overlay {
    fn clear(&mut self);
    fn draw_line(&mut self, from: Vec2, to: Vec2, style: &ConnectorStyle);
    fn fill_circle(&mut self, center: Vec2, radius: f64, style: &ConnectorStyle);
}

/// Resolves a tile's content key to its project text.
pub trait ContentLookup {
    fn lookup(&self, asset_id: &str) -> Option<&ProjectInfo>;
}

/// The toggleable info panel.
pub trait InfoPanel {
    fn show(&mut self, info: &ProjectInfo);
    fn hide(&mut self);
}

impl ContentLookup for HashMap<String, ProjectInfo> {
    fn lookup(&self, asset_id: &str) -> Option<&ProjectInfo> {
        self.get(asset_id)
    }
}

impl ContentLookup for BTreeMap<String, ProjectInfo> {
    fn lookup(&self, asset_id: &str) -> Option<&ProjectInfo> {
        self.get(asset_id)
    }
}

/// Overlay used when the host has no canvas attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullOverlay;

impl Overlay for NullOverlay {
    fn clear(&mut self) {}
    fn draw_line(&mut self, _from: Vec2, _to: Vec2, _style: &ConnectorStyle) {}
    fn fill_circle(&mut self, _center: Vec2, _radius: f64, _style: &ConnectorStyle) {}
}

/// One recorded overlay draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Vec2,
        to: Vec2,
        width: f64,
        color: String,
    },
    Circle {
        center: Vec2,
        radius: f64,
        color: String,
    },
}

/// Overlay that keeps the draw calls issued since the last clear.
#[derive(Debug, Clone, Default)]
pub struct RecordingOverlay {
    commands: Vec<DrawCommand>,
    clears: u64,
}

impl RecordingOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands drawn since the last clear.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of clears seen.
    #[must_use]
    pub fn clears(&self) -> u64 {
        self.clears
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Overlay for RecordingOverlay {
    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, style: &ConnectorStyle) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width: style.line_width,
            color: style.color.clone(),
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f64, style: &ConnectorStyle) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color: style.color.clone(),
        });
    }
}

/// Scene that remembers the latest placement of every element.
#[derive(Debug, Clone, Default)]
pub struct RecordingScene {
    tiles: BTreeMap<usize, Vec2>,
    cards: BTreeMap<usize, CardPose>,
    info_box: Option<Vec2>,
    writes: u64,
}

impl RecordingScene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tile(&self, index: usize) -> Option<Vec2> {
        self.tiles.get(&index).copied()
    }

    #[must_use]
    pub fn card(&self, index: usize) -> Option<&CardPose> {
        self.cards.get(&index)
    }

    #[must_use]
    pub fn info_box(&self) -> Option<Vec2> {
        self.info_box
    }

    /// Total number of scene calls received.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Latest tile positions in index order.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, Vec2)> + '_ {
        self.tiles.iter().map(|(&index, &pos)| (index, pos))
    }

    /// Latest card poses in index order.
    pub fn cards(&self) -> impl Iterator<Item = (usize, &CardPose)> + '_ {
        self.cards.iter().map(|(&index, pose)| (index, pose))
    }
}

impl Scene for RecordingScene {
    fn place_tile(&mut self, index: usize, pos: Vec2) {
        self.tiles.insert(index, pos);
        self.writes += 1;
    }

    fn place_info_box(&mut self, pos: Vec2) {
        self.info_box = Some(pos);
        self.writes += 1;
    }

    fn style_card(&mut self, index: usize, pose: &CardPose) {
        self.cards.insert(index, *pose);
        self.writes += 1;
    }
}

/// Info panel that records what it is showing.
#[derive(Debug, Clone, Default)]
pub struct RecordingPanel {
    showing: Option<ProjectInfo>,
}

impl RecordingPanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn showing(&self) -> Option<&ProjectInfo> {
        self.showing.as_ref()
    }
}

impl InfoPanel for RecordingPanel {
    fn show(&mut self, info: &ProjectInfo) {
        self.showing = Some(info.clone());
    }

    fn hide(&mut self) {
        self.showing = None;
    }
}
