#![forbid(unsafe_code)]

//! Frame scheduler: the single owner of all simulation state.
//!
//! The host creates one [`Simulation`], registers its tiles, forwards input
//! events with [`Simulation::push_input`] and calls [`Simulation::step`]
//! once per display refresh.
//!
//! # Frame order
//!
//! Continuous-physics mode:
//!
//! 1. Drain the input queue (pointer impulses, tilt updates).
//! 2. If the physics latch is set: gravity, friction and integration for
//!    every tile, then collision corrections.
//! 3. If physics ran or the layout changed (first frame, new tile, tile
//!    size, resize, mode switch): boundary clamp, then write tile positions
//!    to the [`Scene`].
//! 4. If a tile is open: info-box spring, then write the panel position.
//! 5. Clear the overlay and redraw the connector.
//!
//! Card-stack mode drains input into the gesture controller, restyles the
//! cards when something changed and clears the overlay.
//!
//! # Invariants
//!
//! 1. Every tile position is finite and within its bounds after every
//!    continuous-physics frame, latched or not.
//! 2. The physics latch never resets once set.
//! 3. Input is only applied inside [`Simulation::step`].

use tracing::{debug, info, trace};

use crate::bounds::Bounds;
use crate::card_stack::{CardStack, CardTransition};
use crate::collision::CollisionResolver;
use crate::config::SimConfig;
use crate::connector::{ConnectorRenderer, ConnectorSegment};
use crate::error::{SimError, SimResult};
use crate::force::{OrientationCapability, OrientationGate, OrientationGravity, PointerField};
use crate::geometry::{Size, Vec2};
use crate::info_box::InfoBox;
use crate::input::{InputEvent, InputQueue, TouchPhase};
use crate::mode::{FormFactor, Mode};
use crate::scene::{ContentLookup, InfoPanel, Overlay, ProjectInfo, Scene};
use crate::tile::{Tile, TileRegistry, TileSpec};

/// Info-panel size assumed until the host reports the rendered one.
pub const DEFAULT_INFO_BOX_SIZE: Size = Size::new(300.0, 200.0);

/// What happened during one [`Simulation::step`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    /// Frame counter, starting at 1.
    pub frame: u64,
    /// Input events applied this frame.
    pub events: usize,
    /// Whether tile physics ran.
    pub physics_ran: bool,
    /// Overlapping tile pairs corrected.
    pub contacts: usize,
    /// Tiles that hit a boundary.
    pub bounces: usize,
    /// Largest tile speed after integration.
    pub max_speed: f64,
    /// Center distance between the info panel and the open tile, before
    /// the spring step.
    pub info_box_distance: Option<f64>,
    /// Whether the connector was drawn.
    pub connector_drawn: bool,
    /// Card index change from a completed swipe.
    pub card_transition: Option<CardTransition>,
    /// Whether card poses were written.
    pub cards_restyled: bool,
}

/// Tile physics, info-box spring and card stack behind one explicit context.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    viewport: Size,
    form_factor: FormFactor,
    mode: Mode,
    tiles: TileRegistry,
    collisions: CollisionResolver,
    pointer: PointerField,
    orientation: OrientationGravity,
    info_box: InfoBox,
    connector: ConnectorRenderer,
    cards: CardStack,
    inputs: InputQueue,
    /// Reused each frame to drain `inputs`.
    scratch: Vec<InputEvent>,
    active: Option<usize>,
    physics_active: bool,
    layout_dirty: bool,
    frame: u64,
}

impl Simulation {
    /// Create a simulation for a `viewport` and host form factor.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidConfig`] if `config` fails validation,
    /// [`SimError::NonFiniteInput`] if the viewport is not a valid size.
    pub fn new(config: SimConfig, viewport: Size, form_factor: FormFactor) -> SimResult<Self> {
        let config = config.validated()?;
        check_size(viewport, "new")?;
        let mode = Mode::for_form_factor(form_factor);
        info!(mode = %mode, width = viewport.width, height = viewport.height, "simulation created");
        debug!(config = %config.summary(), "simulation config");

        Ok(Self {
            collisions: CollisionResolver::new(&config.collision, config.layout.tile_visual_scale),
            pointer: PointerField::new(&config.pointer),
            orientation: OrientationGravity::new(&config.orientation),
            info_box: InfoBox::new(viewport, DEFAULT_INFO_BOX_SIZE, &config.info_box),
            connector: ConnectorRenderer::new(config.connector.clone()),
            cards: CardStack::new(config.card_stack.clone()),
            inputs: InputQueue::new(config.input.max_pending),
            scratch: Vec::new(),
            tiles: TileRegistry::new(),
            viewport,
            form_factor,
            mode,
            config,
            active: None,
            physics_active: false,
            layout_dirty: true,
            frame: 0,
        })
    }

    // -- Accessors ---------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn form_factor(&self) -> FormFactor {
        self.form_factor
    }

    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        self.tiles.as_slice()
    }

    #[must_use]
    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn info_box(&self) -> &InfoBox {
        &self.info_box
    }

    #[must_use]
    pub fn card_stack(&self) -> &CardStack {
        &self.cards
    }

    /// Index of the open tile, if any.
    #[must_use]
    pub fn active_tile(&self) -> Option<usize> {
        self.active
    }

    #[must_use]
    pub fn is_physics_active(&self) -> bool {
        self.physics_active
    }

    #[must_use]
    pub fn orientation_gate(&self) -> OrientationGate {
        self.orientation.gate()
    }

    /// Current tilt gravity (zero unless the gate is active).
    #[must_use]
    pub fn gravity(&self) -> Vec2 {
        self.orientation.gravity()
    }

    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[must_use]
    pub fn pending_inputs(&self) -> usize {
        self.inputs.len()
    }

    #[must_use]
    pub fn dropped_inputs(&self) -> u64 {
        self.inputs.dropped()
    }

    /// Allowed top-left range for tile `index` in the current viewport.
    #[must_use]
    pub fn tile_bounds(&self, index: usize) -> Option<Bounds> {
        self.tiles.get(index).map(|tile| {
            Bounds::for_element(self.viewport, tile.size(), self.config.bounds.tile_padding)
        })
    }

    /// Allowed top-left range for the info panel.
    #[must_use]
    pub fn info_box_bounds(&self) -> Bounds {
        Bounds::for_element(
            self.viewport,
            self.info_box.size(),
            self.config.bounds.info_box_padding,
        )
    }

    // -- Setup -------------------------------------------------------------

    /// Register the next tile. Returns its index.
    ///
    /// # Errors
    ///
    /// [`SimError::NonFiniteInput`] if the size is negative or not finite.
    pub fn add_tile(&mut self, spec: TileSpec) -> SimResult<usize> {
        check_size(spec.size, "add_tile")?;
        let asset_id = spec.asset_id.clone();
        let index = self.tiles.register(spec, &self.config.layout, self.viewport);
        self.cards.set_count(self.tiles.len());
        self.layout_dirty = true;
        debug!(index, asset_id = %asset_id, "tile registered");
        Ok(index)
    }

    /// Update the layout size of tile `index`.
    ///
    /// # Errors
    ///
    /// [`SimError::TileIndexOutOfRange`] or [`SimError::NonFiniteInput`].
    pub fn set_tile_size(&mut self, index: usize, size: Size) -> SimResult<()> {
        check_size(size, "set_tile_size")?;
        let count = self.tiles.len();
        let tile = self
            .tiles
            .get_mut(index)
            .ok_or(SimError::TileIndexOutOfRange { index, count })?;
        tile.set_size(size);
        self.layout_dirty = true;
        Ok(())
    }

    /// Update the rendered info-panel size.
    ///
    /// # Errors
    ///
    /// [`SimError::NonFiniteInput`] if the size is negative or not finite.
    pub fn set_info_box_size(&mut self, size: Size) -> SimResult<()> {
        check_size(size, "set_info_box_size")?;
        self.info_box.set_size(size);
        Ok(())
    }

    /// Replace the viewport. Positions are re-clamped on the next frame,
    /// whether or not physics has been activated.
    ///
    /// # Errors
    ///
    /// [`SimError::NonFiniteInput`] if the size is negative or not finite.
    pub fn resize(&mut self, viewport: Size) -> SimResult<()> {
        check_size(viewport, "resize")?;
        if viewport != self.viewport {
            debug!(width = viewport.width, height = viewport.height, "viewport resized");
            self.viewport = viewport;
            self.layout_dirty = true;
            self.cards.mark_dirty();
        }
        Ok(())
    }

    /// Recompute the mode from a new host form factor.
    pub fn set_form_factor(&mut self, form_factor: FormFactor) {
        self.form_factor = form_factor;
        self.set_mode(Mode::for_form_factor(form_factor));
    }

    /// Force a mode regardless of form factor.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        info!(from = %self.mode, to = %mode, "mode changed");
        self.mode = mode;
        self.layout_dirty = true;
        self.cards.touch_cancel();
        self.cards.mark_dirty();
    }

    // -- Input -------------------------------------------------------------

    /// Buffer an input event for the next frame.
    ///
    /// # Errors
    ///
    /// [`SimError::NonFiniteInput`] if the event carries NaN or infinite
    /// numbers. Nothing is queued in that case.
    pub fn push_input(&mut self, event: InputEvent) -> SimResult<()> {
        if !event.is_finite() {
            return Err(SimError::NonFiniteInput { op: "push_input" });
        }
        if self.inputs.push(event) {
            debug!(
                kind = event.kind(),
                dropped = self.inputs.dropped(),
                "input queue full, dropped oldest event"
            );
        }
        Ok(())
    }

    /// Report the host's orientation capability.
    pub fn set_orientation_capability(&mut self, capability: OrientationCapability) {
        let before = self.orientation.gate();
        let activated = self.orientation.set_capability(capability);
        let after = self.orientation.gate();
        if before != after {
            info!(?capability, gate = ?after, "orientation gate changed");
        }
        if activated {
            self.latch_physics("orientation");
        }
    }

    /// Report the outcome of the host's orientation permission prompt.
    pub fn orientation_permission(&mut self, granted: bool) {
        let pending = self.orientation.gate().needs_prompt();
        let activated = self.orientation.permission_result(granted);
        if pending {
            info!(granted, gate = ?self.orientation.gate(), "orientation permission resolved");
        }
        if activated {
            self.latch_physics("orientation");
        }
    }

    // -- Selection ---------------------------------------------------------

    /// Open tile `index`: look up its content, show the panel and make it
    /// the connector target.
    ///
    /// Returns `Ok(None)` without changing the selection if the tile has no
    /// content.
    ///
    /// # Errors
    ///
    /// [`SimError::TileIndexOutOfRange`] for an unknown index.
    pub fn open_tile<'c, C, P>(
        &mut self,
        index: usize,
        content: &'c C,
        panel: &mut P,
    ) -> SimResult<Option<&'c ProjectInfo>>
    where
        C: ContentLookup + ?Sized,
        P: InfoPanel + ?Sized,
    {
        let count = self.tiles.len();
        let tile = self
            .tiles
            .get(index)
            .ok_or(SimError::TileIndexOutOfRange { index, count })?;
        let Some(info) = content.lookup(tile.asset_id()) else {
            debug!(index, asset_id = tile.asset_id(), "no content for tile");
            return Ok(None);
        };

        if self.config.info_box.snap_on_open && self.mode == Mode::ContinuousPhysics {
            let rect = tile.rendered_rect(self.config.layout.tile_visual_scale);
            self.info_box
                .snap_beside(rect, self.viewport, &self.config.info_box);
        }
        debug!(index, title = %info.title, "tile opened");
        self.active = Some(index);
        panel.show(info);
        Ok(Some(info))
    }

    /// Close the info panel and clear the selection.
    pub fn close_panel<P: InfoPanel + ?Sized>(&mut self, panel: &mut P) {
        if let Some(index) = self.active.take() {
            debug!(index, "panel closed");
        }
        panel.hide();
    }

    // -- Frame -------------------------------------------------------------

    /// Run one frame.
    pub fn step<S, O>(&mut self, scene: &mut S, overlay: &mut O) -> FrameReport
    where
        S: Scene + ?Sized,
        O: Overlay + ?Sized,
    {
        self.frame += 1;
        let mut report = FrameReport {
            frame: self.frame,
            ..FrameReport::default()
        };
        report.events = self.apply_inputs(&mut report);

        match self.mode {
            Mode::ContinuousPhysics => self.step_physics(scene, overlay, &mut report),
            Mode::CardStack => self.step_cards(scene, overlay, &mut report),
        }

        trace!(
            frame = report.frame,
            events = report.events,
            contacts = report.contacts,
            bounces = report.bounces,
            max_speed = report.max_speed,
            "frame"
        );
        report
    }

    fn apply_inputs(&mut self, report: &mut FrameReport) -> usize {
        let mut events = std::mem::take(&mut self.scratch);
        events.extend(self.inputs.drain());
        for event in &events {
            match (*event, self.mode) {
                (InputEvent::Pointer { x, y }, Mode::ContinuousPhysics)
                | (
                    InputEvent::Touch {
                        phase: TouchPhase::Move,
                        x,
                        y,
                    },
                    Mode::ContinuousPhysics,
                ) => self.repel(Vec2::new(x, y)),
                (InputEvent::Touch { phase, x, .. }, Mode::CardStack) => {
                    if let Some(transition) = self.swipe(phase, x) {
                        report.card_transition = Some(transition);
                    }
                }
                (InputEvent::Orientation { beta, gamma }, _) => {
                    self.orientation.update(beta, gamma);
                }
                _ => {}
            }
        }
        let count = events.len();
        events.clear();
        self.scratch = events;
        count
    }

    fn repel(&mut self, pointer: Vec2) {
        self.latch_physics("pointer");
        for tile in self.tiles.as_mut_slice() {
            if let Some(delta) = self.pointer.impulse(pointer, tile.center()) {
                tile.vel += delta;
            }
        }
    }

    fn swipe(&mut self, phase: TouchPhase, x: f64) -> Option<CardTransition> {
        match phase {
            TouchPhase::Start => self.cards.touch_start(x),
            TouchPhase::Move => self.cards.touch_move(x),
            TouchPhase::Cancel => self.cards.touch_cancel(),
            TouchPhase::End => {
                let transition = self.cards.touch_end();
                if let Some(CardTransition { from, to }) = transition {
                    debug!(from, to, "card index changed");
                }
                return transition;
            }
        }
        None
    }

    fn latch_physics(&mut self, source: &'static str) {
        if !self.physics_active {
            self.physics_active = true;
            info!(source, "physics activated");
        }
    }

    fn step_physics<S, O>(&mut self, scene: &mut S, overlay: &mut O, report: &mut FrameReport)
    where
        S: Scene + ?Sized,
        O: Overlay + ?Sized,
    {
        let run = self.physics_active;
        let relayout = std::mem::take(&mut self.layout_dirty);
        if run {
            self.tiles
                .integrate_all(self.orientation.gravity(), self.config.physics.friction);
            report.contacts = self.collisions.resolve(self.tiles.as_mut_slice());
        }
        if run || relayout {
            // Layout changes clamp even while the latch is unset.
            report.bounces = self.clamp_tiles();
            for (index, tile) in self.tiles.iter().enumerate() {
                scene.place_tile(index, tile.pos);
            }
        }
        if run {
            report.max_speed = self.tiles.max_speed();
            report.physics_ran = true;
        }

        let segment = self.update_info_box(scene, report);
        report.connector_drawn = self.connector.render(overlay, segment);
    }

    fn clamp_tiles(&mut self) -> usize {
        let viewport = self.viewport;
        let padding = self.config.bounds.tile_padding;
        let restitution = self.config.bounds.tile_restitution;
        let mut bounces = 0;
        for tile in self.tiles.as_mut_slice() {
            let bounds = Bounds::for_element(viewport, tile.size(), padding);
            if bounds.clamp(&mut tile.pos, &mut tile.vel, restitution) {
                bounces += 1;
            }
        }
        bounces
    }

    fn update_info_box<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        report: &mut FrameReport,
    ) -> Option<ConnectorSegment> {
        let tile = self.active.and_then(|index| self.tiles.get(index))?;
        let rect = tile.rendered_rect(self.config.layout.tile_visual_scale);
        let bounds = self.info_box_bounds();
        let step = self.info_box.step(
            rect.center(),
            &self.config.info_box,
            &bounds,
            self.config.bounds.info_box_restitution,
        );
        report.info_box_distance = Some(step.distance);
        scene.place_info_box(self.info_box.position());
        Some(ConnectorSegment::between(rect, self.info_box.rect()))
    }

    fn step_cards<S, O>(&mut self, scene: &mut S, overlay: &mut O, report: &mut FrameReport)
    where
        S: Scene + ?Sized,
        O: Overlay + ?Sized,
    {
        self.layout_dirty = false;
        if self.cards.take_dirty() {
            for (index, pose) in self.cards.poses() {
                scene.style_card(index, &pose);
            }
            report.cards_restyled = true;
        }
        overlay.clear();
    }
}

fn check_size(size: Size, op: &'static str) -> SimResult<()> {
    if size.is_valid() {
        Ok(())
    } else {
        Err(SimError::NonFiniteInput { op })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card_stack::CardPose;
    use crate::scene::{RecordingOverlay, RecordingPanel, RecordingScene};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    const VIEWPORT: Size = Size::new(1000.0, 800.0);

    fn sim(form_factor: FormFactor, tiles: usize) -> Simulation {
        let mut sim = Simulation::new(SimConfig::regular(), VIEWPORT, form_factor).unwrap();
        for i in 0..tiles {
            sim.add_tile(TileSpec::new(format!("p{i}.png"), Size::new(150.0, 100.0)))
                .unwrap();
        }
        sim
    }

    fn catalog() -> HashMap<String, ProjectInfo> {
        let mut map = HashMap::new();
        map.insert("p1.png".to_string(), ProjectInfo::new("One", "first"));
        map
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = SimConfig::regular();
        config.physics.friction = 1.5;
        let err = Simulation::new(config, VIEWPORT, FormFactor::Regular).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn invalid_viewport_is_rejected() {
        let err = Simulation::new(
            SimConfig::regular(),
            Size::new(f64::NAN, 10.0),
            FormFactor::Regular,
        )
        .unwrap_err();
        assert!(matches!(err, SimError::NonFiniteInput { op: "new" }));
    }

    #[test]
    fn first_frame_places_tiles_without_physics() {
        let mut sim = sim(FormFactor::Regular, 2);
        let mut scene = RecordingScene::new();
        let report = sim.step(&mut scene, &mut RecordingOverlay::new());
        assert!(!report.physics_ran);
        assert_eq!(scene.tile(0), Some(Vec2::new(50.0, 64.0)));

        // Nothing moved, nothing rewritten.
        let writes = scene.writes();
        sim.step(&mut scene, &mut RecordingOverlay::new());
        assert_eq!(scene.writes(), writes);
    }

    #[test]
    fn pointer_latches_physics() {
        let mut sim = sim(FormFactor::Regular, 1);
        assert!(!sim.is_physics_active());
        sim.push_input(InputEvent::pointer(-1000.0, -1000.0)).unwrap();
        assert!(!sim.is_physics_active());
        let report = sim.step(&mut RecordingScene::new(), &mut RecordingOverlay::new());
        assert_eq!(report.events, 1);
        assert!(report.physics_ran);
        assert!(sim.is_physics_active());
    }

    #[test]
    fn pointer_repels_nearby_tile() {
        let mut sim = sim(FormFactor::Regular, 1);
        let center = sim.tile(0).unwrap().center();
        sim.push_input(InputEvent::pointer(center.x + 50.0, center.y)).unwrap();
        sim.step(&mut RecordingScene::new(), &mut RecordingOverlay::new());
        assert!(sim.tile(0).unwrap().vel.x < 0.0);
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let mut sim = sim(FormFactor::Regular, 1);
        let err = sim.push_input(InputEvent::pointer(f64::NAN, 0.0)).unwrap_err();
        assert!(matches!(err, SimError::NonFiniteInput { .. }));
        assert_eq!(sim.pending_inputs(), 0);
    }

    #[test]
    fn open_unknown_index_errors() {
        let mut sim = sim(FormFactor::Regular, 2);
        let err = sim
            .open_tile(5, &catalog(), &mut RecordingPanel::new())
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::TileIndexOutOfRange { index: 5, count: 2 }
        ));
    }

    #[test]
    fn open_without_content_keeps_panel_closed() {
        let mut sim = sim(FormFactor::Regular, 2);
        let content = catalog();
        let mut panel = RecordingPanel::new();
        let opened = sim.open_tile(0, &content, &mut panel).unwrap();
        assert_eq!(opened, None);
        assert_eq!(sim.active_tile(), None);
        assert!(panel.showing().is_none());
    }

    #[test]
    fn open_and_close() {
        let mut sim = sim(FormFactor::Regular, 2);
        let content = catalog();
        let mut panel = RecordingPanel::new();
        let opened = sim.open_tile(1, &content, &mut panel).unwrap();
        assert_eq!(opened.map(|info| info.title.as_str()), Some("One"));
        assert_eq!(sim.active_tile(), Some(1));
        assert_eq!(panel.showing().map(|info| info.title.as_str()), Some("One"));

        let mut overlay = RecordingOverlay::new();
        let report = sim.step(&mut RecordingScene::new(), &mut overlay);
        assert!(report.connector_drawn);
        assert_eq!(overlay.commands().len(), 2);

        sim.close_panel(&mut panel);
        assert_eq!(sim.active_tile(), None);
        assert!(panel.showing().is_none());
        let report = sim.step(&mut RecordingScene::new(), &mut overlay);
        assert!(!report.connector_drawn);
        assert!(overlay.is_blank());
    }

    #[test]
    fn snap_on_open_moves_panel_beside_tile() {
        let mut config = SimConfig::constrained();
        config.info_box.snap_on_open = true;
        let mut sim = Simulation::new(config, VIEWPORT, FormFactor::Constrained).unwrap();
        sim.set_mode(Mode::ContinuousPhysics);
        sim.add_tile(TileSpec::new("p0.png", Size::new(100.0, 100.0)))
            .unwrap();
        let mut content = HashMap::new();
        content.insert("p0.png".to_string(), ProjectInfo::new("Zero", ""));
        sim.open_tile(0, &content, &mut RecordingPanel::new()).unwrap();

        // Tile at (50, 64), rendered at 0.6 about its center: right = 130.
        let pos = sim.info_box().position();
        assert!((pos.x - 150.0).abs() < 1e-9);
        assert!((pos.y - 84.0).abs() < 1e-9);
    }

    #[test]
    fn orientation_not_required_latches_physics() {
        let mut sim = sim(FormFactor::Regular, 1);
        sim.set_orientation_capability(OrientationCapability::NotRequired);
        assert!(sim.is_physics_active());
        assert_eq!(sim.orientation_gate(), OrientationGate::Active);
        sim.push_input(InputEvent::orientation(0.0, 90.0)).unwrap();
        sim.step(&mut RecordingScene::new(), &mut RecordingOverlay::new());
        assert!((sim.gravity().x - 0.3).abs() < 1e-12);
        assert!(sim.tile(0).unwrap().vel.x > 0.0);
    }

    #[test]
    fn orientation_denied_does_not_latch() {
        let mut sim = sim(FormFactor::Regular, 1);
        sim.set_orientation_capability(OrientationCapability::PermissionRequired);
        assert!(!sim.is_physics_active());
        sim.orientation_permission(false);
        assert_eq!(sim.orientation_gate(), OrientationGate::Denied);
        assert!(!sim.is_physics_active());
    }

    #[test]
    fn card_stack_swipes() {
        let mut sim = sim(FormFactor::Constrained, 4);
        assert_eq!(sim.mode(), Mode::CardStack);
        let mut scene = RecordingScene::new();
        let mut overlay = RecordingOverlay::new();
        let report = sim.step(&mut scene, &mut overlay);
        assert!(report.cards_restyled);
        assert_eq!(scene.card(0).map(|pose| pose.z_index), Some(100));

        for event in [
            InputEvent::touch(TouchPhase::Start, 300.0, 400.0),
            InputEvent::touch(TouchPhase::Move, 220.0, 400.0),
            InputEvent::touch(TouchPhase::End, 220.0, 400.0),
        ] {
            sim.push_input(event).unwrap();
        }
        let report = sim.step(&mut scene, &mut overlay);
        assert_eq!(report.card_transition, Some(CardTransition { from: 0, to: 1 }));
        assert_eq!(
            scene.card(1).copied(),
            Some(CardPose::for_offset(0, 40.0, 0.0))
        );
        assert!(!sim.is_physics_active());
        assert!(overlay.is_blank());
    }

    #[test]
    fn pointer_is_ignored_in_card_stack() {
        let mut sim = sim(FormFactor::Constrained, 2);
        sim.push_input(InputEvent::pointer(10.0, 10.0)).unwrap();
        let report = sim.step(&mut RecordingScene::new(), &mut RecordingOverlay::new());
        assert_eq!(report.events, 1);
        assert!(!sim.is_physics_active());
    }

    #[test]
    fn form_factor_switch_recomputes_mode() {
        let mut sim = sim(FormFactor::Regular, 2);
        sim.set_form_factor(FormFactor::Constrained);
        assert_eq!(sim.mode(), Mode::CardStack);
        sim.set_form_factor(FormFactor::Regular);
        assert_eq!(sim.mode(), Mode::ContinuousPhysics);
    }

    #[test]
    fn resize_reclamps_next_frame() {
        let mut sim = sim(FormFactor::Regular, 8);
        sim.push_input(InputEvent::pointer(-1000.0, -1000.0)).unwrap();
        sim.resize(Size::new(400.0, 300.0)).unwrap();
        sim.resize(Size::new(400.0, 300.0)).unwrap();
        sim.step(&mut RecordingScene::new(), &mut RecordingOverlay::new());
        for index in 0..sim.tile_count() {
            let bounds = sim.tile_bounds(index).unwrap();
            assert!(bounds.contains(sim.tile(index).unwrap().pos));
        }
    }

    fn assert_tiles_in_bounds(sim: &Simulation) {
        for (index, tile) in sim.tiles().iter().enumerate() {
            let bounds = sim.tile_bounds(index).unwrap();
            assert!(
                bounds.contains(tile.pos),
                "tile {index} at {:?} outside {:?}",
                tile.pos,
                bounds
            );
        }
    }

    #[test]
    fn idle_large_tiles_are_clamped() {
        let mut sim = Simulation::new(SimConfig::regular(), VIEWPORT, FormFactor::Regular).unwrap();
        for i in 0..8 {
            sim.add_tile(TileSpec::new(format!("p{i}.png"), Size::new(400.0, 300.0)))
                .unwrap();
        }
        let mut scene = RecordingScene::new();
        for _ in 0..100 {
            let report = sim.step(&mut scene, &mut RecordingOverlay::new());
            assert!(!report.physics_ran);
            assert_tiles_in_bounds(&sim);
        }
        assert!(!sim.is_physics_active());
        for (index, pos) in scene.tiles() {
            assert_eq!(pos, sim.tile(index).unwrap().pos);
        }
    }

    #[test]
    fn resize_before_latch_reclamps() {
        let mut sim = sim(FormFactor::Regular, 8);
        sim.step(&mut RecordingScene::new(), &mut RecordingOverlay::new());
        sim.resize(Size::new(400.0, 300.0)).unwrap();
        let mut scene = RecordingScene::new();
        let report = sim.step(&mut scene, &mut RecordingOverlay::new());
        assert!(!report.physics_ran);
        assert_eq!(scene.tiles().count(), 8);
        assert_tiles_in_bounds(&sim);
    }

    #[test]
    fn grown_tile_is_reclamped() {
        let mut sim = sim(FormFactor::Regular, 2);
        sim.step(&mut RecordingScene::new(), &mut RecordingOverlay::new());
        sim.set_tile_size(1, Size::new(900.0, 700.0)).unwrap();
        let mut scene = RecordingScene::new();
        sim.step(&mut scene, &mut RecordingOverlay::new());
        assert_tiles_in_bounds(&sim);
        assert_eq!(scene.tile(1), Some(sim.tile(1).unwrap().pos));
    }

    #[test]
    fn touch_start_does_not_repel() {
        let mut sim = sim(FormFactor::Regular, 1);
        let center = sim.tile(0).unwrap().center();
        sim.push_input(InputEvent::touch(TouchPhase::Start, center.x, center.y))
            .unwrap();
        sim.step(&mut RecordingScene::new(), &mut RecordingOverlay::new());
        assert!(!sim.is_physics_active());
        assert_eq!(sim.tile(0).unwrap().vel, Vec2::ZERO);

        sim.push_input(InputEvent::touch(TouchPhase::Move, center.x, center.y))
            .unwrap();
        sim.step(&mut RecordingScene::new(), &mut RecordingOverlay::new());
        assert!(sim.is_physics_active());
        assert!(sim.tile(0).unwrap().vel.y < 0.0);
    }

    #[test]
    fn input_is_drained_once() {
        let mut sim = sim(FormFactor::Regular, 1);
        for _ in 0..3 {
            sim.push_input(InputEvent::pointer(-500.0, -500.0)).unwrap();
        }
        let first = sim.step(&mut RecordingScene::new(), &mut RecordingOverlay::new());
        let second = sim.step(&mut RecordingScene::new(), &mut RecordingOverlay::new());
        assert_eq!((first.events, second.events), (3, 0));
        assert_eq!(sim.pending_inputs(), 0);
    }

    #[test]
    fn set_tile_size_checks_index() {
        let mut sim = sim(FormFactor::Regular, 1);
        assert!(sim.set_tile_size(0, Size::new(10.0, 10.0)).is_ok());
        assert!(matches!(
            sim.set_tile_size(3, Size::new(10.0, 10.0)),
            Err(SimError::TileIndexOutOfRange { index: 3, count: 1 })
        ));
        assert!(matches!(
            sim.set_info_box_size(Size::new(-1.0, 10.0)),
            Err(SimError::NonFiniteInput { .. })
        ));
    }
}
