#![forbid(unsafe_code)]

//! Core: tile physics, info-box spring, connector and card stack.
//!
//! # Role in Floatfolio
//! `floatfolio-core` is the interaction model behind the portfolio page. It
//! owns every piece of per-frame state and talks to the page only through
//! the collaborator traits in [`scene`]. It has no browser dependencies and
//! runs natively under test.
//!
//! # Primary responsibilities
//! - **Simulation**: the frame scheduler and single owner of all state.
//! - **Tiles**: layout origins, integration, collisions and boundary clamp.
//! - **Forces**: pointer repulsion and device-tilt gravity.
//! - **Info box**: spring pull toward the open tile, plus the connector line.
//! - **Card stack**: swipe gestures and the card pose table for constrained
//!   layouts.
//!
//! # How it fits in the system
//! `floatfolio-web` wraps a [`Simulation`] in a `wasm-bindgen` runner driven
//! by `requestAnimationFrame`; host callbacks push [`InputEvent`]s and the
//! runner applies the resulting placements to the DOM.
//!
//! ```
//! use floatfolio_core::{
//!     FormFactor, InputEvent, RecordingOverlay, RecordingScene, SimConfig, Simulation, Size,
//!     TileSpec,
//! };
//!
//! let mut sim =
//!     Simulation::new(SimConfig::regular(), Size::new(1000.0, 800.0), FormFactor::Regular)?;
//! sim.add_tile(TileSpec::new("kiln.png", Size::new(150.0, 100.0)))?;
//! sim.push_input(InputEvent::pointer(80.0, 90.0))?;
//!
//! let mut scene = RecordingScene::new();
//! let report = sim.step(&mut scene, &mut RecordingOverlay::new());
//! assert!(report.physics_ran);
//! assert!(scene.tile(0).is_some());
//! # Ok::<(), floatfolio_core::SimError>(())
//! ```

pub mod bounds;
pub mod card_stack;
pub mod collision;
pub mod config;
pub mod connector;
pub mod error;
pub mod force;
pub mod geometry;
pub mod info_box;
pub mod input;
pub mod mode;
pub mod scene;
pub mod simulation;
pub mod tile;

pub use bounds::Bounds;
pub use card_stack::{CardPose, CardStack, CardTransition, SwipePhase};
pub use collision::CollisionResolver;
pub use config::{ConfigError, ConnectorStyle, SimConfig};
pub use connector::{ConnectorRenderer, ConnectorSegment};
pub use error::{SimError, SimResult};
pub use force::{OrientationCapability, OrientationGate, OrientationGravity, PointerField};
pub use geometry::{Rect, Size, Vec2};
pub use info_box::{InfoBox, SpringStep};
pub use input::{InputEvent, InputQueue, TouchPhase};
pub use mode::{FormFactor, Mode};
pub use scene::{
    ContentLookup, DrawCommand, InfoPanel, NullOverlay, Overlay, ProjectInfo, RecordingOverlay,
    RecordingPanel, RecordingScene, Scene,
};
pub use simulation::{DEFAULT_INFO_BOX_SIZE, FrameReport, Simulation};
pub use tile::{Tile, TileRegistry, TileSpec};
