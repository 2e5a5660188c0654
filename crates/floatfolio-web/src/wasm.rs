#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the PortfolioRunner.
//!
//! This module wraps [`super::runner_core::RunnerCore`] with JS-friendly types.
//! Only compiled on `wasm32` targets.

use js_sys::{Array, Float64Array, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::runner_core::RunnerCore;
use floatfolio_core::{ConnectorStyle, NullOverlay, Overlay, ProjectInfo, Vec2};

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn project_info_to_js(info: &ProjectInfo) -> JsValue {
    let obj = Object::new();
    set_js(&obj, "title", JsValue::from_str(&info.title));
    set_js(&obj, "description", JsValue::from_str(&info.description));
    obj.into()
}

fn vec2_to_js(pos: Vec2) -> JsValue {
    let obj = Object::new();
    set_js(&obj, "x", JsValue::from_f64(pos.x));
    set_js(&obj, "y", JsValue::from_f64(pos.y));
    obj.into()
}

/// Connector overlay drawn onto a full-viewport `<canvas>`.
struct CanvasOverlay {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasOverlay {
    fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    fn resize(&self, width: f64, height: f64) {
        self.canvas.set_width(width.max(0.0).round() as u32);
        self.canvas.set_height(height.max(0.0).round() as u32);
    }
}

impl Overlay for CanvasOverlay {
    fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, style: &ConnectorStyle) {
        self.ctx.set_stroke_style_str(&style.color);
        self.ctx.set_line_width(style.line_width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f64, style: &ConnectorStyle) {
        self.ctx.set_fill_style_str(&style.color);
        self.ctx.begin_path();
        self.ctx
            .arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU)
            .ok();
        self.ctx.fill();
    }
}

/// Portfolio runner exported to JavaScript.
///
/// Host-driven: JavaScript owns the `requestAnimationFrame` loop, forwards
/// DOM events through `pushEncodedInput`, calls `step` once per frame, then
/// applies the drained tile positions and card poses to the page.
#[wasm_bindgen]
pub struct PortfolioRunner {
    inner: RunnerCore,
    overlay: Option<CanvasOverlay>,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl PortfolioRunner {
    /// Create a runner for a viewport of `width`×`height` CSS pixels.
    ///
    /// `constrained` selects the card-stack layout and its preset.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, constrained: bool) -> Result<PortfolioRunner, JsValue> {
        install_panic_hook();
        let inner = RunnerCore::new(width, height, constrained)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(Self {
            inner,
            overlay: None,
        })
    }

    /// Create a runner from a JSON configuration document.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(
        config_json: &str,
        width: f64,
        height: f64,
        constrained: bool,
    ) -> Result<PortfolioRunner, JsValue> {
        install_panic_hook();
        let inner = RunnerCore::from_config_json(config_json, width, height, constrained)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(Self {
            inner,
            overlay: None,
        })
    }

    /// Register the next tile. Returns its index, or `undefined` when the
    /// size is rejected.
    #[wasm_bindgen(js_name = addTile)]
    pub fn add_tile(&mut self, asset_id: &str, width: f64, height: f64) -> Option<u32> {
        self.inner
            .add_tile(asset_id, width, height)
            .map(|index| index.min(u32::MAX as usize) as u32)
    }

    /// Report a tile's measured size after its image loads.
    #[wasm_bindgen(js_name = setTileSize)]
    pub fn set_tile_size(&mut self, index: u32, width: f64, height: f64) -> bool {
        self.inner.set_tile_size(index as usize, width, height)
    }

    #[wasm_bindgen(js_name = setInfoBoxSize)]
    pub fn set_info_box_size(&mut self, width: f64, height: f64) -> bool {
        self.inner.set_info_box_size(width, height)
    }

    /// Load the content catalog. Returns the entry count.
    #[wasm_bindgen(js_name = loadCatalog)]
    pub fn load_catalog(&mut self, json: &str) -> Result<u32, JsValue> {
        self.inner
            .load_catalog(json)
            .map(|count| count.min(u32::MAX as usize) as u32)
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Parse a JSON-encoded input and push to the event queue.
    /// Returns `true` if accepted, `false` if unsupported/malformed.
    #[wasm_bindgen(js_name = pushEncodedInput)]
    pub fn push_encoded_input(&mut self, json: &str) -> bool {
        self.inner.push_encoded_input(json)
    }

    /// Resize the viewport and the attached overlay canvas.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        let accepted = self.inner.resize(width, height);
        if accepted {
            if let Some(overlay) = &self.overlay {
                overlay.resize(width, height);
            }
        }
        accepted
    }

    #[wasm_bindgen(js_name = setFormFactor)]
    pub fn set_form_factor(&mut self, constrained: bool) {
        self.inner.set_form_factor(constrained);
    }

    /// Open a tile. Returns `{ title, description }`, or `null` when the
    /// tile is unknown or has no catalog entry.
    #[wasm_bindgen(js_name = openTile)]
    pub fn open_tile(&mut self, index: u32) -> JsValue {
        match self.inner.open_tile(index as usize) {
            Some(info) => project_info_to_js(&info),
            None => JsValue::NULL,
        }
    }

    #[wasm_bindgen(js_name = closePanel)]
    pub fn close_panel(&mut self) {
        self.inner.close_panel();
    }

    /// `kind`: `"unavailable"`, `"not_required"` or `"permission_required"`.
    #[wasm_bindgen(js_name = setOrientationCapability)]
    pub fn set_orientation_capability(&mut self, kind: &str) -> bool {
        self.inner.set_orientation_capability(kind)
    }

    /// Whether the page should show its orientation permission button.
    #[wasm_bindgen(js_name = needsOrientationPrompt)]
    pub fn needs_orientation_prompt(&self) -> bool {
        self.inner.needs_orientation_prompt()
    }

    #[wasm_bindgen(js_name = orientationPermission)]
    pub fn orientation_permission(&mut self, granted: bool) {
        self.inner.orientation_permission(granted);
    }

    /// Attach the connector canvas. Returns `false` if it has no 2D context.
    #[wasm_bindgen(js_name = attachOverlay)]
    pub fn attach_overlay(&mut self, canvas: HtmlCanvasElement) -> bool {
        match CanvasOverlay::new(canvas) {
            Ok(overlay) => {
                let viewport = self.inner.simulation().viewport();
                overlay.resize(viewport.width, viewport.height);
                self.overlay = Some(overlay);
                true
            }
            Err(err) => {
                console_error(&format!("attachOverlay failed: {err:?}"));
                false
            }
        }
    }

    /// Run one frame. Returns
    /// `{ frame, events, physics_ran, contacts, bounces, max_speed,
    ///    connector_drawn, cards_restyled, card_index }`.
    pub fn step(&mut self) -> JsValue {
        let report = match self.overlay.as_mut() {
            Some(overlay) => self.inner.step(overlay),
            None => self.inner.step(&mut NullOverlay),
        };
        let obj = Object::new();
        set_js(&obj, "frame", JsValue::from_f64(report.frame as f64));
        set_js(&obj, "events", JsValue::from_f64(report.events as f64));
        set_js(&obj, "physics_ran", report.physics_ran.into());
        set_js(&obj, "contacts", JsValue::from_f64(report.contacts as f64));
        set_js(&obj, "bounces", JsValue::from_f64(report.bounces as f64));
        set_js(&obj, "max_speed", JsValue::from_f64(report.max_speed));
        set_js(&obj, "connector_drawn", report.connector_drawn.into());
        set_js(&obj, "cards_restyled", report.cards_restyled.into());
        set_js(
            &obj,
            "card_index",
            JsValue::from_f64(self.inner.simulation().card_stack().current_index() as f64),
        );
        obj.into()
    }

    /// Drain tile positions as a flat `Float64Array` of `[index, x, y]`
    /// triples.
    #[wasm_bindgen(js_name = takeTilePositions)]
    pub fn take_tile_positions(&mut self) -> Float64Array {
        Float64Array::from(self.inner.take_tile_positions().as_slice())
    }

    /// Drain card poses as a flat `Float64Array` of
    /// `[index, translate_x, scale, opacity, z_index, visible]` records.
    #[wasm_bindgen(js_name = takeCardPoses)]
    pub fn take_card_poses(&mut self) -> Float64Array {
        Float64Array::from(self.inner.take_card_poses().as_slice())
    }

    /// Info panel position `{ x, y }`, or `null` before the first placement.
    #[wasm_bindgen(js_name = infoBoxPosition)]
    pub fn info_box_position(&self) -> JsValue {
        self.inner
            .info_box_position()
            .map_or(JsValue::NULL, vec2_to_js)
    }

    /// Drain accumulated log lines. Returns `Array<string>`.
    #[wasm_bindgen(js_name = takeLogs)]
    pub fn take_logs(&mut self) -> Array {
        let logs = self.inner.take_logs();
        let arr = Array::new();
        for log in logs {
            arr.push(&JsValue::from_str(&log));
        }
        arr
    }
}
