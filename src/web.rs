//! Browser bridge (WASM only)
//!
//! The page's render loop owns timing and drawing. It calls `tick` once per
//! fixed step with a bitmask of held inputs and gets the tick's events back
//! as JSON, so audio, particles and banners stay on the JavaScript side.

use wasm_bindgen::prelude::*;

use crate::persistence::LocalStorage;
use crate::sim::{ArcadePhysics, TickInput};
use crate::{Session, Tuning};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Star Collector starting...");
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WebSession {
    session: Session<LocalStorage>,
    physics: ArcadePhysics,
}

#[wasm_bindgen]
impl WebSession {
    /// `tuning_json` may be empty for the stock balance
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, tuning_json: &str) -> Result<WebSession, JsValue> {
        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).map_err(js_error)?
        };
        let store = LocalStorage::open().map_err(js_error)?;
        let physics = ArcadePhysics::from_tuning(&tuning);
        let session = Session::new(crate::sim::builtin_levels(), tuning, store, seed);
        Ok(WebSession { session, physics })
    }

    /// Start from the title screen (level 1)
    pub fn start(&mut self) -> bool {
        self.session.start()
    }

    /// Start a level from level select; false when locked
    pub fn start_level(&mut self, level: u32) -> bool {
        self.session.start_level(level)
    }

    pub fn is_title(&self) -> bool {
        self.session.is_title()
    }

    pub fn high_score(&self) -> u64 {
        self.session.high_score()
    }

    pub fn level_reached(&self) -> u32 {
        self.session.progression().level_reached
    }

    pub fn level_count(&self) -> u32 {
        self.session.level_count()
    }

    pub fn is_level_unlocked(&self, level: u32) -> bool {
        self.session.level_select().is_unlocked(level)
    }

    /// Advance one tick; returns the tick's events as a JSON array
    pub fn tick(&mut self, input_bits: u32) -> Result<String, JsValue> {
        let input = TickInput::from_bits(input_bits);
        let events = self.session.update(&input, &self.physics);
        serde_json::to_string(&events).map_err(js_error)
    }

    /// HUD snapshot as JSON (`null` on the title screen)
    pub fn hud(&self) -> Result<String, JsValue> {
        let hud = self.session.state().map(|s| s.hud());
        serde_json::to_string(&hud).map_err(js_error)
    }
}
