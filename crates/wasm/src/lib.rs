//! JavaScript bindings. A page holds one [`Editor`] per profile, feeds it
//! `frame-update` event payloads, and redraws from the returned commands
//! or SVG.

use crema_core::model::{FrameUpdate, parse_profile};
use crema_core::svg::render_svg;
use crema_core::views::ChartConfig;
use crema_core::{EditorCommand, ProfileEditor};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct Editor {
    inner: ProfileEditor,
}

#[wasm_bindgen]
impl Editor {
    /// Editor over the built-in starter profile.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Editor {
        Editor {
            inner: ProfileEditor::new(),
        }
    }

    /// Load a profile from JSON bytes.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(data: &[u8]) -> Result<Editor, JsError> {
        let profile = parse_profile(data).map_err(|e| JsError::new(&e.to_string()))?;
        let inner = ProfileEditor::with_profile(profile, ChartConfig::default())
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Editor { inner })
    }

    /// Apply a frame update, `{index, ...fields}` or `{index, frame: {...}}`.
    #[wasm_bindgen(js_name = applyUpdate)]
    pub fn apply_update(&mut self, json: &str) -> Result<(), JsError> {
        let update: FrameUpdate =
            serde_json::from_str(json).map_err(|e| JsError::new(&e.to_string()))?;
        self.run(EditorCommand::UpdateFrame(update))
    }

    /// Append a default frame; returns its index.
    #[wasm_bindgen(js_name = addFrame)]
    pub fn add_frame(&mut self) -> usize {
        self.inner.add_frame()
    }

    #[wasm_bindgen(js_name = renameProfile)]
    pub fn rename_profile(&mut self, name: String) -> Result<(), JsError> {
        self.run(EditorCommand::RenameProfile(name))
    }

    /// Highlight a frame; negative values clear the highlight.
    pub fn select(&mut self, index: i32) {
        self.inner.select(usize::try_from(index).ok());
    }

    /// Highlighted frame index, or -1 when none.
    pub fn highlight(&self) -> i32 {
        self.inner
            .highlight()
            .and_then(|i| i32::try_from(i).ok())
            .unwrap_or(-1)
    }

    #[wasm_bindgen(js_name = frameCount)]
    pub fn frame_count(&self) -> usize {
        self.inner.profile().frames.len()
    }

    /// Chart render commands as JSON.
    #[wasm_bindgen(js_name = chartCommands)]
    pub fn chart_commands(&mut self, width: f64, height: f64) -> Result<String, JsError> {
        self.inner.set_chart_size(width, height);
        to_json(&self.inner.render_chart())
    }

    /// Chart as a standalone SVG document.
    #[wasm_bindgen(js_name = chartSvg)]
    pub fn chart_svg(&mut self, width: f64, height: f64, dark: bool) -> String {
        self.inner.set_chart_size(width, height);
        render_svg(&self.inner.render_chart(), width, height, dark)
    }

    /// Current scale factors as JSON.
    #[wasm_bindgen(js_name = chartScales)]
    pub fn chart_scales(&self) -> Result<String, JsError> {
        to_json(&self.inner.chart().scales())
    }

    /// Pretty-printed profile JSON.
    #[wasm_bindgen(js_name = profileJson)]
    pub fn profile_json(&self) -> Result<String, JsError> {
        self.inner
            .to_json_pretty()
            .map_err(|e| JsError::new(&e.to_string()))
    }
}

impl Editor {
    fn run(&mut self, command: EditorCommand) -> Result<(), JsError> {
        self.inner.dispatch(command);
        match self.inner.drain().into_iter().next() {
            Some(e) => Err(JsError::new(&e.to_string())),
            None => Ok(()),
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&e.to_string()))
}
