use super::chart::{BarChartSpec, ChartBackend, ChartError, ChartSlot};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement};

const BAR_COLOR: &str = "rgba(54, 162, 235, 0.6)";

/// JS binding для Chart.js (подключается в index.html)
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = Chart)]
    pub type ChartJs;

    #[wasm_bindgen(constructor, js_class = "Chart", catch)]
    fn new(context: &JsValue, config: &JsValue) -> Result<ChartJs, JsValue>;

    #[wasm_bindgen(method)]
    fn destroy(this: &ChartJs);
}

/// Столбчатые графики Chart.js на элементах `<canvas>` дашборда
#[derive(Debug, Default)]
pub struct CanvasChartBackend;

impl CanvasChartBackend {
    pub fn new() -> Self {
        Self
    }
}

fn document() -> Result<Document, ChartError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ChartError::Surface("document not available".to_string()))
}

fn bar_config(spec: &BarChartSpec) -> Result<JsValue, ChartError> {
    let config = serde_json::json!({
        "type": "bar",
        "data": {
            "labels": spec.labels,
            "datasets": [{
                "label": spec.series_label,
                "data": spec.values,
                "backgroundColor": BAR_COLOR,
            }],
        },
        "options": { "responsive": true },
    });
    config
        .serialize(&Serializer::json_compatible())
        .map_err(|e| ChartError::Surface(e.to_string()))
}

impl ChartBackend for CanvasChartBackend {
    type Handle = ChartJs;

    fn attach(&mut self, slot: ChartSlot, spec: &BarChartSpec) -> Result<ChartJs, ChartError> {
        let canvas = document()?
            .get_element_by_id(slot.canvas_id())
            .ok_or_else(|| ChartError::Surface(format!("#{} not found", slot.canvas_id())))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| ChartError::Surface(format!("#{} is not a canvas", slot.canvas_id())))?;
        let context = canvas
            .get_context("2d")
            .map_err(|e| ChartError::Surface(format!("{:?}", e)))?
            .ok_or_else(|| ChartError::Surface("2d context not available".to_string()))?;

        let config = bar_config(spec)?;
        ChartJs::new(context.as_ref(), &config).map_err(|e| ChartError::Surface(format!("{:?}", e)))
    }

    fn release(&mut self, slot: ChartSlot, handle: ChartJs) {
        handle.destroy();

        // Заменяем canvas чистой копией, чтобы следующий график получил новый контекст
        let canvas = match document().map(|d| d.get_element_by_id(slot.canvas_id())) {
            Ok(Some(canvas)) => canvas,
            _ => {
                log::warn!("Canvas #{} disappeared before release", slot.canvas_id());
                return;
            }
        };
        let replaced = canvas
            .clone_node_with_deep(true)
            .and_then(|fresh| canvas.replace_with_with_node_1(&fresh));
        if let Err(e) = replaced {
            log::error!("Failed to reset canvas #{}: {:?}", slot.canvas_id(), e);
        }
    }
}
