use js_sys::Function;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use folio_motion::{TargetHandle, TargetResolver};
use folio_page::{catalog, PageComposer, PageConfig, PageError, PageInputs};

/// The page runtime behind a JS handle.
#[wasm_bindgen]
pub struct FolioPage {
    core: PageComposer,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn page_error(err: PageError) -> JsError {
    JsError::new(&format!("{} error: {err}", err.category()))
}

struct JsResolver {
    f: Function,
}

impl TargetResolver for JsResolver {
    fn resolve(&mut self, key: &str) -> Option<TargetHandle> {
        // resolver(key) -> string | number | null/undefined
        let arg = JsValue::from_str(key);
        match self.f.call1(&JsValue::UNDEFINED, &arg) {
            Ok(val) => {
                if val.is_undefined() || val.is_null() {
                    return None;
                }
                if let Some(s) = val.as_string() {
                    return Some(s);
                }
                if let Some(n) = val.as_f64() {
                    return Some(if n.fract() == 0.0 {
                        format!("{}", n as i64)
                    } else {
                        format!("{}", n)
                    });
                }
                swb::from_value::<String>(val).ok()
            }
            Err(_) => None,
        }
    }
}

#[wasm_bindgen]
impl FolioPage {
    /// Create a page. Pass a config object, or undefined/null for the site defaults.
    /// Example:
    ///   new FolioPage({ composer: { fallback: { policy: "max_wait", after_ms: 500 } } })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<FolioPage, JsError> {
        console_error_panic_hook::set_once();

        let cfg: PageConfig = if jsvalue_is_undefined_or_null(&config) {
            PageConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        Ok(FolioPage {
            core: PageComposer::new(cfg).map_err(page_error)?,
        })
    }

    /// Install a JS resolver deciding which element keys exist in the DOM.
    /// Call before the first `update`; elements claimed earlier keep their handles.
    #[wasm_bindgen]
    pub fn prebind(&mut self, resolver: Function) {
        self.core.set_resolver(Box::new(JsResolver { f: resolver }));
    }

    /// Step the page by `dt_ms` with inputs (scroll, layout, pointer, commands).
    /// Returns the frame: changes to apply and page events to act on.
    #[wasm_bindgen]
    pub fn update(&mut self, dt_ms: f64, inputs: JsValue) -> Result<JsValue, JsError> {
        let inputs: PageInputs = if jsvalue_is_undefined_or_null(&inputs) {
            PageInputs::default()
        } else {
            swb::from_value(inputs).map_err(|e| JsError::new(&format!("inputs error: {e}")))?
        };
        let frame = self.core.update(dt_ms, &inputs);
        swb::to_value(frame).map_err(|e| JsError::new(&format!("frame error: {e}")))
    }

    /// Snapshot of loader, navigation and form state.
    #[wasm_bindgen]
    pub fn state(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.state()).map_err(|e| JsError::new(&format!("state error: {e}")))
    }

    /// Effective configuration as a JSON string.
    #[wasm_bindgen(js_name = config_json)]
    pub fn config_json(&self) -> Result<String, JsError> {
        self.core.config().to_json().map_err(page_error)
    }

    /// Stop every animation, trigger and timer. Later updates return empty frames.
    #[wasm_bindgen]
    pub fn teardown(&mut self) {
        self.core.teardown();
    }
}

/// Static page content (skills, projects, links) for markup rendering.
#[wasm_bindgen]
pub fn content() -> Result<JsValue, JsError> {
    swb::to_value(&catalog()).map_err(|e| JsError::new(&format!("content error: {e}")))
}

/// Check a config JSON string without building a page.
#[wasm_bindgen(js_name = validate_config)]
pub fn validate_config(json: &str) -> Result<(), JsError> {
    PageConfig::from_json(json).map(|_| ()).map_err(page_error)
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
