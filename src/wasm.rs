use crate::generator::GeneratorOptions;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn generate_arduino(workspace_json: &str) -> Result<String, JsValue> {
    crate::generate_source(workspace_json).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}

#[wasm_bindgen]
pub fn generate_arduino_with_options(
    workspace_json: &str,
    one_based_index: bool,
) -> Result<String, JsValue> {
    let workspace =
        crate::parse_workspace(workspace_json).map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;
    let options = GeneratorOptions {
        one_based_index,
        ..GeneratorOptions::default()
    };
    crate::generate_workspace(&workspace, options).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
