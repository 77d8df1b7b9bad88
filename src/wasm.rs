use crate::{CodegenOptions, TranslateOptions};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn translate_to_sb3(source: &str) -> Result<Vec<u8>, JsValue> {
    translate_to_sb3_with_options(source, "Sprite1", true)
}

#[wasm_bindgen]
pub fn translate_to_sb3_with_options(
    source: &str,
    sprite_name: &str,
    scale_svgs: bool,
) -> Result<Vec<u8>, JsValue> {
    let codegen = CodegenOptions {
        scale_svgs,
        sprite_name: sprite_name.to_string(),
    };
    crate::translate_to_sb3_bytes(source, &TranslateOptions::default(), &codegen)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Block map only, as a JSON string.
#[wasm_bindgen]
pub fn translate_to_json(source: &str) -> String {
    crate::translate_to_json(source, &TranslateOptions::default()).to_string()
}
