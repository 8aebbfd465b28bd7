use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

use crate::core::{Model, ModelSlot};

pub async fn fetch_bytes(url: &str) -> anyhow::Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let resp_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow::anyhow!("fetch failed: {:?}", e))?;
    let resp: web::Response = resp_value
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    if !resp.ok() {
        anyhow::bail!("HTTP {} {}", resp.status(), resp.status_text());
    }
    let buf = JsFuture::from(resp.array_buffer().map_err(|e| anyhow::anyhow!("{:?}", e))?)
        .await
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

pub async fn load_model(url: &str) -> anyhow::Result<Model> {
    let bytes = fetch_bytes(url).await?;
    Ok(Model::from_glb(&bytes)?)
}

/// Load the model in the background and drop it into `slot` when ready.
///
/// Failures are logged; the scene keeps rendering without the model.
pub fn spawn_load_model(url: String, slot: ModelSlot) {
    spawn_local(async move {
        match load_model(&url).await {
            Ok(model) => {
                let triangles = model.triangle_count();
                let meshes = model.meshes.len();
                if slot.fill(model) {
                    log::info!(
                        "model loaded: {} ({} meshes, {} triangles)",
                        url,
                        meshes,
                        triangles
                    );
                }
            }
            Err(e) => log::error!("model load failed ({}): {:#}", url, e),
        }
    });
}
