use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::model::MapGeometry;
use crate::domain::ports::{RenderPort, Storage};
use crate::utils::error::{MapError, Result};
use crate::utils::validation::validate_container_id;

pub const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";

/// Render port that turns the chart calls into a standalone HTML page.
///
/// Options are merged the way `setOption` merges them in the browser:
/// objects merge key by key, arrays and scalars are replaced.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    container_id: Option<String>,
    maps: BTreeMap<String, Value>,
    option: Value,
    resize_subscribed: bool,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn option(&self) -> &Value {
        &self.option
    }

    pub fn to_html(&self) -> Result<String> {
        let container_id = self.container_id.as_deref().ok_or_else(|| MapError::RenderError {
            message: "no container bound, initialize the map first".to_string(),
        })?;

        let mut script = String::new();
        script.push_str(&format!(
            "const chart = echarts.init(document.getElementById(\"{}\"));\n",
            container_id
        ));
        for (name, geometry) in &self.maps {
            script.push_str(&format!(
                "echarts.registerMap({}, {});\n",
                embed_json(&Value::String(name.clone()))?,
                embed_json(geometry)?
            ));
        }
        script.push_str(&format!("const option = {};\n", embed_json(&self.option)?));
        // animationDelay 需要函數，無法放在 JSON 裡
        script.push_str(
            "if (option.animationDelayStep) {\n  const step = option.animationDelayStep;\n  option.animationDelay = (idx) => idx * step;\n}\n",
        );
        script.push_str("chart.setOption(option);\n");
        if self.resize_subscribed {
            script.push_str("window.addEventListener(\"resize\", () => chart.resize());\n");
        }

        let title = self.option["title"]["text"].as_str().unwrap_or("Map");

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}"></script>
<style>
html, body {{ margin: 0; height: 100%; background: #0f172a; }}
#{id} {{ width: 100%; height: 100%; }}
</style>
</head>
<body>
<div id="{id}"></div>
<script>
{script}</script>
</body>
</html>
"#,
            title = escape_text(title),
            cdn = ECHARTS_CDN,
            id = container_id,
            script = script,
        ))
    }

    /// Writes the page through `storage` under `file_name`.
    pub async fn publish<S: Storage>(&self, storage: &S, file_name: &str) -> Result<()> {
        let html = self.to_html()?;
        tracing::debug!("Writing {} bytes of HTML to {}", html.len(), file_name);
        storage.write_file(file_name, html.as_bytes()).await
    }
}

impl RenderPort for HtmlRenderer {
    fn bind(&mut self, container_id: &str) -> Result<()> {
        // id 會直接寫進 HTML 與 JS
        validate_container_id("container_id", container_id)?;
        self.container_id = Some(container_id.to_string());
        Ok(())
    }

    fn register_map(&mut self, name: &str, geometry: &MapGeometry) -> Result<()> {
        self.maps.insert(name.to_string(), geometry.as_value().clone());
        Ok(())
    }

    fn set_option(&mut self, option: &Value) -> Result<()> {
        if !option.is_object() {
            return Err(MapError::RenderError {
                message: "chart option must be a JSON object".to_string(),
            });
        }
        merge_option(&mut self.option, option);
        Ok(())
    }

    fn subscribe_resize(&mut self) -> Result<()> {
        self.resize_subscribed = true;
        Ok(())
    }

    fn resize(&mut self) -> Result<()> {
        // 靜態頁面的尺寸由瀏覽器端的 resize 監聽處理
        tracing::debug!(
            "Resize requested for #{}, handled by the page's resize listener",
            self.container_id.as_deref().unwrap_or("<unbound>")
        );
        Ok(())
    }
}

fn merge_option(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                let nested = value.is_object() && target.get(key).is_some_and(Value::is_object);
                match target.get_mut(key) {
                    Some(existing) if nested => merge_option(existing, value),
                    _ => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

/// JSON that is safe to drop inside a `<script>` element: no markup
/// characters survive, so neither `</script>` nor `<!--` can appear.
fn embed_json(value: &Value) -> Result<String> {
    let json = serde_json::to_string(value)?;
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(c),
        }
    }
    Ok(out)
}

fn escape_text(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
