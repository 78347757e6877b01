//! HTTP surface: the form page and the predict endpoint.
//!
//! One page, one JSON endpoint. The page is an embedded HTML template whose
//! widget options are rendered server-side from the [`AppContext`] when the
//! page is requested; submissions go to `/api/predict` and the formatted
//! price is displayed in place without a reload.

use crate::align::Selection;
use crate::context::AppContext;
use crate::error::PredictError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Build the application router over a shared context.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/predict", post(predict))
        .route("/api/health", get(health))
        .with_state(ctx)
}

/// Error responses for the HTTP layer.
#[derive(Debug)]
pub(crate) enum ServerError {
    UnprocessableEntity(String),
    Internal(String),
}

impl From<PredictError> for ServerError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::UnknownCategory { .. } => {
                ServerError::UnprocessableEntity(err.to_string())
            }
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServerError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ServerError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

async fn index(State(ctx): State<Arc<AppContext>>) -> Html<String> {
    Html(render_index(&ctx))
}

async fn predict(
    State(ctx): State<Arc<AppContext>>,
    Json(selection): Json<Selection>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let prediction = ctx.predict(&selection).map_err(|err| {
        warn!(town = %selection.town, error = %err, "prediction rejected");
        err
    })?;

    info!(
        town = %selection.town,
        flat_type = %selection.flat_type,
        prediction,
        "prediction served"
    );

    Ok(Json(serde_json::json!({
        "prediction": prediction,
        "formatted": format_sgd(prediction),
    })))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Format a prediction as Singapore dollars: `$1,234,567.89`.
pub fn format_sgd(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, fraction)
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn render_options<T: std::fmt::Display>(values: &[T], selected: Option<&str>) -> String {
    let mut out = String::new();
    for value in values {
        let text = value.to_string();
        let escaped = escape_html(&text);
        let flag = if selected == Some(text.as_str()) {
            " selected"
        } else {
            ""
        };
        out.push_str(&format!(
            "<option value=\"{0}\"{1}>{0}</option>",
            escaped, flag
        ));
    }
    out
}

/// Render the form page with widgets populated from the context.
pub fn render_index(ctx: &AppContext) -> String {
    INDEX_TEMPLATE
        .replace("%TOWN_OPTIONS%", &render_options(ctx.town_options(), None))
        .replace(
            "%FLAT_TYPE_OPTIONS%",
            &render_options(ctx.flat_type_options(), None),
        )
        .replace(
            "%FLAT_MODEL_OPTIONS%",
            &render_options(ctx.flat_model_options(), None),
        )
        .replace(
            "%STOREY_OPTIONS%",
            &render_options(ctx.catalog().storeys(), None),
        )
        .replace("%YEAR_OPTIONS%", &render_options(ctx.year_options(), None))
        .replace(
            "%LEASE_OPTIONS%",
            &render_options(ctx.remaining_lease_years_options(), Some("60")),
        )
}

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>HDB Resale Price Predictor</title>
<style>
body{margin:0;min-height:100vh;font-family:system-ui,sans-serif;font-size:18px;line-height:1.6;color:#fff;background:linear-gradient(rgba(0,0,0,0.7),rgba(0,0,0,0.7)),#1c2733;background-attachment:fixed}
main{max-width:880px;margin:0 auto;padding:32px 24px}
.card{background:rgba(255,255,255,0.06);border-radius:10px;padding:24px;margin-bottom:24px}
.grid{display:grid;grid-template-columns:1fr 1fr;gap:16px 24px}
label{display:block;font-size:15px;margin-bottom:4px;color:#cfd8e3}
select,input[type=range]{width:100%}
select{background:#263445;color:#fff;border:1px solid #3d4f63;border-radius:6px;padding:8px}
.help{font-size:13px;color:#9fb0c3}
button{background:#0a84ff;color:#fff;border:none;border-radius:8px;padding:12px 28px;font-size:17px;cursor:pointer}
button:hover{background:#0060df}
.result{display:none;background:green;border-radius:10px;padding:20px;margin-top:20px}
.result h3{margin:0;color:#fff}
.error{display:none;background:#8b1e1e;border-radius:10px;padding:14px;margin-top:20px}
table{border-collapse:collapse;width:100%;background:#f0f0f0;color:#000}
th{background:#006699;color:#fff;text-align:left}
th,td{border:1px solid #000;padding:6px 10px}
#summary{display:none;margin-top:16px}
</style>
</head>
<body>
<main>
<h1>HDB Resale Price Predictor &#127970;</h1>
<div class="card">
<h3>About This App</h3>
<p>This web application predicts the resale price of HDB flats in Singapore
based on historical transaction data. Select the relevant property details
&mdash; such as town, flat type, model, storey, year of sale, remaining lease
years, and floor area &mdash; and click &quot;Predict Price&quot; to get an
estimated resale value for the flat.</p>
</div>
<div class="card">
<h2>Predict your HDB Resale Price here</h2>
<div class="grid">
<div><label for="town">Town Name</label><select id="town">%TOWN_OPTIONS%</select></div>
<div><label for="storey">Storey</label><select id="storey">%STOREY_OPTIONS%</select></div>
<div><label for="flat_type">Flat Type</label><select id="flat_type">%FLAT_TYPE_OPTIONS%</select></div>
<div><label for="year">Year of Sale</label><select id="year">%YEAR_OPTIONS%</select></div>
<div><label for="flat_model">Flat Model</label><select id="flat_model">%FLAT_MODEL_OPTIONS%</select></div>
<div><label for="remaining_lease_years">Remaining Lease Years</label><select id="remaining_lease_years">%LEASE_OPTIONS%</select></div>
</div>
<div style="margin-top:16px">
<label for="floor_area_sqm">Floor Area (sqm): <span id="floor_area_value">80</span></label>
<input type="range" id="floor_area_sqm" min="20" max="200" step="1" value="80">
<div class="help">Typical HDB units range between 60&ndash;150 sqm</div>
</div>
<div style="margin-top:20px"><button id="predict">Predict Price</button></div>
<div class="result" id="result"><h3 id="result_text"></h3></div>
<div class="error" id="error"></div>
<div style="margin-top:20px">
<label><input type="checkbox" id="show_summary"> Show input summary</label>
<div id="summary">
<h3>&#128269; Your Selected HDB Flat Details</h3>
<table>
<tr><th>Feature</th><th>Your Input</th></tr>
<tr><td>Town</td><td id="sum_town"></td></tr>
<tr><td>Flat Type</td><td id="sum_flat_type"></td></tr>
<tr><td>Flat Model</td><td id="sum_flat_model"></td></tr>
<tr><td>Storey (approx.)</td><td id="sum_storey"></td></tr>
<tr><td>Year of Sale</td><td id="sum_year"></td></tr>
<tr><td>Remaining Lease (years)</td><td id="sum_lease"></td></tr>
<tr><td>Floor Area (sqm)</td><td id="sum_floor_area"></td></tr>
</table>
</div>
</div>
</div>
</main>
<script>
const area = document.getElementById('floor_area_sqm');
area.addEventListener('input', () => {
  document.getElementById('floor_area_value').textContent = area.value;
  refreshSummary();
});
function selection() {
  return {
    town: document.getElementById('town').value,
    flat_type: document.getElementById('flat_type').value,
    flat_model: document.getElementById('flat_model').value,
    storey: parseInt(document.getElementById('storey').value, 10),
    year: parseInt(document.getElementById('year').value, 10),
    remaining_lease_years: parseInt(document.getElementById('remaining_lease_years').value, 10),
    floor_area_sqm: parseFloat(area.value),
  };
}
function refreshSummary() {
  const s = selection();
  document.getElementById('sum_town').textContent = s.town;
  document.getElementById('sum_flat_type').textContent = s.flat_type;
  document.getElementById('sum_flat_model').textContent = s.flat_model;
  document.getElementById('sum_storey').textContent = s.storey;
  document.getElementById('sum_year').textContent = s.year;
  document.getElementById('sum_lease').textContent = s.remaining_lease_years;
  document.getElementById('sum_floor_area').textContent = s.floor_area_sqm;
}
for (const id of ['town','flat_type','flat_model','storey','year','remaining_lease_years']) {
  document.getElementById(id).addEventListener('change', refreshSummary);
}
document.getElementById('show_summary').addEventListener('change', (e) => {
  refreshSummary();
  document.getElementById('summary').style.display = e.target.checked ? 'block' : 'none';
});
document.getElementById('predict').addEventListener('click', async () => {
  const resultBox = document.getElementById('result');
  const errorBox = document.getElementById('error');
  resultBox.style.display = 'none';
  errorBox.style.display = 'none';
  try {
    const response = await fetch('/api/predict', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(selection()),
    });
    const body = await response.json();
    if (!response.ok) {
      errorBox.textContent = body.error || 'Prediction failed';
      errorBox.style.display = 'block';
      return;
    }
    document.getElementById('result_text').textContent =
      'Predicted Resale Price: ' + body.formatted;
    resultBox.style.display = 'block';
  } catch (err) {
    errorBox.textContent = String(err);
    errorBox.style.display = 'block';
  }
});
</script>
</body>
</html>"#;
