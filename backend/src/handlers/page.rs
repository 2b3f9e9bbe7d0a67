//! Server-rendered prediction form
//!
//! The page is a single HTML document: a sidebar with the current weather, the
//! input form and a small script that posts the form to `/api/v1/predict`.

use axum::{extract::State, response::Html};
use shared::{FunctioningDay, HolidayStatus, Season, WeatherPanel};

use crate::AppState;

/// Numeric input with the bounds enforced by the form
struct NumberField {
    name: &'static str,
    label: &'static str,
    min: Option<&'static str>,
    max: Option<&'static str>,
    step: &'static str,
    value: &'static str,
}

const fn integer(
    name: &'static str,
    label: &'static str,
    min: &'static str,
    max: &'static str,
) -> NumberField {
    NumberField {
        name,
        label,
        min: Some(min),
        max: Some(max),
        step: "1",
        value: min,
    }
}

const fn measurement(name: &'static str, label: &'static str) -> NumberField {
    NumberField {
        name,
        label,
        min: None,
        max: None,
        step: "any",
        value: "0",
    }
}

const LEFT_COLUMN: [NumberField; 7] = [
    integer("month", "Mes (1-12)", "1", "12"),
    integer("day", "Día (1-31)", "1", "31"),
    integer("hour", "Hora (0-23)", "0", "23"),
    measurement("temperature", "Temperatura (°C)"),
    measurement("humidity", "Humedad (%)"),
    NumberField {
        min: Some("0"),
        ..measurement("visibility", "Visibilidad (10 m)")
    },
    measurement("wind_speed", "Velocidad del viento (m/s)"),
];

const RIGHT_COLUMN: [NumberField; 4] = [
    measurement("dew_point_temperature", "Temperatura de rocío (°C)"),
    measurement("solar_radiation", "Radiación solar (MJ/m2)"),
    measurement("rainfall", "Precipitación (mm)"),
    measurement("snowfall", "Nieve (cm)"),
];

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0; display: flex; min-height: 100vh; }
aside { width: 18rem; background: #f0f2f6; padding: 1.5rem; }
aside p { line-height: 0.9; margin-bottom: 2px; }
main { flex: 1; padding: 2rem 3rem; }
form { display: grid; grid-template-columns: 1fr 1fr; gap: 0 2rem; }
label { display: block; margin-top: 0.75rem; font-size: 0.9rem; }
input, select { width: 100%; padding: 0.4rem; box-sizing: border-box; }
button { margin-top: 1.5rem; padding: 0.5rem 1.5rem; }
.error { background: #fde8e8; color: #8a1c1c; padding: 0.75rem; border-radius: 4px; }
.success { background: #e6f4ea; color: #1e5631; padding: 0.75rem; border-radius: 4px; }
"#;

const SCRIPT: &str = r#"
const form = document.getElementById("prediction-form");
const output = document.getElementById("result");
const integers = ["month", "day", "hour"];
form.addEventListener("submit", async (event) => {
  event.preventDefault();
  const body = {};
  for (const [key, value] of new FormData(form).entries()) {
    if (form.elements[key].tagName === "SELECT") {
      body[key] = value;
    } else if (integers.includes(key)) {
      body[key] = parseInt(value, 10);
    } else {
      body[key] = value === "" ? 0 : parseFloat(value);
    }
  }
  try {
    const response = await fetch("/api/v1/predict", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify(body),
    });
    const text = await response.text();
    let data = null;
    try {
      data = JSON.parse(text);
    } catch (_) {}
    if (response.ok && data) {
      output.className = "success";
      output.textContent = data.message_es;
    } else {
      output.className = "error";
      output.textContent = data && data.error ? data.error.message_es : text || response.statusText;
    }
  } catch (err) {
    output.className = "error";
    output.textContent = "Ocurrió un error al realizar la predicción: " + err;
  }
});
"#;

/// Render the form page
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let panel = state.weather.current_panel().await;
    Html(render_page(
        state.weather.city(),
        &panel,
        state.inference.unavailable_reason(),
    ))
}

/// Build the full HTML document
pub fn render_page(city: &str, panel: &WeatherPanel, unavailable_reason: Option<&str>) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Sistema de Predicción de Bicicletas Compartidas</title>\n");
    html.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));

    html.push_str(&render_sidebar(city, panel));

    html.push_str("<main>\n<h1>Sistema de Predicción de Bicicletas Compartidas</h1>\n");
    html.push_str("<p>Ingrese los valores para hacer una predicción:</p>\n");
    if let Some(reason) = unavailable_reason {
        html.push_str(&format!(
            "<div class=\"error\" id=\"model-error\">No se pudo cargar el modelo de predicción: {}</div>\n",
            escape_html(reason)
        ));
    }

    html.push_str("<form id=\"prediction-form\">\n<div>\n");
    for field in &LEFT_COLUMN {
        html.push_str(&render_number(field));
    }
    html.push_str("</div>\n<div>\n");
    for field in &RIGHT_COLUMN {
        html.push_str(&render_number(field));
    }
    html.push_str(&render_select(
        "holiday",
        "¿Es día festivo?",
        HolidayStatus::ALL.map(HolidayStatus::label),
    ));
    html.push_str(&render_select(
        "season",
        "Estación del año",
        Season::ALL.map(Season::label),
    ));
    html.push_str(&render_select(
        "functioning_day",
        "¿Es un día de funcionamiento?",
        FunctioningDay::ALL.map(FunctioningDay::label),
    ));
    html.push_str("</div>\n");

    let disabled = if unavailable_reason.is_some() { " disabled" } else { "" };
    html.push_str(&format!(
        "<div><button type=\"submit\" id=\"predict\"{}>Predecir</button></div>\n</form>\n",
        disabled
    ));
    html.push_str("<div id=\"result\" role=\"status\"></div>\n</main>\n");

    html.push_str(&format!("<script>{}</script>\n</body>\n</html>\n", SCRIPT));
    html
}

fn render_sidebar(city: &str, panel: &WeatherPanel) -> String {
    let mut html = String::from("<aside>\n<h2>Información del sistema</h2>\n");
    html.push_str(
        "<p>Este sistema utiliza un modelo de aprendizaje automático para predecir la cantidad \
         de bicicletas alquiladas basado en diferentes factores climáticos y temporales.</p>\n",
    );

    match panel {
        WeatherPanel::Available { snapshot } => {
            html.push_str(&format!("<h3>Clima actual en {}</h3>\n", escape_html(city)));
            for (label, value) in snapshot.display_rows() {
                html.push_str(&format!(
                    "<p class=\"sidebar-text\">{}: {}</p>\n",
                    label,
                    escape_html(&value)
                ));
            }
        }
        WeatherPanel::Unavailable => {
            html.push_str(
                "<div class=\"error\" id=\"weather-error\">No se pudieron cargar los datos en tiempo real.</div>\n",
            );
        }
    }

    html.push_str("</aside>\n");
    html
}

fn render_number(field: &NumberField) -> String {
    let mut bounds = String::new();
    if let Some(min) = field.min {
        bounds.push_str(&format!(" min=\"{}\"", min));
    }
    if let Some(max) = field.max {
        bounds.push_str(&format!(" max=\"{}\"", max));
    }
    format!(
        "<label for=\"{name}\">{label}</label>\n<input type=\"number\" id=\"{name}\" name=\"{name}\" step=\"{step}\" value=\"{value}\"{bounds} required>\n",
        name = field.name,
        label = field.label,
        step = field.step,
        value = field.value,
        bounds = bounds,
    )
}

fn render_select<const N: usize>(name: &str, label: &str, options: [&str; N]) -> String {
    let mut html = format!(
        "<label for=\"{name}\">{label}</label>\n<select id=\"{name}\" name=\"{name}\">\n",
        name = name,
        label = label
    );
    for option in options {
        let option = escape_html(option);
        html.push_str(&format!("<option value=\"{0}\">{0}</option>\n", option));
    }
    html.push_str("</select>\n");
    html
}

/// Escape text for HTML element content and double-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
