use std::collections::BTreeMap;

use serde::Serialize;

use crate::charts::Figure;
use crate::error::DashError;
use crate::table::DataTable;

/// Page chrome: navbar, container and footer around the dashboard.
pub const LAYOUT: &str = include_str!("../assets/layout.html");
const DASHBOARD_JS: &str = include_str!("../assets/dashboard.js");
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

pub const APP_ENTRY: &str = "{%app_entry%}";
pub const CONFIG: &str = "{%config%}";
pub const SCRIPTS: &str = "{%scripts%}";
pub const RENDERER: &str = "{%renderer%}";

const CONFIG_ELEMENT_ID: &str = "_dash-config";

/// A chart slot on the page: heading plus the div plotly draws into.
pub struct Graph<'a> {
    pub id: &'static str,
    pub heading: &'static str,
    pub figure: &'a Figure,
}

#[derive(Serialize)]
struct ClientConfig<'a> {
    figures: BTreeMap<&'static str, &'a Figure>,
    table: &'a DataTable,
}

/// Fill `layout`'s four placeholders with the graphs and the table.
pub fn compose(layout: &str, graphs: &[Graph<'_>], table: &DataTable) -> Result<String, DashError> {
    for placeholder in [APP_ENTRY, CONFIG, SCRIPTS, RENDERER] {
        if !layout.contains(placeholder) {
            return Err(DashError::MissingPlaceholder(placeholder));
        }
    }

    let config = ClientConfig {
        figures: graphs.iter().map(|g| (g.id, g.figure)).collect(),
        table,
    };

    Ok(substitute(
        layout,
        &[
            (APP_ENTRY, app_entry(graphs, table)),
            (CONFIG, config_block(&config)?),
            (SCRIPTS, scripts()),
            (RENDERER, renderer()),
        ],
    ))
}

fn app_entry(graphs: &[Graph<'_>], table: &DataTable) -> String {
    let mut html = String::from("<div id=\"dash-container\">\n");
    for graph in graphs {
        html.push_str(&format!(
            "<br>\n<h5 class=\"lh-1\">{}</h5>\n<div id=\"{}\" class=\"dash-graph\"></div>\n",
            graph.heading, graph.id
        ));
    }
    html.push_str(&format!(
        "<br>\n<h5 class=\"lh-1\">Dataset Browser</h5>\n<br>\n<br>\n<div id=\"{}\"></div>\n</div>",
        table.id
    ));
    html
}

fn config_block(config: &ClientConfig<'_>) -> Result<String, DashError> {
    let json = serde_json::to_string(config)?;
    Ok(format!(
        "<script id=\"{CONFIG_ELEMENT_ID}\" type=\"application/json\">{}</script>",
        escape_script_json(&json)
    ))
}

fn scripts() -> String {
    format!("<script src=\"{PLOTLY_CDN}\" charset=\"utf-8\"></script>\n<script>\n{DASHBOARD_JS}</script>")
}

fn renderer() -> String {
    format!(
        "<script>ClinicDash.render(JSON.parse(document.getElementById(\"{CONFIG_ELEMENT_ID}\").textContent));</script>"
    )
}

/// Keep JSON inert inside a `<script>` element. These characters only appear
/// inside JSON strings, where the `\u` escapes decode to the same text.
fn escape_script_json(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// Single pass over `template`, so placeholder-like text inside a substituted
/// value is never expanded again.
fn substitute(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len() + values.iter().map(|v| v.1.len()).sum::<usize>());
    let mut rest = template;
    loop {
        let next = values
            .iter()
            .filter_map(|(key, value)| rest.find(key).map(|pos| (pos, *key, value)))
            .min_by_key(|(pos, _, _)| *pos);
        match next {
            Some((pos, key, value)) => {
                out.push_str(&rest[..pos]);
                out.push_str(value);
                rest = &rest[pos + key.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}
