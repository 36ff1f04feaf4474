/// Interactive HTML chart: a single Plotly document.
///
/// The series is embedded as JSON, but Plotly itself is loaded from its CDN
/// when the document is opened. Viewing the chart therefore needs network
/// access to cdn.plot.ly; the file on its own does not render offline.
use crate::error::Result;
use serde_json::json;
use std::io::Write;
use uploadsleuth_core::model::FrequencySeries;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Escape text for use inside HTML element content.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Plotly figure (data + layout) for `series`.
pub fn figure(series: &FrequencySeries, title: &str) -> serde_json::Value {
    let x: Vec<String> = series
        .buckets()
        .iter()
        .map(|b| b.start.format("%Y-%m-%d %H:%M:%S").to_string())
        .collect();
    let y: Vec<u64> = series.buckets().iter().map(|b| b.count).collect();

    json!({
        "data": [{ "x": x, "y": y, "type": "bar" }],
        "layout": {
            "title": { "text": title },
            "xaxis": { "title": { "text": "Interval start (UTC)" } },
            "yaxis": { "title": { "text": "Objects uploaded" } },
            "bargap": 0.05
        }
    })
}

pub fn write_html<W: Write>(out: &mut W, series: &FrequencySeries, title: &str) -> Result<()> {
    // "</" inside an inline script would terminate the element early.
    let figure = serde_json::to_string(&figure(series, title))?.replace("</", "<\\/");
    write!(
        out,
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}"></script>
</head>
<body>
<div id="chart" style="width:100%;height:90vh;"></div>
<script>
const figure = {figure};
Plotly.newPlot("chart", figure.data, figure.layout, {{ responsive: true }});
</script>
</body>
</html>
"#,
        title = escape_html(title),
        cdn = PLOTLY_CDN,
        figure = figure,
    )?;
    Ok(())
}
