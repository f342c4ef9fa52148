//! HTML dashboard page
//!
//! Renders a self-contained page: the initial dashboard is embedded as JSON,
//! charts are drawn client-side, and changing the status selector asks the
//! server for a fresh dashboard over the WebSocket.

use crate::dashboard::{DashboardPage, DASHBOARD_TITLE};
use crate::view::StatusFilter;

const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js@4";

/// Render a complete HTML document for `page` with `status` preselected.
pub fn render_page(page: &DashboardPage, status: StatusFilter) -> Result<String, serde_json::Error> {
    let data = embed_json(&serde_json::to_string(page)?);

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
    <script src="{chart_js}"></script>
</head>
<body>
    <aside class="sidebar">
        <h2>Dashboard Filters</h2>
        <label for="status">Delivery Status:</label>
        {selector}
    </aside>
    <main>
        <h1>🛒 {title}</h1>
        {failure}
        <div id="dashboard"></div>
    </main>
    <script id="initial-data" type="application/json">{data}</script>
    <script>{js}</script>
</body>
</html>"#,
        title = DASHBOARD_TITLE,
        css = inline_css(),
        chart_js = CHART_JS_CDN,
        selector = render_selector(status),
        failure = render_failure(page),
        data = data,
        js = inline_javascript(),
    ))
}

/// The four-option status selector.
fn render_selector(selected: StatusFilter) -> String {
    let options: String = StatusFilter::ALL
        .iter()
        .map(|status| {
            let marker = if *status == selected { " selected" } else { "" };
            format!(r#"<option value="{0}"{1}>{0}</option>"#, status, marker)
        })
        .collect();
    format!(r#"<select id="status">{}</select>"#, options)
}

fn render_failure(page: &DashboardPage) -> String {
    match page {
        DashboardPage::Failed { message } => format!(
            r#"<div class="error">{}<br>The dashboard cannot be displayed.</div>"#,
            escape_html(message)
        ),
        DashboardPage::Ready { .. } => String::new(),
    }
}

/// Escape text for safe inclusion in HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON inside a script tag must not contain a closing tag.
fn embed_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn inline_css() -> &'static str {
    r#"
body { margin: 0; font-family: -apple-system, "Segoe UI", Roboto, sans-serif; display: flex; }
.sidebar { width: 220px; min-height: 100vh; padding: 1.5rem; background: #f0f2f6; }
main { flex: 1; padding: 1.5rem 2rem; }
.metrics { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
.metric { padding: 1rem; border-radius: 8px; background: #fafafa; }
.metric .label { color: #555; font-size: 0.9rem; }
.metric .value { font-size: 2rem; font-weight: 600; }
.charts { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
.wide { grid-column: 1 / span 2; }
table { width: 100%; border-collapse: collapse; }
th, td { padding: 0.4rem 0.6rem; border-bottom: 1px solid #ddd; text-align: left; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
.error { padding: 1rem; border-radius: 8px; background: #fde2e2; color: #8a1c1c; }
"#
}

fn inline_javascript() -> &'static str {
    r#"
const charts = [];

function el(tag, attrs, text) {
  const node = document.createElement(tag);
  Object.entries(attrs || {}).forEach(([k, v]) => node.setAttribute(k, v));
  if (text !== undefined) node.textContent = text;
  return node;
}

function chartCanvas(parent, title, cls) {
  const box = el('section', cls ? { class: cls } : {});
  box.appendChild(el('h3', {}, title));
  const canvas = el('canvas');
  box.appendChild(canvas);
  parent.appendChild(box);
  return canvas;
}

function renderFailure(message) {
  charts.splice(0).forEach(c => c.destroy());
  document.querySelectorAll('main > .error').forEach(n => n.remove());
  const root = document.getElementById('dashboard');
  root.replaceChildren(el('div', { class: 'error' }, message + ' The dashboard cannot be displayed.'));
}

function renderDashboard(d) {
  charts.splice(0).forEach(c => c.destroy());
  const root = document.getElementById('dashboard');
  root.replaceChildren();
  document.querySelectorAll('main > .error').forEach(n => n.remove());

  root.appendChild(el('h2', {}, 'Key Metrics (' + d.status + ')'));
  const metrics = el('div', { class: 'metrics' });
  d.metric_cards.forEach(card => {
    const box = el('div', { class: 'metric' });
    box.appendChild(el('div', { class: 'label' }, card.label));
    box.appendChild(el('div', { class: 'value' }, card.display));
    metrics.appendChild(box);
  });
  root.appendChild(metrics);

  root.appendChild(el('h2', {}, 'Charts'));
  const grid = el('div', { class: 'charts' });
  root.appendChild(grid);

  const bar = d.category_chart;
  charts.push(new Chart(chartCanvas(grid, bar.title, 'wide'), {
    type: 'bar',
    data: { labels: bar.series.labels, datasets: [{ label: bar.y_label, data: bar.series.values }] },
    options: { scales: { x: { title: { display: true, text: bar.x_label } } } }
  }));

  const pie = d.payment_chart;
  charts.push(new Chart(chartCanvas(grid, pie.title), {
    type: 'doughnut',
    data: { labels: pie.series.labels, datasets: [{ data: pie.series.values }] },
    options: { cutout: (pie.hole * 100) + '%' }
  }));

  const line = d.monthly_chart;
  const datasets = [{ label: line.y_label, data: line.series.values, pointRadius: line.markers ? 4 : 0 }];
  if (line.reference_line) {
    const ref = line.reference_line;
    datasets.push({
      label: ref.annotation,
      data: line.series.labels.map(() => ref.value),
      borderColor: ref.color,
      borderDash: ref.dash === 'dash' ? [6, 6] : [],
      pointRadius: 0
    });
  }
  charts.push(new Chart(chartCanvas(grid, line.title), {
    type: 'line',
    data: { labels: line.series.labels, datasets: datasets },
    options: { scales: { x: { title: { display: true, text: line.x_label }, ticks: { maxRotation: 45, minRotation: 45 } } } }
  }));

  root.appendChild(el('h2', {}, 'Product Ranking by Sales'));
  const table = el('table');
  const head = el('tr');
  d.product_table.headers.forEach(h => head.appendChild(el('th', {}, h)));
  table.appendChild(head);
  d.product_table.rows.forEach(row => {
    const tr = el('tr');
    tr.appendChild(el('td', {}, row.name));
    tr.appendChild(el('td', { class: 'num' }, row.display_revenue));
    table.appendChild(tr);
  });
  root.appendChild(table);
}

function renderPage(page) {
  if (page.state === 'Ready') renderDashboard(page.dashboard);
  else renderFailure(page.message);
}

renderPage(JSON.parse(document.getElementById('initial-data').textContent));

const select = document.getElementById('status');
const proto = location.protocol === 'https:' ? 'wss://' : 'ws://';
const socket = new WebSocket(proto + location.host + '/ws');

// The page may have been served for another status; resync on connect.
socket.onopen = () => {
  socket.send(JSON.stringify({ type: 'SelectStatus', status: select.value }));
};

socket.onmessage = (event) => {
  const msg = JSON.parse(event.data);
  if (msg.type === 'Dashboard') renderPage({ state: 'Ready', dashboard: msg.dashboard });
  else if (msg.type === 'LoadFailed') renderPage({ state: 'Failed', message: msg.message });
  else if (msg.type === 'Error') console.error(msg.message);
};

select.addEventListener('change', () => {
  if (socket.readyState === WebSocket.OPEN) {
    socket.send(JSON.stringify({ type: 'SelectStatus', status: select.value }));
  } else {
    location.search = '?status=' + encodeURIComponent(select.value);
  }
});
"#
}
