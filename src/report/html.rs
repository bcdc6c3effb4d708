//! HTML page builders.
//!
//! Pages are assembled with `format!` and share one stylesheet. The
//! dashboard page renders client-side from a JSON document, so the same
//! markup serves the live API and the static `data.json`.

use crate::config::ThemeConfig;
use crate::models::DashboardData;

/// Escape text for HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
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

/// Shared stylesheet, with theme colours as CSS variables.
pub fn stylesheet(theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
  --primary: {primary};
  --secondary: {secondary};
  --info: {info};
  --bg: {background};
}}
body {{ font-family: system-ui, sans-serif; margin: 20px; background: var(--bg); color: #1f2937; }}
h1, h2 {{ color: var(--secondary); }}
a {{ color: var(--info); }}
nav a {{ margin-right: 12px; }}
.button {{ display: inline-block; padding: 8px 14px; border-radius: 6px; background: var(--primary); color: #fff; text-decoration: none; }}
.badge {{ display: inline-block; padding: 2px 6px; border-radius: 4px; background: #eee; }}
.ok {{ background: #16a34a; color: #fff; }}
.warn {{ background: #dc2626; color: #fff; }}
.notice {{ padding: 8px 12px; border-left: 4px solid var(--info); background: #fff; }}
table {{ border-collapse: collapse; width: 100%; background: #fff; }}
th, td {{ border: 1px solid #ddd; padding: 6px; text-align: left; }}
th {{ background: #f3f4f6; }}
.qr {{ width: 160px; border: 1px solid #ddd; padding: 6px; background: #fff; }}
footer {{ font-size: 12px; opacity: .7; margin-top: 24px; }}
"#,
        primary = theme.primary,
        secondary = theme.secondary,
        info = theme.info,
        background = theme.background,
    )
}

/// Wrap a page body in the common document skeleton.
pub fn layout(title: &str, stylesheet_href: &str, head_extra: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="id">
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1"/>
<title>{title}</title>
<link rel="stylesheet" href="{href}"/>
{head_extra}
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
        href = escape(stylesheet_href),
        head_extra = head_extra,
        body = body,
    )
}

/// Badge showing an average and its remark.
pub fn remark_badge(avg: f64, data: &DashboardData) -> String {
    let remark = crate::models::Remark::from_average(avg, data.threshold);
    format!(
        r#"<span class="badge {}">{:.2} – {}</span>"#,
        remark.css_class(),
        avg,
        remark.label()
    )
}

/// Where the dashboard page gets its data and which links it shows.
pub struct DashboardSource<'a> {
    /// URL of the JSON document.
    pub data_url: &'a str,
    /// Navigation HTML shown above the chart.
    pub nav: &'a str,
    /// Footer note.
    pub footer: &'a str,
    /// Stylesheet URL.
    pub stylesheet_href: &'a str,
}

/// Interactive dashboard rendered client-side with Chart.js.
pub fn dashboard_page(source: &DashboardSource<'_>) -> String {
    let head = r#"<script src="https://cdn.jsdelivr.net/npm/chart.js"></script>"#;
    let body = format!(
        r#"<h1>Dashboard CERIA SKM</h1>
<nav>{nav}</nav>
<div id="overview"></div>
<canvas id="chart" height="120"></canvas>
<h2>Ringkasan per Pertanyaan</h2>
<table id="tblSummary"><thead><tr><th>Pertanyaan</th><th>Rata-rata</th><th>Keterangan</th></tr></thead><tbody></tbody></table>
<h2>Ringkasan per Puskesmas</h2>
<p><label>Puskesmas: <select id="filter"><option value="">Semua</option></select></label></p>
<table id="tblGroup"><thead><tr><th>Puskesmas</th><th>Rata-rata</th><th>Keterangan</th></tr></thead><tbody></tbody></table>
<footer>{footer}</footer>
<script>
const DATA_URL = {data_url};
function esc(s) {{
  return String(s).replace(/[&<>"']/g, c => ({{'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;',"'":'&#39;'}})[c]);
}}
function remark(avg, threshold) {{ return avg < threshold ? 'Evaluasi Diperlukan' : 'OK'; }}
function badge(avg, rk) {{
  const cls = rk === 'OK' ? 'ok' : 'warn';
  return `<span class="badge ${{cls}}">${{esc(rk)}}</span>`;
}}
function renderGroups(d, selected) {{
  const tbody = document.querySelector('#tblGroup tbody');
  tbody.innerHTML = '';
  d.grouped.filter(g => !selected || g.name === selected).forEach(g => {{
    tbody.innerHTML += `<tr><td>${{esc(g.name)}}</td><td>${{g.avg.toFixed(2)}}</td><td>${{badge(g.avg, g.remark)}}</td></tr>`;
  }});
}}
async function load() {{
  const res = await fetch(DATA_URL);
  if (!res.ok) {{
    document.getElementById('overview').innerHTML = `<p class="notice">Gagal memuat data (${{res.status}})</p>`;
    return;
  }}
  const d = await res.json();
  document.getElementById('overview').innerHTML =
    `<p>Rata-rata keseluruhan: <span class="badge ${{d.overall_remark === 'OK' ? 'ok' : 'warn'}}">${{d.overall.toFixed(2)}} – ${{esc(d.overall_remark)}}</span> (ambang ${{d.threshold}})</p>`;
  new Chart(document.getElementById('chart').getContext('2d'), {{
    type: 'bar',
    data: {{ labels: d.labels, datasets: [{{ label: 'Rata-rata', data: d.averages,
      backgroundColor: d.averages.map(a => a < d.threshold ? '#dc2626' : '#2563eb') }}] }},
    options: {{ scales: {{ y: {{ beginAtZero: true, max: 4 }} }} }}
  }});
  const tbody = document.querySelector('#tblSummary tbody');
  d.labels.forEach((l, i) => {{
    const avg = d.averages[i];
    tbody.innerHTML += `<tr><td>${{esc(l)}}</td><td>${{avg.toFixed(2)}}</td><td>${{badge(avg, remark(avg, d.threshold))}}</td></tr>`;
  }});
  tbody.innerHTML += `<tr><td><strong>Rata-rata Keseluruhan</strong></td><td><strong>${{d.overall.toFixed(2)}}</strong></td><td>${{badge(d.overall, d.overall_remark)}}</td></tr>`;
  const filter = document.getElementById('filter');
  d.puskesmas_list.forEach(name => {{
    const opt = document.createElement('option');
    opt.value = name;
    opt.textContent = name;
    filter.appendChild(opt);
  }});
  filter.addEventListener('change', () => renderGroups(d, filter.value));
  renderGroups(d, '');
}}
load();
</script>"#,
        nav = source.nav,
        footer = source.footer,
        data_url = serde_json::to_string(source.data_url).unwrap_or_else(|_| "\"\"".to_string()),
    );

    layout("Dashboard – CERIA SKM", source.stylesheet_href, head, &body)
}

/// Landing page of the static snapshot.
pub fn snapshot_index(data: &DashboardData, form_url: &str) -> String {
    let body = format!(
        r#"<h1>CERIA SKM (Snapshot Statis)</h1>
<p>Halaman ini adalah versi <strong>read-only</strong> yang dibangun otomatis dari Google Sheets.
Data terakhir diambil saat snapshot dibuat.</p>
<p><a href="dashboard.html">Lihat Dashboard Interaktif</a> | <a href="summary.csv">Unduh Ringkasan CSV</a> | <a href="full.csv">Unduh Data Penuh CSV</a></p>
<section>
<h2>Ringkasan Cepat</h2>
<p>Rata-rata keseluruhan: {badge}</p>
<img src="qr.png" alt="QR Form" class="qr"/>
<p><small>Form: <a href="{url}" target="_blank">{url}</a></small></p>
</section>
<footer>Dibuat otomatis oleh ceria-skm snapshot</footer>"#,
        badge = remark_badge(data.overall, data),
        url = escape(form_url),
    );

    layout("CERIA SKM – Snapshot", "style.css", "", &body)
}

/// Dashboard page of the static snapshot, fed by `data.json`.
pub fn snapshot_dashboard() -> String {
    dashboard_page(&DashboardSource {
        data_url: "data.json",
        nav: r#"<a href="index.html">&larr; Kembali</a>"#,
        footer: "Snapshot statis – fitur edit/CRUD dinonaktifkan.",
        stylesheet_href: "style.css",
    })
}
