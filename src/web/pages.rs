//! Pages of the live web application.

use crate::models::Table;
use crate::report::html::{dashboard_page, escape, layout, DashboardSource};

const STYLESHEET: &str = "/static/style.css";

const NAV: &str = r#"<a href="/">Beranda</a> <a href="/dashboard">Dashboard</a> <a href="/manage">Kelola Data</a> <a href="/export/summary.csv">Ringkasan CSV</a> <a href="/export/full.csv">Data Penuh CSV</a>"#;

/// Kind of notice shown after an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "error" => NoticeKind::Error,
            _ => NoticeKind::Success,
        }
    }
}

/// Landing page: form link, QR code and worksheet name.
pub fn landing(form_url: &str, worksheet: &str) -> String {
    let body = format!(
        r#"<h1>CERIA SKM</h1>
<p>Survei Kepuasan Masyarakat. Isi survei melalui tautan atau pindai kode QR di bawah.</p>
<p><a class="button" href="{url}" target="_blank">Isi Survei</a></p>
<img src="/qr" alt="QR Form" class="qr"/>
<p><small>Sumber data: lembar <strong>{worksheet}</strong></small></p>
<nav>{nav}</nav>"#,
        url = escape(form_url),
        worksheet = escape(worksheet),
        nav = NAV,
    );
    layout("CERIA SKM", STYLESHEET, "", &body)
}

/// Interactive dashboard fed by `/api/dashboard-data`.
pub fn dashboard() -> String {
    dashboard_page(&DashboardSource {
        data_url: "/api/dashboard-data",
        nav: NAV,
        footer: "Data dihitung ulang pada setiap permintaan.",
        stylesheet_href: STYLESHEET,
    })
}

/// Raw table with edit and delete actions per row.
pub fn manage(table: &Table, notice: Option<(&str, NoticeKind)>) -> String {
    let mut body = String::new();
    body.push_str("<h1>Kelola Data</h1>\n");
    body.push_str(&format!("<nav>{}</nav>\n", NAV));

    if let Some((message, kind)) = notice {
        body.push_str(&format!(
            "<p class=\"notice {}\">{}</p>\n",
            kind.as_str(),
            escape(message)
        ));
    }

    body.push_str("<table>\n<thead><tr><th>#</th>");
    for header in &table.headers {
        body.push_str(&format!("<th>{}</th>", escape(header)));
    }
    body.push_str("<th>Aksi</th></tr></thead>\n<tbody>\n");

    for (i, row) in table.rows.iter().enumerate() {
        let rownum = i + 1;
        body.push_str(&format!("<tr><td>{}</td>", rownum));
        for cell in table.pad_row(row) {
            body.push_str(&format!("<td>{}</td>", escape(&cell)));
        }
        body.push_str(&format!(
            "<td><a href=\"/edit/{n}\">Ubah</a> <button onclick=\"hapus({n})\">Hapus</button></td></tr>\n",
            n = rownum
        ));
    }
    body.push_str("</tbody>\n</table>\n");

    body.push_str(
        r#"<script>
async function hapus(n) {
  if (!confirm('Hapus baris ' + n + '?')) return;
  const res = await fetch('/delete/' + n, { method: 'POST' });
  const d = await res.json();
  if (res.ok) { location.reload(); } else { alert(d.error || 'Gagal menghapus'); }
}
</script>"#,
    );

    layout("Kelola Data – CERIA SKM", STYLESHEET, "", &body)
}

/// Edit form with one `col_{i}` field per header.
pub fn edit_row(headers: &[String], current: &[String], rownum: usize) -> String {
    let mut body = format!(
        "<h1>Ubah Baris {n}</h1>\n<nav>{nav}</nav>\n<form method=\"post\" action=\"/edit/{n}\">\n<table>\n",
        n = rownum,
        nav = NAV
    );

    for (i, header) in headers.iter().enumerate() {
        let value = current.get(i).map(String::as_str).unwrap_or("");
        body.push_str(&format!(
            "<tr><th><label for=\"col_{i}\">{label}</label></th><td><input id=\"col_{i}\" name=\"col_{i}\" value=\"{value}\"/></td></tr>\n",
            i = i,
            label = escape(header),
            value = escape(value),
        ));
    }

    body.push_str("</table>\n<p><button class=\"button\" type=\"submit\">Simpan</button> <a href=\"/manage\">Batal</a></p>\n</form>");

    layout("Ubah Baris – CERIA SKM", STYLESHEET, "", &body)
}
