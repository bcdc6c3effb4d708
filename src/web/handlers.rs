//! Route handlers.

use super::pages::{self, NoticeKind};
use super::{AppContext, WebError};
use crate::models::DashboardData;
use crate::report::csv::{FULL_FILE_NAME, SUMMARY_FILE_NAME};
use crate::report::{self, html};
use crate::sheets::{row_range, DataSource};
use crate::survey;
use axum::extract::{Form, Path, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

type Ctx<S> = State<Arc<AppContext<S>>>;

const ROW_NOT_FOUND: &str = "Baris tidak ditemukan";

pub async fn index<S: DataSource>(State(ctx): Ctx<S>) -> Html<String> {
    Html(pages::landing(&ctx.sheet.form_url, &ctx.sheet.worksheet))
}

pub async fn dashboard() -> Html<String> {
    Html(pages::dashboard())
}

pub async fn stylesheet<S: DataSource>(State(ctx): Ctx<S>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        html::stylesheet(&ctx.theme),
    )
        .into_response()
}

pub async fn dashboard_data<S: DataSource>(
    State(ctx): Ctx<S>,
) -> Result<Json<DashboardData>, WebError> {
    let table = ctx.connection.source()?.fetch_all().await?;
    debug!("Dashboard data over {} rows", table.row_count());
    Ok(Json(survey::dashboard_data(&table, &ctx.rules)))
}

#[derive(Debug, Deserialize)]
pub struct ManageQuery {
    notice: Option<String>,
    kind: Option<String>,
}

pub async fn manage<S: DataSource>(
    State(ctx): Ctx<S>,
    Query(query): Query<ManageQuery>,
) -> Result<Html<String>, WebError> {
    let table = ctx.connection.source()?.fetch_all().await?;
    debug!("Manage view over {} rows", table.row_count());
    let kind = NoticeKind::parse(query.kind.as_deref().unwrap_or("success"));
    let notice = query.notice.as_deref().map(|m| (m, kind));
    Ok(Html(pages::manage(&table, notice)))
}

/// Spreadsheet row touched by an edit of data row `rownum`.
pub fn edit_sheet_row(rownum: usize) -> usize {
    rownum + 2
}

/// Spreadsheet row removed by a delete of data row `rownum`.
pub fn delete_sheet_row(rownum: usize) -> usize {
    rownum + 1
}

/// Redirect to the manage page carrying a notice.
fn manage_redirect(message: &str, kind: NoticeKind) -> Redirect {
    let target = Url::parse("http://localhost/manage").map(|mut url| {
        url.query_pairs_mut()
            .append_pair("notice", message)
            .append_pair("kind", kind.as_str());
        format!("{}?{}", url.path(), url.query().unwrap_or_default())
    });
    Redirect::to(target.as_deref().unwrap_or("/manage"))
}

pub async fn edit_form<S: DataSource>(
    State(ctx): Ctx<S>,
    Path(rownum): Path<usize>,
) -> Result<Response, WebError> {
    let table = ctx.connection.source()?.fetch_all().await?;
    if !table.contains_row(rownum) {
        return Ok(manage_redirect(ROW_NOT_FOUND, NoticeKind::Error).into_response());
    }

    let current = table.sheet_row(edit_sheet_row(rownum));
    Ok(Html(pages::edit_row(&table.headers, &current, rownum)).into_response())
}

pub async fn edit_submit<S: DataSource>(
    State(ctx): Ctx<S>,
    Path(rownum): Path<usize>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Redirect, WebError> {
    let source = ctx.connection.source()?;
    let table = source.fetch_all().await?;
    if !table.contains_row(rownum) {
        return Ok(manage_redirect(ROW_NOT_FOUND, NoticeKind::Error));
    }

    let values: Vec<String> = (0..table.headers.len())
        .map(|i| form.get(&format!("col_{}", i)).cloned().unwrap_or_default())
        .collect();
    let range = row_range(edit_sheet_row(rownum), table.headers.len());

    source.update_row(&range, values).await?;
    info!("Row {} updated ({})", rownum, range);

    Ok(manage_redirect(
        &format!("Baris {} diperbarui.", rownum),
        NoticeKind::Success,
    ))
}

pub async fn delete_row<S: DataSource>(
    State(ctx): Ctx<S>,
    Path(rownum): Path<usize>,
) -> Result<Json<serde_json::Value>, WebError> {
    let source = ctx.connection.source()?;
    let table = source.fetch_all().await?;
    if !table.contains_row(rownum) {
        return Err(WebError::NotFound(ROW_NOT_FOUND.to_string()));
    }

    source.delete_row(delete_sheet_row(rownum)).await?;
    info!("Row {} deleted", rownum);
    Ok(Json(json!({ "status": "ok" })))
}

fn csv_attachment(file_name: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}

pub async fn export_summary<S: DataSource>(State(ctx): Ctx<S>) -> Result<Response, WebError> {
    let table = ctx.connection.source()?.fetch_all().await?;
    let data = survey::dashboard_data(&table, &ctx.rules);
    Ok(csv_attachment(SUMMARY_FILE_NAME, report::summary_csv(&data)?))
}

pub async fn export_full<S: DataSource>(State(ctx): Ctx<S>) -> Result<Response, WebError> {
    let table = ctx.connection.source()?.fetch_all().await?;
    debug!("Full export of {} rows", table.row_count());
    Ok(csv_attachment(FULL_FILE_NAME, report::full_csv(&table)?))
}

fn qr_cache_control(ttl_seconds: u64) -> String {
    format!("public, max-age={}", ttl_seconds)
}

pub async fn qr_code<S: DataSource>(State(ctx): Ctx<S>) -> Result<Response, WebError> {
    let png = ctx
        .qr_cache
        .get_or_try_refresh(|| report::render_qr_png(&ctx.sheet.form_url))?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CACHE_CONTROL, qr_cache_control(ctx.qr_ttl_seconds)),
        ],
        png,
    )
        .into_response())
}
