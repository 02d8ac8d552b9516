//! Streaming CSV export.
//!
//! ```text
//! GET /api/recipes/export-csv
//! ```
//!
//! The body is produced chunk by chunk while the client reads it. A storage
//! failure after the first chunk has been sent can only abort the stream.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::web::Bytes;
use actix_web::{HttpResponse, get, web};
use chrono::Utc;
use futures_util::stream;
use tracing::error;

use crate::domain::{Error, ExportCursor, RecipeCsvExporter, export_filename};
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

fn chunks(
    exporter: RecipeCsvExporter,
) -> impl futures_util::Stream<Item = Result<Bytes, Error>> + 'static {
    stream::try_unfold(ExportCursor::Header, move |cursor| {
        let exporter = exporter.clone();
        async move {
            let next = exporter.next_chunk(cursor).await.inspect_err(|err| {
                error!(error = %err, "recipe export aborted");
            })?;
            Ok(next.map(|(chunk, cursor)| (Bytes::from(chunk), cursor)))
        }
    })
}

/// Download every recipe as CSV.
#[utoipa::path(
    get,
    path = "/api/recipes/export-csv",
    responses(
        (
            status = 200,
            description = "CSV attachment",
            content_type = "text/csv",
            headers(("Content-Disposition" = String, description = "attachment; filename=\"recipes_YYYYMMDD_HHMMSS.csv\"")),
            body = String
        ),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "exportRecipesCsv",
    security(("BearerAuth" = []))
)]
#[get("/recipes/export-csv")]
pub async fn export_csv(state: web::Data<HttpState>, _caller: Authenticated) -> HttpResponse {
    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(export_filename(Utc::now()))],
    };
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(disposition)
        .streaming(chunks(state.exporter.clone()))
}
