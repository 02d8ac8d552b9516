//! Streaming CSV export of the recipe catalogue.
//!
//! Rows are pulled in id-ordered keyset batches so the whole table is never
//! held in memory. Each call to [`RecipeCsvExporter::next_chunk`] yields one
//! encoded chunk and the cursor for the next call.

use std::borrow::Cow;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};

use super::catalogue_errors::map_catalogue_error;
use super::ports::{RecipeExportRow, RecipeRepository};
use super::{Error, RecipeId};

/// Rows fetched per storage round trip.
pub const EXPORT_BATCH_SIZE: u32 = 1000;

/// Column titles of the export.
pub const CSV_HEADER: [&str; 9] = [
    "ID",
    "Title",
    "Description",
    "Ingredients",
    "Instructions",
    "Category",
    "Author",
    "Author Email",
    "Created At",
];

/// Position of an in-flight export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportCursor {
    /// Nothing emitted yet.
    Header,
    /// Rows with ids above the given one remain.
    Rows(Option<RecipeId>),
    /// Export complete.
    Done,
}

/// Attachment name for an export started at `now`.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use recipe_catalogue::domain::export_filename;
///
/// let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
/// assert_eq!(export_filename(now), "recipes_20250102_030405.csv");
/// ```
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("recipes_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

fn quote(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn push_record<'a>(out: &mut String, fields: impl IntoIterator<Item = Cow<'a, str>>) {
    for (index, field) in fields.into_iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&field);
    }
    out.push('\n');
}

fn push_row(out: &mut String, row: &RecipeExportRow) {
    let created_at = row.created_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    push_record(
        out,
        [
            Cow::Owned(row.id.to_string()),
            quote(&row.title),
            quote(row.description.as_deref().unwrap_or_default()),
            quote(&row.ingredients),
            quote(&row.instructions),
            quote(row.category_name.as_deref().unwrap_or_default()),
            quote(row.author_name.as_deref().unwrap_or_default()),
            quote(row.author_email.as_deref().unwrap_or_default()),
            Cow::Owned(created_at),
        ],
    );
}

/// Produces the CSV export chunk by chunk.
#[derive(Clone)]
pub struct RecipeCsvExporter {
    recipes: Arc<dyn RecipeRepository>,
    batch_size: u32,
}

impl RecipeCsvExporter {
    pub fn new(recipes: Arc<dyn RecipeRepository>) -> Self {
        Self {
            recipes,
            batch_size: EXPORT_BATCH_SIZE,
        }
    }

    /// Override the batch size; zero is treated as one.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Encode the next chunk, or `None` once the export is complete.
    pub async fn next_chunk(&self, cursor: ExportCursor) -> Result<Option<(String, ExportCursor)>, Error> {
        match cursor {
            ExportCursor::Done => Ok(None),
            ExportCursor::Header => {
                let mut out = String::new();
                push_record(&mut out, CSV_HEADER.iter().map(|title| Cow::Borrowed(*title)));
                Ok(Some((out, ExportCursor::Rows(None))))
            }
            ExportCursor::Rows(after) => {
                let rows = self
                    .recipes
                    .export_batch(after, self.batch_size)
                    .await
                    .map_err(map_catalogue_error)?;
                let Some(last) = rows.last().map(|row| row.id) else {
                    return Ok(None);
                };
                let mut out = String::new();
                for row in &rows {
                    push_row(&mut out, row);
                }
                let exhausted = u32::try_from(rows.len()).is_ok_and(|n| n < self.batch_size);
                let next = if exhausted {
                    ExportCursor::Done
                } else {
                    ExportCursor::Rows(Some(last))
                };
                Ok(Some((out, next)))
            }
        }
    }
}
