//! Multipart form handling for listing uploads.
//!
//! Image parts named `images` are written to the configured upload
//! directory and recorded by their public path under `/uploads`. Every
//! other part is kept as a text field.

use std::{
    collections::HashMap,
    path::Path,
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::extract::Multipart;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    validation::FieldErrors,
};

pub const IMAGES_FIELD: &str = "images";
pub const PUBLIC_PREFIX: &str = "/uploads";

#[derive(Debug, Default)]
pub struct UploadedForm {
    fields: HashMap<String, String>,
    pub images: Vec<String>,
}

impl UploadedForm {
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            images: Vec::new(),
        }
    }

    /// Trimmed text value; blank values count as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn required_text(&self, key: &str, errors: &mut FieldErrors) -> String {
        match self.text(key) {
            Some(value) => value,
            None => {
                errors.push(key, format!("{key} is required"));
                String::new()
            }
        }
    }

    /// Parse an optional value; a present but unparsable value is a field
    /// error.
    pub fn parse<T: FromStr>(&self, key: &str, errors: &mut FieldErrors) -> Option<T> {
        let raw = self.text(key)?;
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                errors.push(key, format!("{key} has an invalid value"));
                None
            }
        }
    }

    pub fn required_parse<T: FromStr>(&self, key: &str, errors: &mut FieldErrors) -> Option<T> {
        if self.text(key).is_none() {
            errors.push(key, format!("{key} is required"));
            return None;
        }
        self.parse(key, errors)
    }
}

/// Drain a multipart body, saving at most `max_images` image parts. Images
/// already written are removed again when the body turns out to be bad.
pub async fn read_form(
    mut multipart: Multipart,
    upload_dir: &Path,
    max_images: usize,
) -> AppResult<UploadedForm> {
    let mut form = UploadedForm::default();

    match drain(&mut multipart, upload_dir, max_images, &mut form).await {
        Ok(()) => Ok(form),
        Err(err) => {
            discard(upload_dir, &form.images).await;
            Err(err)
        }
    }
}

async fn drain(
    multipart: &mut Multipart,
    upload_dir: &Path,
    max_images: usize,
    form: &mut UploadedForm,
) -> AppResult<()> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::InvalidInput(err.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        match (name.as_str(), file_name) {
            (IMAGES_FIELD, Some(original)) => {
                if form.images.len() >= max_images {
                    return Err(AppError::InvalidInput(format!(
                        "At most {max_images} images may be uploaded"
                    )));
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| AppError::InvalidInput(err.body_text()))?;
                if bytes.is_empty() {
                    continue;
                }
                let stored = stored_file_name(&name, &original);
                tokio::fs::write(upload_dir.join(&stored), &bytes)
                    .await
                    .map_err(|err| AppError::Internal(err.into()))?;
                tracing::debug!(file = %stored, size = bytes.len(), "stored upload");
                form.images.push(format!("{PUBLIC_PREFIX}/{stored}"));
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| AppError::InvalidInput(err.body_text()))?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(())
}

/// Remove stored uploads by their public path. Paths outside the upload
/// directory are skipped and a file that is already gone is not an error.
pub async fn discard(upload_dir: &Path, images: &[String]) {
    for image in images {
        let Some(stored) = stored_name(image) else {
            tracing::warn!(image = %image, "refusing to remove path outside uploads");
            continue;
        };
        match tokio::fs::remove_file(upload_dir.join(stored)).await {
            Ok(()) => tracing::debug!(file = %stored, "removed upload"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => tracing::warn!(file = %stored, error = %err, "failed to remove upload"),
        }
    }
}

/// Pass `result` through, discarding `images` first when it is an error.
pub async fn discard_on_error<T>(
    upload_dir: &Path,
    images: &[String],
    result: AppResult<T>,
) -> AppResult<T> {
    if result.is_err() {
        discard(upload_dir, images).await;
    }
    result
}

fn stored_name(public_path: &str) -> Option<&str> {
    let name = public_path.strip_prefix(PUBLIC_PREFIX)?.strip_prefix('/')?;
    let plain = !name.is_empty()
        && !name.contains(['/', '\\'])
        && name != "."
        && name != "..";
    plain.then_some(name)
}

/// `<field>-<unix millis>-<random>-<sanitized original name>`
fn stored_file_name(field: &str, original: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{field}-{millis}-{}-{}", &suffix[..8], sanitize(original))
}

fn sanitize(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
