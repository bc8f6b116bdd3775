use bytes::Bytes;
use http_body_util::Full;
use hyper::{header, http::HeaderValue, Response, StatusCode};
use log::{info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{error_response, with_cors, HttpResponse};
use crate::config::server::{BLACKPAPER_DOWNLOAD_NAME, BLACKPAPER_FILE, BLACKPAPER_PATHS};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Unable to download {0}. Please check that the file exists at src/assets/{0}")]
    NotFound(&'static str),

    #[error("failed to read asset: {0}")]
    Io(#[from] std::io::Error),
}

/// First candidate path under `root` that is an existing file.
pub async fn resolve_blackpaper(root: &Path) -> Result<PathBuf, AssetError> {
    for candidate in BLACKPAPER_PATHS {
        let path = root.join(candidate.trim_start_matches('/'));

        if let Ok(meta) = tokio::fs::metadata(&path).await {
            if meta.is_file() {
                return Ok(path);
            }
        }
    }

    Err(AssetError::NotFound(BLACKPAPER_FILE))
}

async fn load_blackpaper(root: &Path) -> Result<(PathBuf, Vec<u8>), AssetError> {
    let path = resolve_blackpaper(root).await?;
    let content = tokio::fs::read(&path).await?;

    Ok((path, content))
}

pub async fn handle_get_blackpaper(root: &Path) -> HttpResponse {
    match load_blackpaper(root).await {
        Ok((path, content)) => {
            info!("serving {} ({} bytes)", path.display(), content.len());

            let mut response = Response::new(Full::new(Bytes::from(content)));
            let headers = response.headers_mut();

            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
            if let Ok(disposition) = HeaderValue::from_str(&format!(
                "attachment; filename=\"{}\"",
                BLACKPAPER_DOWNLOAD_NAME
            )) {
                headers.insert(header::CONTENT_DISPOSITION, disposition);
            }

            with_cors(response)
        }
        Err(e @ AssetError::NotFound(_)) => {
            warn!("blackpaper: {}", e);
            error_response(StatusCode::NOT_FOUND, &e.to_string())
        }
        Err(e) => {
            warn!("blackpaper: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}
