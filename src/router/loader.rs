//! Content loaders
//!
//! Each [`Loader`] variant turns a resolved filesystem path into a
//! [`ResponseDescriptor`]. Read failures are returned as
//! [`ServerError::ContentNotFound`] and left for the caller to answer.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ServerError;
use crate::http::mime::{ExtensionEntry, Loader};
use crate::router::Router;
use crate::router::descriptor::{ResponseDescriptor, TextEncoding};

/// Directory under the website root that holds HTML pages.
pub const PAGES_DIR: &str = "Pages";

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

impl Loader {
    pub(crate) fn load(
        &self,
        router: &Router,
        full_path: PathBuf,
        ext: &str,
        entry: &ExtensionEntry,
    ) -> Result<ResponseDescriptor, ServerError> {
        match self {
            Loader::Binary => load_binary(&full_path, entry),
            Loader::Text => load_text(&full_path, entry),
            Loader::Page => load_page(router, full_path, ext, entry),
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>, ServerError> {
    fs::read(path).map_err(|source| ServerError::ContentNotFound {
        path: path.to_path_buf(),
        source,
    })
}

fn load_binary(path: &Path, entry: &ExtensionEntry) -> Result<ResponseDescriptor, ServerError> {
    let data = read(path)?;
    Ok(ResponseDescriptor::new(data, entry.content_type.clone()))
}

fn load_text(path: &Path, entry: &ExtensionEntry) -> Result<ResponseDescriptor, ServerError> {
    let raw = read(path)?;
    let bytes = raw.strip_prefix(UTF8_BOM).unwrap_or(&raw);
    // Invalid sequences become U+FFFD rather than failing the request.
    let text = String::from_utf8_lossy(bytes).into_owned();

    Ok(ResponseDescriptor::new(text.into_bytes(), entry.content_type.clone())
        .with_encoding(TextEncoding::Utf8))
}

fn load_page(
    router: &Router,
    full_path: PathBuf,
    ext: &str,
    entry: &ExtensionEntry,
) -> Result<ResponseDescriptor, ServerError> {
    let root = router.website_root();

    if full_path == root {
        debug!("root request, serving index");
        return router
            .route("GET", "/index.html", &HashMap::new())?
            .ok_or_else(|| ServerError::RouteNotFound {
                path: "/index.html".to_string(),
            });
    }

    let full_path = if ext.is_empty() {
        let mut with_ext = OsString::from(full_path);
        with_ext.push(".html");
        PathBuf::from(with_ext)
    } else {
        full_path
    };

    let page_path = pages_path(root, &full_path);
    load_text(&page_path, entry)
}

/// Moves `full_path` from directly under `root` into `root/Pages`.
pub(crate) fn pages_path(root: &Path, full_path: &Path) -> PathBuf {
    match full_path.strip_prefix(root) {
        Ok(relative) => root.join(PAGES_DIR).join(relative),
        Err(_) => full_path.to_path_buf(),
    }
}
