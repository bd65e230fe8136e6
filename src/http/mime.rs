//! Extension registry
//!
//! Maps the extension of a request path to the loader that serves it and the
//! MIME type it is labelled with. The table is built once and only read
//! afterwards, so it can be shared between handlers without locking.

use std::collections::HashMap;

/// How content for an extension is read off disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loader {
    /// Raw bytes, no decoding
    Binary,
    /// Decoded as text and sent UTF-8 encoded
    Text,
    /// HTML pages under the `Pages` directory, with index handling
    Page,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionEntry {
    pub loader: Loader,
    pub content_type: String,
}

impl ExtensionEntry {
    pub fn new(loader: Loader, content_type: impl Into<String>) -> Self {
        Self {
            loader,
            content_type: content_type.into(),
        }
    }
}

/// Extension → (loader, content type) table.
///
/// Keys are matched case-sensitively. The empty key stands for "no
/// extension" and is served as a page.
#[derive(Debug, Clone)]
pub struct ExtensionRegistry {
    entries: HashMap<String, ExtensionEntry>,
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ExtensionRegistry {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The registry every server starts with.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();

        for ext in ["ico", "png", "jpg", "gif", "bmp"] {
            registry.register(ext, ExtensionEntry::new(Loader::Binary, format!("image/{}", ext)));
        }
        registry.register("html", ExtensionEntry::new(Loader::Page, "text/html"));
        registry.register("", ExtensionEntry::new(Loader::Page, "text/html"));
        registry.register("css", ExtensionEntry::new(Loader::Text, "text/css"));
        registry.register("js", ExtensionEntry::new(Loader::Text, "text/javascript"));

        registry
    }

    /// Adds or replaces an entry.
    pub fn register(&mut self, ext: impl Into<String>, entry: ExtensionEntry) {
        self.entries.insert(ext.into(), entry);
    }

    pub fn lookup(&self, ext: &str) -> Option<&ExtensionEntry> {
        self.entries.get(ext)
    }
}

/// Everything after the last `.` in `path`, or "" when there is none.
///
/// ```
/// # use webhost::http::mime::extension_of;
/// assert_eq!(extension_of("/img/logo.min.png"), "png");
/// assert_eq!(extension_of("/about"), "");
/// ```
pub fn extension_of(path: &str) -> &str {
    path.rfind('.').map(|i| &path[i + 1..]).unwrap_or("")
}
