use webhost::http::mime::{ExtensionEntry, ExtensionRegistry, Loader, extension_of};

#[test]
fn test_builtin_image_entries() {
    let registry = ExtensionRegistry::builtin();

    for ext in ["ico", "png", "jpg", "gif", "bmp"] {
        let entry = registry.lookup(ext).unwrap();
        assert_eq!(entry.loader, Loader::Binary);
        assert_eq!(entry.content_type, format!("image/{}", ext));
    }
}

#[test]
fn test_builtin_text_and_page_entries() {
    let registry = ExtensionRegistry::builtin();

    assert_eq!(
        registry.lookup("css"),
        Some(&ExtensionEntry::new(Loader::Text, "text/css"))
    );
    assert_eq!(
        registry.lookup("js"),
        Some(&ExtensionEntry::new(Loader::Text, "text/javascript"))
    );
    assert_eq!(
        registry.lookup("html"),
        Some(&ExtensionEntry::new(Loader::Page, "text/html"))
    );
    assert_eq!(
        registry.lookup(""),
        Some(&ExtensionEntry::new(Loader::Page, "text/html"))
    );
    assert!(registry.lookup("txt").is_none());
    assert!(registry.lookup("htm").is_none());
}

#[test]
fn test_unknown_and_case_mismatch_not_found() {
    let registry = ExtensionRegistry::builtin();

    assert!(registry.lookup("xyz").is_none());
    assert!(registry.lookup("PNG").is_none());
    assert!(registry.lookup("Html").is_none());
}

#[test]
fn test_register_extends_table() {
    let mut registry = ExtensionRegistry::builtin();
    registry.register("svg", ExtensionEntry::new(Loader::Text, "image/svg+xml"));

    assert_eq!(registry.lookup("svg").unwrap().content_type, "image/svg+xml");
}

#[test]
fn test_extension_of() {
    assert_eq!(extension_of("/index.html"), "html");
    assert_eq!(extension_of("/archive.tar.gz"), "gz");
    assert_eq!(extension_of("/about"), "");
    assert_eq!(extension_of("/"), "");
    assert_eq!(extension_of("/trailing."), "");
}
