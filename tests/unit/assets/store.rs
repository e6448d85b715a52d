use super::*;

fn tiny() -> PreparedImage {
    PreparedImage::from_rgba(image::RgbaImage::from_pixel(
        3,
        2,
        image::Rgba([10, 20, 30, 255]),
    ))
}

#[test]
fn normalize_rel_path_rules() {
    assert_eq!(normalize_rel_path("a/./b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("../up.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn lookups_use_normalized_keys() {
    let mut store = PreparedAssetStore::new("unused");
    store.insert("img/./input.png", tiny()).unwrap();
    assert!(store.contains("img/input.png"));
    assert_eq!(store.image("img\\input.png").map(|i| i.width), Some(3));
    assert!(store.image("img/other.png").is_none());
    assert!(NoAssets.image("img/input.png").is_none());
}

#[test]
fn preload_skips_missing_files() {
    let dir = std::env::temp_dir().join(format!("choreo_store_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let mut bytes = std::io::Cursor::new(Vec::new());
    image::RgbaImage::from_pixel(1, 1, image::Rgba([1, 2, 3, 255]))
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    std::fs::write(dir.join("ok.png"), bytes.get_ref()).unwrap();

    let mut store = PreparedAssetStore::new(&dir);
    let loaded = store.preload(["ok.png", "missing.png"]);
    assert_eq!(loaded, 1);
    assert!(store.contains("ok.png"));
    assert!(store.load("missing.png").is_err());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn retain_evicts_entries() {
    let mut store = PreparedAssetStore::new("unused");
    store.insert("frame_0001.jpg", tiny()).unwrap();
    store.insert("frame_0050.jpg", tiny()).unwrap();
    store.retain(|k| k.ends_with("0050.jpg"));
    assert_eq!(store.len(), 1);
    assert!(store.contains("frame_0050.jpg"));
}
