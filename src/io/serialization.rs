// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! ROI interchange files.
//!
//! This module handles exporting and importing ROI snapshots in YAML and
//! JSON formats - either one video's collection or the whole video map -
//! plus the write-only tabular CSV export used for external analysis.
//! Snapshots round-trip exactly: importing an export reproduces identical
//! corner values, order, and count.

use std::fmt::Write as _;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::collection::{RoiCollection, RoiStore};

/// Export one video's collection, format chosen by file extension.
pub fn export_collection(rois: &RoiCollection, path: &Path) -> Result<()> {
    write_snapshot(rois, path)
}

/// Import one video's collection, validating every entry.
pub fn import_collection(path: &Path) -> Result<RoiCollection> {
    let rois: RoiCollection = read_snapshot(path)?;
    if let Some(bad) = rois.iter().position(|r| !r.is_consistent()) {
        return Err(Error::Validation(format!(
            "ROI {} in {} has negative or inconsistent dimensions",
            bad + 1,
            path.display()
        )));
    }
    Ok(rois)
}

/// Export the whole video map.
pub fn export_store(store: &RoiStore, path: &Path) -> Result<()> {
    write_snapshot(store, path)
}

/// Import a whole video map, validating video keys and every rectangle.
pub fn import_store(path: &Path) -> Result<RoiStore> {
    let store: RoiStore = read_snapshot(path)?;
    store.validate()?;
    Ok(store)
}

/// Write one `video,x1,y1,x2,y2` row per ROI, in store order.
pub fn export_csv(store: &RoiStore, path: &Path) -> Result<()> {
    let mut rows = String::new();
    for (video, rois) in store.iter() {
        for roi in rois {
            let (min, max) = (roi.corner(0), roi.corner(1));
            // Infallible: writing into a String cannot error.
            let _ = writeln!(
                rows,
                "{},{},{},{},{}",
                video.display(),
                min.x,
                min.y,
                max.x,
                max.y
            );
        }
    }
    std::fs::write(path, rows)?;
    Ok(())
}

fn write_snapshot<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let text = match format_of(path)? {
        Format::Yaml => serde_yaml::to_string(value)
            .map_err(|e| Error::Parse(format!("failed to encode YAML: {e}")))?,
        Format::Json => serde_json::to_string_pretty(value)
            .map_err(|e| Error::Parse(format!("failed to encode JSON: {e}")))?,
    };
    std::fs::write(path, text)?;
    Ok(())
}

fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = format_of(path)?;
    let text = std::fs::read_to_string(path)?;
    match format {
        Format::Yaml => serde_yaml::from_str(&text)
            .map_err(|e| Error::Parse(format!("{}: {e}", path.display()))),
        Format::Json => serde_json::from_str(&text)
            .map_err(|e| Error::Parse(format!("{}: {e}", path.display()))),
    }
}

enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> Result<Format> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        other => Err(Error::Validation(format!(
            "unsupported snapshot extension: {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roi::{Point, Roi};
    use std::path::PathBuf;

    fn sample_collection() -> RoiCollection {
        let mut rois = RoiCollection::new();
        rois.append(Roi::from_points(Point::new(10, 10), Point::new(50, 60)));
        rois.append(Roi::from_points(Point::new(0, 5), Point::new(7, 9)));
        rois
    }

    fn sample_store() -> RoiStore {
        let mut store = RoiStore::new();
        store.add_video(Path::new("a.mp4")).unwrap();
        store.add_video(Path::new("b.mp4")).unwrap();
        store.set_rois(Path::new("a.mp4"), sample_collection());
        let mut one = RoiCollection::new();
        one.append(Roi::from_points(Point::new(1, 2), Point::new(3, 4)));
        store.set_rois(Path::new("b.mp4"), one);
        store
    }

    #[test]
    fn collection_round_trips_in_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let rois = sample_collection();

        for name in ["rois.json", "rois.yaml"] {
            let path: PathBuf = dir.path().join(name);
            export_collection(&rois, &path).unwrap();
            let restored = import_collection(&path).unwrap();
            assert_eq!(restored, rois);
        }
    }

    #[test]
    fn store_round_trips_with_order_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let store = sample_store();

        for name in ["session.json", "session.yml"] {
            let path = dir.path().join(name);
            export_store(&store, &path).unwrap();
            let restored = import_store(&path).unwrap();
            assert_eq!(restored, store);
            assert_eq!(restored.total_roi_count(), 3);
        }
    }

    #[test]
    fn import_rejects_tampered_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rois.json");
        std::fs::write(
            &path,
            r#"[{"corners":[{"x":50,"y":10},{"x":10,"y":60}],"width":-40,"height":50}]"#,
        )
        .unwrap();
        assert!(matches!(import_collection(&path), Err(Error::Validation(_))));
    }

    #[test]
    fn import_rejects_corrupt_files_and_unknown_extensions() {
        let dir = tempfile::tempdir().unwrap();

        let garbled = dir.path().join("rois.json");
        std::fs::write(&garbled, "{not json").unwrap();
        assert!(matches!(import_collection(&garbled), Err(Error::Parse(_))));

        let unknown = dir.path().join("rois.pkl");
        assert!(matches!(
            import_collection(&unknown),
            Err(Error::Validation(_))
        ));

        let missing = dir.path().join("absent.json");
        assert!(matches!(import_collection(&missing), Err(Error::Io(_))));
    }

    #[test]
    fn store_import_rejects_unsupported_video_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            r#"{"clip.avi":[{"corners":[{"x":0,"y":0},{"x":1,"y":1}],"width":1,"height":1}]}"#,
        )
        .unwrap();
        assert!(matches!(import_store(&path), Err(Error::Validation(_))));
    }

    #[test]
    fn csv_export_writes_one_row_per_roi() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rois.csv");
        export_csv(&sample_store(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(
            rows,
            vec!["a.mp4,10,10,50,60", "a.mp4,0,5,7,9", "b.mp4,1,2,3,4"]
        );
    }
}
