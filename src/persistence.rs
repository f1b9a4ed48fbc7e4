//! Project persistence.
//!
//! Storage is reached through [`ProjectReader`] and [`ProjectWriter`]; the
//! board never knows how records are kept. [`JsonProjectFile`] is a small
//! single-file implementation and [`MemoryProject`] keeps everything in
//! memory for hosts that manage storage themselves.
//!
//! Records carry rotation in radians and the original encoded image bytes.
//! The flip flag is stored instead of mirrored bytes.

use crate::constants::PROJECT_VERSION;
use crate::error::{BoardError, BoardResult};
use crate::geometry::Point;
use crate::types::{Item, ItemConfig, ItemId};
use crate::viewport::Viewport;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Serde adapter storing byte vectors as standard base64 strings.
mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text).map_err(serde::de::Error::custom)
    }
}

/// One persisted item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub path: String,
    #[serde(rename = "type")]
    pub format: String,
    pub ctime: f64,
    pub mtime: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Radians
    pub rotation: f64,
    pub scale: f64,
    pub flip: bool,
    #[serde(default)]
    pub centered: bool,
    #[serde(with = "base64_bytes")]
    pub image: Vec<u8>,
}

impl ItemRecord {
    pub fn from_item(item: &Item) -> Self {
        let position = item.position();
        Self {
            id: item.id,
            path: item.path.clone(),
            format: item.format.clone(),
            ctime: item.created,
            mtime: item.modified,
            x: position.x,
            y: position.y,
            z: item.z(),
            rotation: item.rotation().to_radians(),
            scale: item.scale(),
            flip: item.is_flipped(),
            centered: item.is_centered(),
            image: item.source.to_vec(),
        }
    }

    /// Creation config for this record, given its decoded (unflipped) pixels.
    pub fn to_config(&self, pixels: RgbaImage) -> ItemConfig {
        let scale = if self.scale > 0.0 { self.scale } else { 1.0 };
        ItemConfig::new(self.id, pixels)
            .with_path(self.path.clone())
            .with_format(self.format.clone())
            .at(Point::new(self.x, self.y))
            .with_scale(scale)
            .with_rotation(self.rotation.to_degrees())
            .with_z(self.z)
            .flipped(self.flip)
            .centered(self.centered)
            .with_times(self.ctime, self.mtime)
            .with_source(self.image.clone())
    }
}

/// Persisted view: the scene point at the view center plus the zoom.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewRecord {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl ViewRecord {
    pub fn from_viewport(viewport: &Viewport) -> Self {
        let center = viewport.center();
        Self {
            x: center.x,
            y: center.y,
            scale: viewport.zoom(),
        }
    }

    pub fn apply_to(&self, viewport: &mut Viewport) {
        viewport.set_zoom(self.scale);
        viewport.center_on(Point::new(self.x, self.y));
    }
}

/// Source of a stored project. Readers are moved to a background thread for
/// item decoding, hence `Send`.
pub trait ProjectReader: Send {
    /// Stored view, if the project has one.
    fn read_view(&mut self) -> BoardResult<Option<ViewRecord>>;

    /// All item records, in any order.
    fn read_items(&mut self) -> BoardResult<Vec<ItemRecord>>;
}

pub trait ProjectWriter {
    /// Replace the stored project with `view` and `items` as one update.
    fn write_project(&mut self, view: &ViewRecord, items: &[ItemRecord]) -> BoardResult<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct ProjectDocument {
    version: u32,
    #[serde(default)]
    view: Option<ViewRecord>,
    #[serde(default)]
    items: Vec<ItemRecord>,
}

/// A whole project in one JSON file, replaced atomically on every save.
#[derive(Debug)]
pub struct JsonProjectFile {
    path: PathBuf,
    cached: Option<ProjectDocument>,
}

impl JsonProjectFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn document(&mut self) -> BoardResult<&mut ProjectDocument> {
        if self.cached.is_none() {
            let text = fs::read_to_string(&self.path)?;
            let document: ProjectDocument = serde_json::from_str(&text)?;
            if document.version != PROJECT_VERSION {
                return Err(BoardError::UnsupportedVersion {
                    found: document.version,
                    expected: PROJECT_VERSION,
                });
            }
            debug!(path = %self.path.display(), items = document.items.len(), "project file read");
            self.cached = Some(document);
        }
        self.cached
            .as_mut()
            .ok_or_else(|| BoardError::Other("project document unavailable".into()))
    }
}

impl ProjectReader for JsonProjectFile {
    fn read_view(&mut self) -> BoardResult<Option<ViewRecord>> {
        Ok(self.document()?.view)
    }

    fn read_items(&mut self) -> BoardResult<Vec<ItemRecord>> {
        Ok(std::mem::take(&mut self.document()?.items))
    }
}

impl ProjectWriter for JsonProjectFile {
    fn write_project(&mut self, view: &ViewRecord, items: &[ItemRecord]) -> BoardResult<()> {
        let mut items = items.to_vec();
        items.sort_by_key(|record| record.id);
        let document = ProjectDocument {
            version: PROJECT_VERSION,
            view: Some(*view),
            items,
        };

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;
        let json = serde_json::to_vec(&document)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        info!(path = %self.path.display(), items = document.items.len(), "project saved");
        self.cached = None;
        Ok(())
    }
}

/// Project kept in memory. Reading does not consume it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryProject {
    pub view: Option<ViewRecord>,
    pub items: Vec<ItemRecord>,
}

impl ProjectReader for MemoryProject {
    fn read_view(&mut self) -> BoardResult<Option<ViewRecord>> {
        Ok(self.view)
    }

    fn read_items(&mut self) -> BoardResult<Vec<ItemRecord>> {
        Ok(self.items.clone())
    }
}

impl ProjectWriter for MemoryProject {
    fn write_project(&mut self, view: &ViewRecord, items: &[ItemRecord]) -> BoardResult<()> {
        self.view = Some(*view);
        self.items = items.to_vec();
        self.items.sort_by_key(|record| record.id);
        Ok(())
    }
}
