//! Project lifecycle, import, drops, export and background polling.

use super::{Board, BoardEvent, PendingDrop, PendingLoad};
use crate::error::{BoardError, BoardResult, ItemFailure};
use crate::export::{ExportReport, export_items};
use crate::fetch::DropSource;
use crate::geometry::Point;
use crate::history::Command;
use crate::input::Controller;
use crate::loader::{DroppedImage, TaskMessage, decode_source, spawn_drop_fetcher, spawn_item_loader};
use crate::persistence::{ItemRecord, ProjectReader, ProjectWriter, ViewRecord};
use crate::types::{Item, ItemConfig, ItemId};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of importing a batch of files.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: Vec<ItemId>,
    pub failures: Vec<ItemFailure>,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.imported.len() + self.failures.len()
    }
}

/// What one [`Board::poll_background`] call delivered.
#[derive(Debug, Default)]
pub struct PollReport {
    /// Items inserted into the scene by this poll
    pub inserted: Vec<ItemId>,
    pub failures: Vec<ItemFailure>,
}

impl PollReport {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.failures.is_empty()
    }
}

impl Board {
    /// Drop all items, history and background work. The fresh project
    /// counts as unsaved.
    pub fn new_project(&mut self) {
        self.clear_project();
        self.history.reset_clean();
        info!("new project");
        self.notify();
    }

    fn clear_project(&mut self) {
        self.load = None;
        self.drops.clear();
        self.controller = Controller::new();
        self.scene.clear();
        self.history.clear();
        self.viewport.reset(None);
    }

    pub fn is_loading(&self) -> bool {
        self.load.is_some()
    }

    /// Replace the board with a stored project.
    ///
    /// The view is applied immediately; items are decoded in the background
    /// and arrive through [`Board::poll_background`]. If the view cannot be
    /// read the current board is left untouched.
    pub fn open_project(&mut self, mut reader: Box<dyn ProjectReader>) -> BoardResult<()> {
        let view = reader.read_view()?;
        self.clear_project();
        if let Some(view) = view {
            view.apply_to(&mut self.viewport);
        }
        self.refresh_scene_rect();

        let task = spawn_item_loader(reader, self.codec.clone())?;
        self.load = Some(PendingLoad { task, loaded: 0 });
        info!("opening project");
        self.notify();
        Ok(())
    }

    /// Write every live item and the view, then mark the history clean.
    pub fn save_project(&mut self, writer: &mut dyn ProjectWriter) -> BoardResult<()> {
        if self.is_loading() {
            return Err(BoardError::Other("project is still loading".into()));
        }
        let view = ViewRecord::from_viewport(&self.viewport);
        let records = self
            .scene
            .live_items()
            .map(|item| self.record_for(item))
            .collect::<BoardResult<Vec<_>>>()?;
        writer.write_project(&view, &records)?;

        self.history.set_clean();
        info!(items = records.len(), "project saved");
        self.notify();
        Ok(())
    }

    /// Persisted form of `item`. Items added without their encoded source
    /// are stored as lossless PNG of the unflipped pixels.
    fn record_for(&self, item: &Item) -> BoardResult<ItemRecord> {
        let mut record = ItemRecord::from_item(item);
        if record.image.is_empty() {
            record.image = self.codec.encode(&item.unflipped_pixels(), "png")?;
            record.format = "png".to_string();
        }
        Ok(record)
    }

    /// Decode local files and place them packed at `at`, selected.
    /// Unreadable files are reported and skipped.
    pub fn import_files(&mut self, paths: &[PathBuf], at: Point) -> ImportReport {
        let mut images = Vec::new();
        let mut failures = Vec::new();
        for path in paths {
            let source = DropSource::Path(path.clone());
            match decode_source(&source, self.fetcher.as_ref(), self.codec.as_ref()) {
                Ok(image) => images.push(image),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping import");
                    failures.push(ItemFailure::new(source.label(), e));
                }
            }
        }

        let imported = self.place_images(images, at);
        let report = ImportReport { imported, failures };
        self.finish_import(report.imported.len(), report.total());
        report
    }

    /// Read and decode dropped sources in the background. The batch is
    /// placed at `at` once every source has been handled.
    pub fn drop_sources(&mut self, sources: Vec<DropSource>, at: Point) -> BoardResult<()> {
        if sources.is_empty() {
            return Ok(());
        }
        let task = spawn_drop_fetcher(sources, self.fetcher.clone(), self.codec.clone())?;
        self.drops.push(PendingDrop {
            task,
            at,
            images: Vec::new(),
            failures: 0,
        });
        Ok(())
    }

    /// Deliver finished background work into the scene. Call from the UI
    /// loop; never blocks.
    pub fn poll_background(&mut self) -> PollReport {
        let mut report = PollReport::default();
        self.poll_load(&mut report);
        self.poll_drops(&mut report);
        if !report.inserted.is_empty() {
            self.refresh_scene_rect();
        }
        self.notify();
        report
    }

    fn poll_load(&mut self, report: &mut PollReport) {
        let Some(load) = self.load.as_mut() else {
            return;
        };

        let mut finished = false;
        for message in load.task.poll() {
            match message {
                TaskMessage::Item(config) => {
                    let config = reassign_if_taken(&mut self.scene, config);
                    let id = config.id;
                    match self.scene.insert(Item::new(config)) {
                        Ok(()) => {
                            load.loaded += 1;
                            report.inserted.push(id);
                        }
                        Err(e) => report.failures.push(ItemFailure::new(format!("item {id}"), e)),
                    }
                }
                TaskMessage::Failed(failure) => {
                    warn!(label = %failure.label, error = %failure.error, "item not loaded");
                    report.failures.push(failure);
                }
                TaskMessage::Progress { done, total } => {
                    self.events.push(BoardEvent::LoadProgress { done, total });
                }
                TaskMessage::Finished { total } => {
                    info!(loaded = load.loaded, total, "project loaded");
                    self.events.push(BoardEvent::LoadFinished {
                        loaded: load.loaded,
                        total,
                    });
                    finished = true;
                }
            }
        }
        if finished || load.task.is_finished() {
            self.load = None;
            self.scene.reindex();
        }
    }

    fn poll_drops(&mut self, report: &mut PollReport) {
        let mut completed = Vec::new();
        self.drops.retain_mut(|pending| {
            for message in pending.task.poll() {
                match message {
                    TaskMessage::Item(image) => pending.images.push(image),
                    TaskMessage::Failed(failure) => {
                        warn!(label = %failure.label, error = %failure.error, "drop skipped");
                        pending.failures += 1;
                        report.failures.push(failure);
                    }
                    TaskMessage::Progress { .. } | TaskMessage::Finished { .. } => {}
                }
            }
            if pending.task.is_finished() {
                completed.push((
                    std::mem::take(&mut pending.images),
                    pending.failures,
                    pending.at,
                ));
                false
            } else {
                true
            }
        });

        for (images, failures, at) in completed {
            let total = images.len() + failures;
            let imported = self.place_images(images, at);
            self.finish_import(imported.len(), total);
            report.inserted.extend(imported);
        }
    }

    /// Insert decoded images centered on `at` and select only them. A batch
    /// of several is packed with its top-left at `at`.
    fn place_images(&mut self, images: Vec<DroppedImage>, at: Point) -> Vec<ItemId> {
        if images.is_empty() {
            return Vec::new();
        }
        self.scene.clear_selection();

        let mut ids = Vec::with_capacity(images.len());
        for image in images {
            let id = self.scene.allocate_id();
            let config = ItemConfig::new(id, image.pixels)
                .with_path(image.label)
                .with_format(image.format)
                .with_source(image.bytes)
                .at(at)
                .centered(true);
            match self.scene.insert(Item::new(config)) {
                Ok(()) => {
                    self.scene.set_selected(id, true);
                    ids.push(id);
                }
                Err(e) => {
                    warn!(id, error = %e, "could not place image");
                    self.scene.release_id(id);
                }
            }
        }

        // Placement is not undoable, so the pack is applied directly
        if ids.len() > 1 {
            Command::Move(self.pack_command(&ids, at)).redo(&mut self.scene);
        }
        self.refresh_scene_rect();
        ids
    }

    fn finish_import(&mut self, imported: usize, total: usize) {
        if imported > 0 {
            self.history.reset_clean();
        }
        info!(imported, total, "import finished");
        self.events.push(BoardEvent::ImportFinished { imported, total });
        self.notify();
    }

    /// Write the current pixels of the selection into `dir`.
    pub fn export_selection(&self, dir: &Path) -> ExportReport {
        let items = self
            .scene
            .selected_ids()
            .into_iter()
            .filter_map(|id| self.scene.get(id));
        export_items(items, dir, self.codec.as_ref())
    }
}

/// Give a loaded item a fresh id if something placed during the load
/// already took its stored one.
fn reassign_if_taken(scene: &mut crate::scene::Scene, mut config: ItemConfig) -> ItemConfig {
    if scene.ids().contains(config.id) {
        let fresh = scene.allocate_id();
        warn!(stored = config.id, fresh, "stored item id already in use");
        config.id = fresh;
    }
    config
}
