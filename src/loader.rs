//! Background loading.
//!
//! Decoding a project or a batch of dropped files can take a while, so it
//! runs on a worker thread. The worker only produces finished data; the UI
//! thread drains it with [`BackgroundTask::poll`] and is the only writer to
//! the scene.

use crate::codec::ImageCodec;
use crate::error::{BoardResult, ItemFailure};
use crate::fetch::{DropSource, Fetcher, read_source};
use crate::persistence::ProjectReader;
use crate::types::ItemConfig;
use image::RgbaImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Messages from a worker, in production order.
#[derive(Debug)]
pub enum TaskMessage<T> {
    Item(T),
    Failed(ItemFailure),
    /// `done` of `total` inputs processed, successful or not
    Progress { done: usize, total: usize },
    Finished { total: usize },
}

/// Worker side of a [`BackgroundTask`].
pub struct TaskSender<T> {
    tx: Sender<TaskMessage<T>>,
    cancel_flag: Arc<AtomicBool>,
}

impl<T> TaskSender<T> {
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Returns false once the task is cancelled or the receiver is gone.
    pub fn send(&self, message: TaskMessage<T>) -> bool {
        !self.is_cancelled() && self.tx.send(message).is_ok()
    }
}

/// A worker thread plus the channel it reports on.
///
/// Dropping the task cancels it without waiting: a worker still busy with
/// an item is detached and exits at its next cancellation check. Anything
/// it produced but the UI never polled is discarded.
pub struct BackgroundTask<T> {
    name: String,
    receiver: Receiver<TaskMessage<T>>,
    cancel_flag: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    finished: bool,
}

impl<T: Send + 'static> BackgroundTask<T> {
    pub fn spawn<F>(name: &str, work: F) -> BoardResult<Self>
    where
        F: FnOnce(TaskSender<T>) + Send + 'static,
    {
        let (tx, receiver) = mpsc::channel();
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let sender = TaskSender {
            tx,
            cancel_flag: cancel_flag.clone(),
        };

        let worker = thread::Builder::new()
            .name(format!("rivboard-{name}"))
            .spawn(move || work(sender))?;
        debug!(task = name, "background task started");

        Ok(Self {
            name: name.to_string(),
            receiver,
            cancel_flag,
            worker: Some(worker),
            finished: false,
        })
    }
}

impl<T> BackgroundTask<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Drain everything delivered so far without blocking.
    pub fn poll(&mut self) -> Vec<TaskMessage<T>> {
        let mut messages = Vec::new();
        if self.is_cancelled() {
            return messages;
        }
        loop {
            match self.receiver.try_recv() {
                Ok(message) => {
                    if matches!(message, TaskMessage::Finished { .. }) {
                        self.finished = true;
                    }
                    messages.push(message);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.finished {
                        warn!(task = %self.name, "worker exited without finishing");
                    }
                    self.finished = true;
                    break;
                }
            }
        }
        messages
    }

    /// Block until the worker finishes, returning everything it sent.
    pub fn wait(&mut self) -> Vec<TaskMessage<T>> {
        let mut messages = Vec::new();
        if self.is_cancelled() {
            return messages;
        }
        while !self.finished {
            match self.receiver.recv() {
                Ok(message) => {
                    if matches!(message, TaskMessage::Finished { .. }) {
                        self.finished = true;
                    }
                    messages.push(message);
                }
                Err(_) => self.finished = true,
            }
        }
        messages
    }

    pub fn cancel(&mut self) {
        if !self.cancel_flag.swap(true, Ordering::Relaxed) {
            debug!(task = %self.name, "background task cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// True once the worker has reported completion (or died).
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl<T> Drop for BackgroundTask<T> {
    fn drop(&mut self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
        match self.worker.take() {
            Some(worker) if worker.is_finished() => {
                if worker.join().is_err() {
                    warn!(task = %self.name, "background worker panicked");
                }
            }
            Some(_) => debug!(task = %self.name, "detached busy worker"),
            None => {}
        }
    }
}

/// Decode every record from `reader` in id order.
///
/// Each record yields one [`TaskMessage::Item`] or [`TaskMessage::Failed`],
/// followed by a progress message.
pub fn spawn_item_loader(
    mut reader: Box<dyn ProjectReader>,
    codec: Arc<dyn ImageCodec>,
) -> BoardResult<BackgroundTask<ItemConfig>> {
    BackgroundTask::spawn("load", move |sender: TaskSender<ItemConfig>| {
        let mut records = match reader.read_items() {
            Ok(records) => records,
            Err(e) => {
                sender.send(TaskMessage::Failed(ItemFailure::new("project", e)));
                sender.send(TaskMessage::Finished { total: 0 });
                return;
            }
        };
        records.sort_by_key(|record| record.id);

        let total = records.len();
        for (i, record) in records.iter().enumerate() {
            if sender.is_cancelled() {
                return;
            }
            crate::profile_scope!("decode_item");
            let message = match codec.decode(&record.image, Some(&record.format)) {
                Ok(decoded) => TaskMessage::Item(record.to_config(decoded.pixels)),
                Err(e) => TaskMessage::Failed(ItemFailure::new(record.path.clone(), e)),
            };
            if !sender.send(message) {
                return;
            }
            sender.send(TaskMessage::Progress { done: i + 1, total });
        }
        sender.send(TaskMessage::Finished { total });
    })
}

/// A dropped source, read and decoded.
#[derive(Debug, Clone)]
pub struct DroppedImage {
    pub label: String,
    pub format: String,
    pub bytes: Arc<[u8]>,
    pub pixels: RgbaImage,
}

/// Read and decode one source on the calling thread.
pub fn decode_source(
    source: &DropSource,
    fetcher: &dyn Fetcher,
    codec: &dyn ImageCodec,
) -> BoardResult<DroppedImage> {
    crate::profile_scope!("decode_source");
    let bytes = read_source(source, fetcher)?;
    let hint = source.format_hint();
    let decoded = codec.decode(&bytes, hint.as_deref())?;
    Ok(DroppedImage {
        label: source.label(),
        format: decoded.format,
        bytes: Arc::from(bytes),
        pixels: decoded.pixels,
    })
}

/// Read and decode dropped sources off the UI thread, in drop order.
pub fn spawn_drop_fetcher(
    sources: Vec<DropSource>,
    fetcher: Arc<dyn Fetcher>,
    codec: Arc<dyn ImageCodec>,
) -> BoardResult<BackgroundTask<DroppedImage>> {
    BackgroundTask::spawn("drop", move |sender: TaskSender<DroppedImage>| {
        let total = sources.len();
        for (i, source) in sources.iter().enumerate() {
            if sender.is_cancelled() {
                return;
            }
            let message = match decode_source(source, fetcher.as_ref(), codec.as_ref()) {
                Ok(image) => TaskMessage::Item(image),
                Err(e) => TaskMessage::Failed(ItemFailure::new(source.label(), e)),
            };
            if !sender.send(message) {
                return;
            }
            sender.send(TaskMessage::Progress { done: i + 1, total });
        }
        sender.send(TaskMessage::Finished { total });
    })
}

/// Split drained messages into items and failures, dropping progress.
pub fn partition_messages<T>(messages: Vec<TaskMessage<T>>) -> (Vec<T>, Vec<ItemFailure>) {
    let mut items = Vec::new();
    let mut failures = Vec::new();
    for message in messages {
        match message {
            TaskMessage::Item(item) => items.push(item),
            TaskMessage::Failed(failure) => failures.push(failure),
            TaskMessage::Progress { .. } | TaskMessage::Finished { .. } => {}
        }
    }
    (items, failures)
}
