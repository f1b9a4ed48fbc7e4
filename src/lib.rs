//! Canvas engine for an infinite image reference board.
//!
//! The crate holds everything below the window: the item model, the scene and
//! its spatial index, gestures, undo/redo, packing, the viewport, and the
//! background load and drop paths. Hosts supply a [`render::Painter`] and
//! forward input to a [`board::Board`].

pub mod board;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod fetch;
pub mod geometry;
pub mod history;
pub mod input;
pub mod loader;
pub mod logging;
pub mod packing;
pub mod perf;
pub mod persistence;
pub mod render;
pub mod scene;
pub mod spatial_index;
pub mod types;
pub mod viewport;

pub use board::{ActionState, Board, BoardEvent};
pub use config::BoardConfig;
pub use error::{BoardError, BoardResult};
pub use geometry::{Point, Rect, Size, Transform};
pub use types::{Item, ItemConfig, ItemId};
