//! Core logic for the mindgarden wellness companion: a coloring canvas
//! with a tolerance-based flood fill, Sage chat sessions with streaming
//! reply recovery, and the points, badges, journal, mood and garden state
//! behind the rest of the app. Everything persists as JSON through a
//! pluggable key-value store; nothing here touches a UI.

pub mod badges;
pub mod canvas;
pub mod chat;
pub mod color;
pub mod error;
pub mod garden;
pub mod journal;
pub mod mood;
pub mod points;
pub mod scheduler;
pub mod store;

pub use canvas::{flood_fill, FillReport, FillRequest, PixelBuffer};
pub use color::Rgba;
pub use error::{CanvasError, ChatError, StoreError};
pub use store::{FileStore, KvStore, MemoryStore};
