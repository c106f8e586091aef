//! # Events Module
//!
//! Progress reporting for the scan pipeline.
//!
//! The pipeline emits events through a channel at fixed call points
//! (per root discovered, per file read, per file hashed, phase changes).
//! Any front end can subscribe; the CLI drives a spinner from them.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Extraction(ExtractionEvent::Progress(p)) = event {
//!             println!("Read {}/{}", p.completed, p.total);
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
