//! `wird-dispatch`: what happens when a wake-up fires.
//!
//! A fired payload is decoded once into a [`Delivery`], then
//! [`DispatchHandler::handle`] renders it through the host's
//! [`DisplayLayer`] or, for a dismiss, records it and stops.

pub mod delivery;
pub mod display;
pub mod error;
pub mod handler;

pub use delivery::{Delivery, RawDelivery};
pub use display::{DisplayLayer, MemoryDisplay, Notice, NoticeAction};
pub use error::{DispatchError, DisplayError, Result};
pub use handler::{DispatchHandler, DispatchOutcome, DispatchRecord};
