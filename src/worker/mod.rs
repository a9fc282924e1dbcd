//! Background worker for reading contacts files.
//!
//! # Architecture
//!
//! - `messages`: request/response protocol with trace context propagation
//! - `handler`: request processing

pub mod handler;
pub mod messages;

pub use handler::ContactsWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse, FETCH_MESSAGE};
