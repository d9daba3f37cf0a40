//! Echo verification: payloads, exact transfers and the per-connection worker

pub mod connector;
pub mod counter;
pub mod payload;
pub mod transfer;
pub mod worker;

pub use connector::{EchoConnector, TcpConnector};
pub use counter::FailureCounter;
pub use payload::{PayloadGenerator, PAYLOAD_ALPHABET};
pub use transfer::{receive_exact, receive_exact_into, send_exact};
pub use worker::EchoWorker;

pub use crate::models::WorkerReport;
