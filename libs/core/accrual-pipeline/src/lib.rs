//! Background accrual pipeline: scans NEW orders, scores them against an
//! external accrual service, and drives each order's status/accrual through
//! its state machine.
//!
//! ```text
//! Scanner ──dispatch channel──▶ Worker ──▶ AccrualClient
//!                                  │             │
//!                                  ▼             ▼
//!                          Order store   Pause controller (on 429)
//! ```
//!
//! [`Supervisor`] is the only public entry point most callers need: it wires
//! the scanner, dispatch channel, pause controller and worker pool together
//! and owns the shutdown handshake.

pub mod client;
pub mod pause;
pub mod scanner;
pub mod supervisor;
pub mod worker;

pub use client::{AccrualClient, AccrualClientError, AccrualResponse, RemoteOrderStatus};
pub use pause::PauseController;
pub use scanner::Scanner;
pub use supervisor::Supervisor;
pub use worker::Worker;
