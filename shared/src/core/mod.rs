//! Core stateful components for CyberForge
//!
//! Everything in the library that holds state lives here:
//! - Key-value stores and the cart/wishlist store built on them
//! - Periodic tasks that drive the simulations
//! - The mock scan and dashboard metric simulations

pub mod cart_store;
pub mod errors;
pub mod kv_store;
pub mod scheduler;
pub mod simulation;

// Re-export commonly used items
pub use cart_store::{CartState, CartStore, CartSummary};
pub use errors::{SchedulerError, StoreError, StoreResult};
pub use kv_store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use scheduler::PeriodicTask;
pub use simulation::{
    BoundedMetric, MetricsSimulation, ScanProgress, ScanSimulation, ScanStatus,
};
