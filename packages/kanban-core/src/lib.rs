pub mod clock;
pub mod config;
pub mod gesture;
pub mod mutation;
pub mod order;
pub mod reconcile;
pub mod session;
pub mod storage;
pub mod transport;
pub mod types;
