// Adapters layer: concrete implementations for external systems.

pub mod http_capability;
#[cfg(not(target_arch = "wasm32"))]
pub mod yahoo;
