// Page views: one per place the stock page can be shown.

#[cfg(not(target_arch = "wasm32"))]
pub mod console;
pub mod memory;
#[cfg(feature = "web")]
pub mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use console::ConsolePage;
pub use memory::MemoryPage;
