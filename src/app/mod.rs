// Page layer: the bootstrap handshake and the controller it wires up.

pub mod bootstrap;
pub mod controller;
pub mod http_loader;

pub use bootstrap::{boot, init, ChartModule, ModuleLoader};
pub use controller::PageController;
pub use http_loader::HttpModuleLoader;
