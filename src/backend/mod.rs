/// Backend submodules for the network thread
///
/// - `main_loop`: action dispatch loop and poll session management
mod main_loop;

// Re-export the main backend entry points
pub use main_loop::{run_backend, run_backend_with};
