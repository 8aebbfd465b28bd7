pub mod config;
pub mod constants;
pub mod model;
pub mod orbit;
pub mod playback;
pub mod render_loop;
pub mod scene;
pub mod signal;

pub use config::*;
pub use constants::*;
pub use model::*;
pub use orbit::*;
pub use playback::*;
pub use render_loop::*;
pub use scene::*;
pub use signal::*;
