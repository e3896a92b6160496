pub mod info;
pub mod presets;
pub mod process;

pub use info::*;
pub use presets::*;
pub use process::*;
