pub mod collision;
pub mod scene;
mod util;
