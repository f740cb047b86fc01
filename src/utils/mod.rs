pub mod logging;
pub mod value;

pub use value::{js_string, truthy};
