pub mod program_loader;

pub use program_loader::{load_program_details, load_user_profile};
