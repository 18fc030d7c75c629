mod contribution_handler;

pub use contribution_handler::*;
