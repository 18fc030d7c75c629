mod locator_handler;

pub use locator_handler::*;
