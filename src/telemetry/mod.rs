pub mod fetch;
pub mod refresh;
