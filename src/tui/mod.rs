pub mod input;
pub mod view;
