pub mod download;
pub mod post;
pub mod render;
