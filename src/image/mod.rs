pub mod grid;
pub mod pixel;
