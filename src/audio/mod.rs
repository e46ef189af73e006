pub mod decode;
pub mod duration;
pub mod windows;
