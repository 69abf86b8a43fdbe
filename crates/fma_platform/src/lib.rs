pub mod icon;
pub mod window;
