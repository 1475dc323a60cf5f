pub mod compositor;
pub mod fill;
pub mod picker;
pub mod script;
