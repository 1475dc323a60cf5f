pub mod history;
pub mod shape;
pub mod tools;
