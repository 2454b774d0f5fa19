pub mod core;
pub mod draft;
pub mod roster;
