pub mod capacity;
pub mod failure;
pub mod session;
pub mod stage;
