pub mod achievement;
pub mod progress;
pub mod suggestion;
pub mod trick;
pub mod user;
