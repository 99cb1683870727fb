mod dispatch;
pub mod real_path;
pub mod verify;

pub use dispatch::dispatch;
