//! Application use cases (business logic orchestration).

mod login;
mod logout;
mod register;

pub use login::*;
pub use logout::*;
pub use register::*;
