pub use contact::*;
pub use health_check::*;

mod contact;
mod health_check;
