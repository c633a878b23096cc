pub use submission::*;

mod submission;
