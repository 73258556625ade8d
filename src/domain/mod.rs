pub mod announcement;
pub mod user;
pub mod view;

pub use announcement::*;
pub use user::*;
pub use view::*;
