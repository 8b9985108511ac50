pub mod task;
pub mod user;

pub use task::{Category, Task, TaskInput, TaskQuery};
pub use user::User;
