//! SQL-backed stores. Each one owns a clone of the pool and nothing else.

pub mod tasks;
pub mod users;

pub use tasks::TaskStore;
pub use users::UserStore;
