//! Repository implementations for users, items and jobs.

pub mod item;
pub mod job;
pub mod user;

pub use item::ItemRepository;
pub use job::JobRepository;
pub use user::UserRepository;
