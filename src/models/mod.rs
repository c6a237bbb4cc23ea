pub mod user;

pub use user::{NewUser, Plan, Role, User, UserUpdate, normalize_email};
