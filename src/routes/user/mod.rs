mod handler;
mod model;

pub use handler::{create_user, delete_user, get_me, get_user, get_user_by_email, update_user};
pub use model::{CreateUserResponse, EmailQuery};
