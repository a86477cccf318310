//! User model mappers

use chatter_core::{User, UserId};

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        Self {
            id: UserId::new(model.id),
            username: model.username,
            last_login_at: model.last_login_at,
            admin: model.admin,
            active: model.active,
        }
    }
}
