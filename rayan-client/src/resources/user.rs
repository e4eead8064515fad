use http::Method;

use crate::form::ReadOnly;
use crate::query::ListQuery;
use crate::resource::{ActionRoute, ActionSpec, Resource, Toggle};
use shared::SortOrder;
use shared::models::{User, UserDetail, UserStatus};

/// Customer accounts (`/user`, paginated, searchable by `keyword`).
///
/// Accounts are read-only here apart from blocking and deletion.
pub struct Users;

impl Users {
    pub fn search(keyword: &str) -> ListQuery {
        Self::default_query().filter("keyword", keyword.trim())
    }
}

fn flip_status(user: &mut User) {
    user.status = user.status.toggled();
}

fn settle_status(user: &mut User, data: &serde_json::Value) {
    let reported = data
        .get("status")
        .and_then(|status| serde_json::from_value::<UserStatus>(status.clone()).ok());
    if let Some(status) = reported {
        user.status = status;
    }
}

impl Resource for Users {
    type Item = User;
    type Detail = UserDetail;
    type Draft = ReadOnly<UserDetail>;

    const PATH: &'static str = "user";
    const LABEL: &'static str = "User";

    fn default_query() -> ListQuery {
        ListQuery::new().paginate(1, 10).sort(SortOrder::Asc)
    }

    /// `PATCH /user/{id}/toggle-block`
    fn toggle() -> Option<Toggle<User>> {
        Some(Toggle {
            action: ActionSpec {
                name: "toggle-block",
                route: ActionRoute::Member,
                method: Method::PATCH,
            },
            apply: flip_status,
            settle: Some(settle_status),
            success_message: "User status updated",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        serde_json::from_value(serde_json::json!({
            "id": 7,
            "email": "a@b.c",
            "role": "customer",
            "status": "active"
        }))
        .unwrap()
    }

    #[test]
    fn test_toggle_flip_and_settle() {
        let toggle = Users::toggle().unwrap();
        let mut user = user();

        (toggle.apply)(&mut user);
        assert_eq!(user.status, UserStatus::Blocked);

        let settle = toggle.settle.unwrap();
        settle(&mut user, &serde_json::json!({"status": "active"}));
        assert_eq!(user.status, UserStatus::Active);

        settle(&mut user, &serde_json::Value::Null);
        assert_eq!(user.status, UserStatus::Active);
    }

    #[test]
    fn test_search_query() {
        let query = Users::search(" ali ");
        assert_eq!(query.filter_value("keyword"), Some("ali"));
        assert_eq!(query.limit, Some(10));
    }
}
