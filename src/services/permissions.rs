//! Role-based access rules
//!
//! ADMIN and MANAGER see every contract; PROJEKTLEITUNG only the ones they
//! created. Whoever may see a contract may also edit and delete it.

use crate::models::Role;

pub fn can_view_all_contracts(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Manager)
}

pub fn can_view_contract(role: Role, user_id: i32, creator_id: i32) -> bool {
    can_view_all_contracts(role) || user_id == creator_id
}

pub fn can_edit_contract(role: Role, user_id: i32, creator_id: i32) -> bool {
    can_view_contract(role, user_id, creator_id)
}

pub fn can_delete_contract(role: Role, user_id: i32, creator_id: i32) -> bool {
    can_edit_contract(role, user_id, creator_id)
}

pub fn can_create_contract(_role: Role) -> bool {
    true
}

pub fn can_manage_settings(_role: Role) -> bool {
    true
}

pub fn can_manage_users(role: Role) -> bool {
    role == Role::Admin
}

/// Identity of the caller, as taken from the token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i32,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: i32, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn can_view(&self, creator_id: i32) -> bool {
        can_view_contract(self.role, self.user_id, creator_id)
    }

    pub fn can_edit(&self, creator_id: i32) -> bool {
        can_edit_contract(self.role, self.user_id, creator_id)
    }

    pub fn can_delete(&self, creator_id: i32) -> bool {
        can_delete_contract(self.role, self.user_id, creator_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn managers_and_admins_see_everything() {
        assert!(can_view_contract(Role::Admin, 1, 2));
        assert!(can_view_contract(Role::Manager, 1, 2));
        assert!(!can_view_contract(Role::Projektleitung, 1, 2));
        assert!(can_view_contract(Role::Projektleitung, 2, 2));
    }

    #[test]
    fn edit_and_delete_follow_visibility() {
        let pl = Actor::new(5, Role::Projektleitung);
        assert!(pl.can_edit(5));
        assert!(!pl.can_edit(6));
        assert!(!pl.can_delete(6));
        assert!(Actor::new(1, Role::Manager).can_delete(6));
    }

    #[test]
    fn only_admins_manage_users() {
        assert!(can_manage_users(Role::Admin));
        assert!(!can_manage_users(Role::Manager));
        assert!(can_create_contract(Role::Projektleitung));
        assert!(can_manage_settings(Role::Projektleitung));
    }
}
