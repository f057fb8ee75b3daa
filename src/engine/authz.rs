//! Role-based authorization and the per-role navigation map.
//!
//! Every role decision in the crate goes through an exhaustive match here.

use serde::{Deserialize, Serialize};

use super::error::MarketError;
use crate::domain::{Actor, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ListProduct,
    Checkout,
    PostRequest,
    SubmitOffer,
    AcceptOffer,
    AdvanceOrder,
    ViewAllRequests,
    ManageUsers,
}

impl Permission {
    pub fn describe(self) -> &'static str {
        match self {
            Permission::ListProduct => "list products",
            Permission::Checkout => "check out a cart",
            Permission::PostRequest => "post requests",
            Permission::SubmitOffer => "submit offers",
            Permission::AcceptOffer => "accept offers",
            Permission::AdvanceOrder => "advance orders",
            Permission::ViewAllRequests => "view all requests",
            Permission::ManageUsers => "manage users",
        }
    }
}

impl Role {
    pub fn can(self, permission: Permission) -> bool {
        match self {
            Role::Admin => matches!(
                permission,
                Permission::ViewAllRequests | Permission::ManageUsers
            ),
            Role::Vendor => matches!(
                permission,
                Permission::ListProduct | Permission::SubmitOffer | Permission::AdvanceOrder
            ),
            Role::Buyer => matches!(
                permission,
                Permission::Checkout | Permission::PostRequest | Permission::AcceptOffer
            ),
        }
    }

    pub fn screens(self) -> &'static [Screen] {
        match self {
            Role::Admin => &[
                Screen::Dashboard,
                Screen::AdminUsers,
                Screen::AdminProducts,
                Screen::AdminRequests,
            ],
            Role::Vendor => &[
                Screen::Dashboard,
                Screen::MarketRequests,
                Screen::MyProducts,
                Screen::OrderHistory,
            ],
            Role::Buyer => &[
                Screen::Dashboard,
                Screen::Marketplace,
                Screen::Cart,
                Screen::MyRequests,
                Screen::OrderHistory,
            ],
        }
    }
}

pub(crate) fn require(actor: &Actor, permission: Permission) -> Result<(), MarketError> {
    if actor.role.can(permission) {
        Ok(())
    } else {
        Err(MarketError::forbidden(actor.role, permission.describe()))
    }
}

/// Named screens of the cooperative app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Dashboard,
    Marketplace,
    Cart,
    MyRequests,
    OrderHistory,
    MarketRequests,
    MyProducts,
    AdminUsers,
    AdminProducts,
    AdminRequests,
}

impl Screen {
    pub fn allowed_for(self, role: Role) -> bool {
        role.screens().contains(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_buyers_shop_and_request() {
        for role in [Role::Admin, Role::Vendor] {
            assert!(!role.can(Permission::Checkout));
            assert!(!role.can(Permission::AcceptOffer));
        }
        assert!(Role::Buyer.can(Permission::Checkout));
        assert!(Role::Buyer.can(Permission::PostRequest));
    }

    #[test]
    fn test_only_vendors_advance_orders() {
        assert!(Role::Vendor.can(Permission::AdvanceOrder));
        assert!(!Role::Buyer.can(Permission::AdvanceOrder));
        assert!(!Role::Admin.can(Permission::AdvanceOrder));
    }

    #[test]
    fn test_require_reports_role_and_action() {
        let admin = Actor::new("user_1", "Admin Koperasi", Role::Admin);
        let err = require(&admin, Permission::SubmitOffer).unwrap_err();
        assert_eq!(err.to_string(), "Role admin may not submit offers");
    }

    #[test]
    fn test_screens_follow_role() {
        assert!(Screen::Cart.allowed_for(Role::Buyer));
        assert!(!Screen::Cart.allowed_for(Role::Vendor));
        assert!(Screen::MarketRequests.allowed_for(Role::Vendor));
        assert!(Screen::AdminUsers.allowed_for(Role::Admin));
        assert!(!Screen::AdminUsers.allowed_for(Role::Buyer));
        for role in [Role::Admin, Role::Vendor, Role::Buyer] {
            assert!(Screen::Dashboard.allowed_for(role));
        }
    }
}
