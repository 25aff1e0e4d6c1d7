use super::model::Order;
use crate::domain::shared::value_objects::Caller;

/// Authorization decisions for orders. Authentication happens before a use case runs.
pub trait OrderAccessGate: Send + Sync {
    fn can_view_order(&self, caller: &Caller, order: &Order) -> bool;
    /// Listing every order and changing order status.
    fn can_manage_orders(&self, caller: &Caller) -> bool;
}

/// Admins see and manage everything; customers only see their own orders.
pub struct OwnerOrAdminGate;

impl OrderAccessGate for OwnerOrAdminGate {
    fn can_view_order(&self, caller: &Caller, order: &Order) -> bool {
        caller.is_admin || order.is_owned_by(&caller.user_id)
    }

    fn can_manage_orders(&self, caller: &Caller) -> bool {
        caller.is_admin
    }
}
