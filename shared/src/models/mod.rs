//! Domain models
//!
//! Entities and request/response payloads shared between the server
//! and any future client crates. `sqlx::FromRow` derives are gated
//! behind the `db` feature so client builds stay database-free.

mod family;
mod item;
mod notification;
mod order;
mod otp;

pub use family::{Family, FamilyCreate, FamilyMember, FamilyUpdate, MemberCreate, MemberUpdate};
pub use item::{AvailableItem, ItemCreate, RationItem};
pub use notification::{Notification, NotificationCreate};
pub use order::{
    InvoiceData, InvoiceLine, Order, OrderDetail, OrderLine, OrderLineDetail, OrderLineInput,
    PaymentStatus,
};
pub use otp::CheckoutOtp;
