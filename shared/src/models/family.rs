//! Family and member models

use serde::{Deserialize, Serialize};

/// Family entity, the unit of registration and entitlement
///
/// `family_code` is the human-readable identifier used across the API;
/// `area` scopes which stock and notifications the family sees.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Family {
    pub id: i64,
    pub family_code: String,
    pub area: String,
    pub created_at: i64,
}

/// Create family payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyCreate {
    pub family_code: String,
    pub area: String,
}

/// Update family payload (both fields required, as on the admin form)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyUpdate {
    pub family_code: String,
    pub area: String,
}

/// Family member entity
///
/// The login OTP fields (`login_otp_hash`, `login_otp_expires_at`) are
/// deliberately not part of this model; they never leave the otp module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct FamilyMember {
    pub id: i64,
    pub family_id: i64,
    pub name: String,
    pub aadhar_number: String,
    pub email: Option<String>,
    pub created_at: i64,
}

/// Create member payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberCreate {
    pub family_code: String,
    pub name: String,
    pub aadhar_number: String,
    pub email: String,
}

/// Update member payload (all fields required, as on the admin form)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberUpdate {
    pub name: String,
    pub aadhar_number: String,
    pub email: String,
}
