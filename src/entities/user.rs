use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "USER")]
    User,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub roles: Vec<UserRole>,
    #[sea_orm(unique)]
    #[serde(skip_serializing)]
    pub token: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_values_are_uppercase() {
        assert_eq!(UserRole::Admin.to_value(), "ADMIN");
        assert_eq!(UserRole::User.to_value(), "USER");
        assert_eq!(
            serde_json::to_value(UserRole::Admin).unwrap(),
            serde_json::json!("ADMIN")
        );
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert_eq!(
            UserRole::try_from_value(&"USER".to_string()).unwrap(),
            UserRole::User
        );
        assert!(UserRole::try_from_value(&"AUDITOR".to_string()).is_err());
        assert!(UserRole::try_from_value(&"admin".to_string()).is_err());
    }
}
