use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Canonical login handle, always stored lowercased
    #[sea_orm(unique)]
    pub email: String,
    pub username: String,
    #[sea_orm(unique)]
    pub username_normalized: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,

    // Status flags
    pub is_active: bool,
    pub is_approved: bool,
    pub is_staff: bool,
    pub is_superuser: bool,

    pub created_at: i64,
    pub updated_at: i64,
    pub last_login_at: Option<i64>,
}

impl Model {
    /// A user may log in only when both active and approved
    pub fn is_login_eligible(&self) -> bool {
        self.is_active && self.is_approved
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
