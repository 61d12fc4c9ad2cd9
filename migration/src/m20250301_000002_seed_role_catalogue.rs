use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Default role catalogue: (name, display name, description)
const ROLE_CATALOGUE: &[(&str, &str, &str)] = &[
    (
        "SUPERUSER",
        "Super Administrator",
        "Full access to every administrative endpoint",
    ),
    (
        "ADMIN",
        "Administrator",
        "Manages users and day-to-day operations",
    ),
    (
        "RADIOLOGIST",
        "Radiologist",
        "Reads studies and authors imaging reports",
    ),
    (
        "DOCTOR",
        "Doctor",
        "Reviews reports for assigned patients",
    ),
    (
        "TECHNICIAN",
        "Technician",
        "Acquires and uploads imaging studies",
    ),
    (
        "VIEWER",
        "Viewer",
        "Read-only access to reports",
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, display_name, description) in ROLE_CATALOGUE {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(Roles::Table)
                        .columns([Roles::Name, Roles::DisplayName, Roles::Description])
                        .values_panic([
                            (*name).into(),
                            (*display_name).into(),
                            (*description).into(),
                        ])
                        .on_conflict(OnConflict::column(Roles::Name).do_nothing().to_owned())
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let names: Vec<&str> = ROLE_CATALOGUE.iter().map(|(name, _, _)| *name).collect();

        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Roles::Table)
                    .and_where(Expr::col(Roles::Name).is_in(names))
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Name,
    DisplayName,
    Description,
}
