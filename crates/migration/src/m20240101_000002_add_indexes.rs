//! Index on `date_naissance` backing the per-year aggregation.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_student_date_naissance")
                    .table(Student::Table)
                    .col(Student::DateNaissance)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_student_date_naissance")
                    .table(Student::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Student { Table, DateNaissance }
