use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;
use crate::student::domain::{Student, StudentInput, YearCount};
use crate::student::repository::StudentRepository;

/// Postgres-backed repository delegating to `models::student` helpers.
pub struct SeaOrmStudentRepository {
    pub db: DatabaseConnection,
}

fn to_domain(m: models::student::Model) -> Student {
    Student {
        id: m.id,
        nom: m.nom,
        prenom: m.prenom,
        date_naissance: m.date_naissance,
    }
}

#[async_trait::async_trait]
impl StudentRepository for SeaOrmStudentRepository {
    async fn insert(&self, input: &StudentInput) -> Result<Student, ServiceError> {
        let created =
            models::student::create(&self.db, &input.nom, &input.prenom, input.date_naissance)
                .await?;
        Ok(to_domain(created))
    }

    async fn update(&self, student: Student) -> Result<Student, ServiceError> {
        let updated = models::student::update(
            &self.db,
            student.id,
            &student.nom,
            &student.prenom,
            student.date_naissance,
        )
        .await?
        .ok_or_else(|| ServiceError::not_found("student"))?;
        Ok(to_domain(updated))
    }

    async fn find(&self, id: i32) -> Result<Option<Student>, ServiceError> {
        let found = models::student::find_by_id(&self.db, id).await?;
        Ok(found.map(to_domain))
    }

    async fn find_all(&self) -> Result<Vec<Student>, ServiceError> {
        let all = models::student::find_all(&self.db).await?;
        Ok(all.into_iter().map(to_domain).collect())
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        Ok(models::student::delete_by_id(&self.db, id).await?)
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        Ok(models::student::count(&self.db).await?)
    }

    async fn count_by_birth_year(&self) -> Result<Vec<YearCount>, ServiceError> {
        let rows = models::student::count_by_birth_year(&self.db).await?;
        Ok(rows
            .into_iter()
            .map(|r| YearCount { year: r.year, count: r.count })
            .collect())
    }
}
