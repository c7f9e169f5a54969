use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{Student, StudentInput, YearCount};
use super::repository::StudentRepository;
use crate::errors::ServiceError;

/// Student business service independent of web framework.
///
/// Generic over the repository so the HTTP layer can hold it as
/// `StudentService<dyn StudentRepository>` and tests can plug in the mock.
pub struct StudentService<R: StudentRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: StudentRepository + ?Sized> StudentService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Save a student: insert when no id is given, update when the id
    /// exists, `NotFound` when an explicit id is unknown.
    ///
    /// # Examples
    /// ```
    /// use service::student::{service::StudentService, repository::mock::MockStudentRepository};
    /// use service::student::domain::StudentInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockStudentRepository::default());
    /// let svc = StudentService::new(repo);
    /// let input = StudentInput { id: None, nom: "Dupont".into(), prenom: "Marie".into(), date_naissance: "2001-05-14".parse().unwrap() };
    /// let saved = tokio_test::block_on(svc.save(input)).unwrap();
    /// assert_eq!(saved.id, 1);
    /// assert_eq!(saved.nom, "Dupont");
    /// ```
    #[instrument(skip(self, input), fields(id = ?input.id))]
    pub async fn save(&self, input: StudentInput) -> Result<Student, ServiceError> {
        input.validate()?;
        let saved = match input.id {
            None => self.repo.insert(&input).await?,
            Some(id) => {
                if self.repo.find(id).await?.is_none() {
                    return Err(ServiceError::not_found("student"));
                }
                self.repo
                    .update(Student {
                        id,
                        nom: input.nom.clone(),
                        prenom: input.prenom.clone(),
                        date_naissance: input.date_naissance,
                    })
                    .await?
            }
        };
        info!(student_id = saved.id, "student_saved");
        Ok(saved)
    }

    /// Remove a student; returns whether a record existed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let existed = self.repo.delete(id).await?;
        info!(student_id = id, existed, "student_delete");
        Ok(existed)
    }

    pub async fn find(&self, id: i32) -> Result<Option<Student>, ServiceError> {
        self.repo.find(id).await
    }

    pub async fn find_all(&self) -> Result<Vec<Student>, ServiceError> {
        self.repo.find_all().await
    }

    pub async fn count_students(&self) -> Result<u64, ServiceError> {
        self.repo.count().await
    }

    pub async fn count_by_birth_year(&self) -> Result<Vec<YearCount>, ServiceError> {
        self.repo.count_by_birth_year().await
    }
}
