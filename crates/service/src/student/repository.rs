use async_trait::async_trait;

use super::domain::{Student, StudentInput, YearCount};
use crate::errors::ServiceError;

/// Repository abstraction for student persistence.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Insert a new student; the store assigns the id.
    async fn insert(&self, input: &StudentInput) -> Result<Student, ServiceError>;
    /// Update an existing student; `NotFound` when the id is unknown.
    async fn update(&self, student: Student) -> Result<Student, ServiceError>;
    async fn find(&self, id: i32) -> Result<Option<Student>, ServiceError>;
    async fn find_all(&self) -> Result<Vec<Student>, ServiceError>;
    /// Remove by id; returns whether a record existed.
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
    async fn count(&self) -> Result<u64, ServiceError>;
    /// Students per birth year, ascending by year.
    async fn count_by_birth_year(&self) -> Result<Vec<YearCount>, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use crate::student::domain::year_histogram;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockStudentRepository {
        students: Mutex<HashMap<i32, Student>>, // key: id
    }

    impl MockStudentRepository {
        /// Seed the store with fixed records, keeping their ids.
        pub fn with_students(seed: Vec<Student>) -> Self {
            let map = seed.into_iter().map(|s| (s.id, s)).collect();
            Self { students: Mutex::new(map) }
        }
    }

    fn next_id(map: &HashMap<i32, Student>) -> i32 {
        map.keys().max().copied().unwrap_or(0) + 1
    }

    #[async_trait]
    impl StudentRepository for MockStudentRepository {
        async fn insert(&self, input: &StudentInput) -> Result<Student, ServiceError> {
            let mut map = self.students.lock().unwrap();
            let student = Student {
                id: next_id(&map),
                nom: input.nom.clone(),
                prenom: input.prenom.clone(),
                date_naissance: input.date_naissance,
            };
            map.insert(student.id, student.clone());
            Ok(student)
        }

        async fn update(&self, student: Student) -> Result<Student, ServiceError> {
            let mut map = self.students.lock().unwrap();
            if !map.contains_key(&student.id) {
                return Err(ServiceError::not_found("student"));
            }
            map.insert(student.id, student.clone());
            Ok(student)
        }

        async fn find(&self, id: i32) -> Result<Option<Student>, ServiceError> {
            let map = self.students.lock().unwrap();
            Ok(map.get(&id).cloned())
        }

        async fn find_all(&self) -> Result<Vec<Student>, ServiceError> {
            let map = self.students.lock().unwrap();
            Ok(map.values().cloned().collect())
        }

        async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
            let mut map = self.students.lock().unwrap();
            Ok(map.remove(&id).is_some())
        }

        async fn count(&self) -> Result<u64, ServiceError> {
            let map = self.students.lock().unwrap();
            Ok(map.len() as u64)
        }

        async fn count_by_birth_year(&self) -> Result<Vec<YearCount>, ServiceError> {
            let map = self.students.lock().unwrap();
            Ok(year_histogram(&map))
        }
    }
}
