use std::{collections::HashMap, path::PathBuf, sync::Arc};

use tokio::{fs, sync::RwLock};

use crate::errors::ServiceError;
use crate::student::domain::{year_histogram, Student, StudentInput, YearCount};
use crate::student::repository::StudentRepository;

/// JSON file-backed student repository.
///
/// Persists the full student map to a single JSON file after every write.
/// Serves as the default backend when no database is configured; a real
/// deployment points `DATABASE_URL` at Postgres instead. Ids are assigned
/// max+1, so they stay stable across reloads.
pub struct FileStudentRepository {
    inner: Arc<RwLock<HashMap<i32, Student>>>,
    file_path: PathBuf,
}

impl FileStudentRepository {
    /// Initialize the store from a path. Creates the file with an empty map
    /// if missing; a corrupt file is treated as empty rather than fatal.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: HashMap<i32, Student> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => {
                let empty: HashMap<i32, Student> = HashMap::new();
                fs::write(
                    &file_path,
                    serde_json::to_vec(&empty).map_err(|e| ServiceError::Storage(e.to_string()))?,
                )
                .await
                .map_err(|e| ServiceError::Storage(e.to_string()))?;
                empty
            }
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    async fn save_to_disk(&self) -> Result<(), ServiceError> {
        let map = self.inner.read().await;
        let data = serde_json::to_vec(&*map).map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl StudentRepository for FileStudentRepository {
    async fn insert(&self, input: &StudentInput) -> Result<Student, ServiceError> {
        let student = {
            let mut map = self.inner.write().await;
            let id = map.keys().max().copied().unwrap_or(0) + 1;
            let student = Student {
                id,
                nom: input.nom.clone(),
                prenom: input.prenom.clone(),
                date_naissance: input.date_naissance,
            };
            map.insert(id, student.clone());
            student
        };
        self.save_to_disk().await?;
        Ok(student)
    }

    async fn update(&self, student: Student) -> Result<Student, ServiceError> {
        {
            let mut map = self.inner.write().await;
            if !map.contains_key(&student.id) {
                return Err(ServiceError::not_found("student"));
            }
            map.insert(student.id, student.clone());
        }
        self.save_to_disk().await?;
        Ok(student)
    }

    async fn find(&self, id: i32) -> Result<Option<Student>, ServiceError> {
        let map = self.inner.read().await;
        Ok(map.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Student>, ServiceError> {
        let map = self.inner.read().await;
        Ok(map.values().cloned().collect())
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let existed = {
            let mut map = self.inner.write().await;
            map.remove(&id).is_some()
        };
        self.save_to_disk().await?;
        Ok(existed)
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        let map = self.inner.read().await;
        Ok(map.len() as u64)
    }

    async fn count_by_birth_year(&self) -> Result<Vec<YearCount>, ServiceError> {
        let map = self.inner.read().await;
        Ok(year_histogram(&map))
    }
}
