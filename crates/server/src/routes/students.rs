use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info};

use service::student::domain::{Student, StudentInput, YearCount};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[utoipa::path(
    post, path = "/api/students/save", tag = "students",
    request_body = crate::openapi::StudentInputDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn save(
    State(state): State<ServerState>,
    Json(input): Json<StudentInput>,
) -> Result<(StatusCode, Json<Student>), JsonApiError> {
    let saved = state.students.save(input).await?;
    info!(student_id = saved.id, "saved student");
    Ok((StatusCode::CREATED, Json(saved)))
}

#[utoipa::path(
    delete, path = "/api/students/delete/{id}", tag = "students",
    params(("id" = i32, Path, description = "Student id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i32>) -> StatusCode {
    match state.students.delete(id).await {
        Ok(true) => StatusCode::NO_CONTENT,
        Ok(false) => StatusCode::NOT_FOUND,
        Err(e) => {
            error!(student_id = id, err = %e, "delete student failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[utoipa::path(
    get, path = "/api/students/all", tag = "students",
    responses((status = 200, description = "List OK"))
)]
pub async fn find_all(State(state): State<ServerState>) -> Result<Json<Vec<Student>>, JsonApiError> {
    let students = state.students.find_all().await?;
    Ok(Json(students))
}

#[utoipa::path(
    get, path = "/api/students/{id}", tag = "students",
    params(("id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Student>, StatusCode> {
    match state.students.find(id).await {
        Ok(Some(s)) => Ok(Json(s)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[utoipa::path(
    get, path = "/api/students/count", tag = "students",
    responses((status = 200, description = "OK"))
)]
pub async fn count(State(state): State<ServerState>) -> Result<Json<u64>, JsonApiError> {
    let total = state.students.count_students().await?;
    Ok(Json(total))
}

#[utoipa::path(
    get, path = "/api/students/byYear", tag = "students",
    responses((status = 200, description = "OK"))
)]
pub async fn by_year(
    State(state): State<ServerState>,
) -> Result<Json<Vec<YearCount>>, JsonApiError> {
    let rows = state.students.count_by_birth_year().await?;
    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::NaiveDate;
    use tower::ServiceExt;
    use tower_http::cors::CorsLayer;

    use service::student::repository::mock::MockStudentRepository;
    use service::student::repository::StudentRepository;
    use service::student::service::StudentService;

    fn state_with(repo: MockStudentRepository) -> ServerState {
        let repo: Arc<dyn StudentRepository> = Arc::new(repo);
        ServerState { students: Arc::new(StudentService::new(repo)) }
    }

    fn input(nom: &str, prenom: &str, year: i32) -> StudentInput {
        StudentInput {
            id: None,
            nom: nom.into(),
            prenom: prenom.into(),
            date_naissance: NaiveDate::from_ymd_opt(year, 6, 1).unwrap(),
        }
    }

    fn seeded(ids_years: &[(i32, i32)]) -> MockStudentRepository {
        let students = ids_years
            .iter()
            .map(|&(id, year)| Student {
                id,
                nom: format!("Nom{id}"),
                prenom: format!("Prenom{id}"),
                date_naissance: NaiveDate::from_ymd_opt(year, 6, 1).unwrap(),
            })
            .collect();
        MockStudentRepository::with_students(students)
    }

    #[tokio::test]
    async fn save_returns_created_with_saved_body() {
        let state = state_with(MockStudentRepository::default());
        let (status, Json(body)) =
            save(State(state), Json(input("Mido", "Ahmed", 2001))).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.nom, "Mido");
        assert!(body.id > 0);
    }

    #[tokio::test]
    async fn save_with_blank_nom_is_bad_request() {
        let state = state_with(MockStudentRepository::default());
        let err = save(State(state), Json(input("  ", "Ahmed", 2001))).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn save_with_unknown_id_is_not_found() {
        let state = state_with(MockStudentRepository::default());
        let mut body = input("Mido", "Ahmed", 2001);
        body.id = Some(7);
        let err = save(State(state), Json(body)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_existing_is_no_content() {
        let state = state_with(seeded(&[(1, 2001)]));
        let status = delete(State(state), Path(1)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let state = state_with(MockStudentRepository::default());
        let status = delete(State(state), Path(1)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn find_all_returns_every_student() {
        let state = state_with(seeded(&[(1, 2001), (2, 1998)]));
        let Json(body) = find_all(State(state)).await.unwrap();
        assert_eq!(body.len(), 2);
    }

    #[tokio::test]
    async fn count_reports_store_size() {
        let pairs: Vec<(i32, i32)> = (1..=10).map(|id| (id, 2000)).collect();
        let state = state_with(seeded(&pairs));
        let Json(total) = count(State(state)).await.unwrap();
        assert_eq!(total, 10);
    }

    #[tokio::test]
    async fn by_year_with_empty_store_is_empty_list() {
        let state = state_with(MockStudentRepository::default());
        let Json(rows) = by_year(State(state)).await.unwrap();
        assert_eq!(rows.len(), 0);
    }

    #[tokio::test]
    async fn get_maps_missing_to_not_found() {
        let state = state_with(MockStudentRepository::default());
        let err = get(State(state), Path(9)).await.unwrap_err();
        assert_eq!(err, StatusCode::NOT_FOUND);
    }

    // Router-level checks: status codes and bodies as a client sees them.

    fn app(state: ServerState) -> axum::Router {
        crate::routes::build_router(CorsLayer::very_permissive(), "frontend", state)
    }

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn router_save_then_read_back() {
        let app = app(state_with(MockStudentRepository::default()));

        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/students/save")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"nom":"Mido","prenom":"Ahmed","dateNaissance":"2001-05-14"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let saved = body_json(res).await;
        assert_eq!(saved["nom"], "Mido");
        assert_eq!(saved["dateNaissance"], "2001-05-14");

        let res = app
            .clone()
            .oneshot(Request::builder().uri("/api/students/all").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let all = body_json(res).await;
        assert_eq!(all.as_array().unwrap().len(), 1);

        let res = app
            .clone()
            .oneshot(Request::builder().uri("/api/students/count").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, serde_json::json!(1));

        let res = app
            .oneshot(Request::builder().uri("/api/students/byYear").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            body_json(res).await,
            serde_json::json!([{"year": 2001, "count": 1}])
        );
    }

    #[tokio::test]
    async fn router_delete_missing_returns_not_found() {
        let app = app(state_with(MockStudentRepository::default()));
        let res = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/students/delete/99")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn router_delete_existing_returns_no_content_with_empty_body() {
        let app = app(state_with(seeded(&[(1, 2001)])));
        let res = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/students/delete/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn router_health_reports_ok() {
        let app = app(state_with(MockStudentRepository::default()));
        let res = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, serde_json::json!({"status": "ok"}));
    }
}
