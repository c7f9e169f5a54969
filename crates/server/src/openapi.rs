use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct StudentDoc {
    pub id: i32,
    pub nom: String,
    pub prenom: String,
    #[schema(format = Date)]
    pub date_naissance: String,
}

#[derive(ToSchema)]
pub struct StudentInputDoc {
    pub id: Option<i32>,
    pub nom: String,
    pub prenom: String,
    #[schema(format = Date)]
    pub date_naissance: String,
}

#[derive(ToSchema)]
pub struct YearCountDoc {
    pub year: i32,
    pub count: i64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::students::save,
        crate::routes::students::delete,
        crate::routes::students::find_all,
        crate::routes::students::get,
        crate::routes::students::count,
        crate::routes::students::by_year,
    ),
    components(
        schemas(
            HealthResponse,
            StudentDoc,
            StudentInputDoc,
            YearCountDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "students")
    )
)]
pub struct ApiDoc;
