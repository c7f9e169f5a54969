use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    entity::prelude::*, DatabaseConnection, FromQueryResult, Order, PaginatorTrait, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nom: String,
    pub prenom: String,
    pub date_naissance: Date,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

/// Number of students sharing a birth year.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: i64,
}

fn validate(nom: &str, prenom: &str) -> Result<(), errors::ModelError> {
    if nom.trim().is_empty() {
        return Err(errors::ModelError::Validation("nom required".into()));
    }
    if prenom.trim().is_empty() {
        return Err(errors::ModelError::Validation("prenom required".into()));
    }
    Ok(())
}

/// Insert a new student; the database assigns the id.
pub async fn create(
    db: &DatabaseConnection,
    nom: &str,
    prenom: &str,
    date_naissance: NaiveDate,
) -> Result<Model, errors::ModelError> {
    validate(nom, prenom)?;
    let am = ActiveModel {
        nom: Set(nom.to_string()),
        prenom: Set(prenom.to_string()),
        date_naissance: Set(date_naissance),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Update an existing student; `None` when the id is unknown.
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    nom: &str,
    prenom: &str,
    date_naissance: NaiveDate,
) -> Result<Option<Model>, errors::ModelError> {
    validate(nom, prenom)?;
    let found = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    let Some(found) = found else { return Ok(None) };
    let mut am: ActiveModel = found.into();
    am.nom = Set(nom.to_string());
    am.prenom = Set(prenom.to_string());
    am.date_naissance = Set(date_naissance);
    let updated = am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(Some(updated))
}

pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Delete by id; returns whether a row existed.
pub async fn delete_by_id(db: &DatabaseConnection, id: i32) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

pub async fn count(db: &DatabaseConnection) -> Result<u64, errors::ModelError> {
    Entity::find()
        .count(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Students per birth year, ascending. Empty table yields an empty list.
pub async fn count_by_birth_year(db: &DatabaseConnection) -> Result<Vec<YearCount>, errors::ModelError> {
    Entity::find()
        .select_only()
        .column_as(Expr::cust("CAST(EXTRACT(YEAR FROM date_naissance) AS INT4)"), "year")
        .column_as(Column::Id.count(), "count")
        .group_by(Expr::cust("EXTRACT(YEAR FROM date_naissance)"))
        .order_by(Expr::cust("year"), Order::Asc)
        .into_model::<YearCount>()
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
