use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Wire-facing student record. Field names keep the original API's French
/// camelCase so existing dashboard clients work unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i32,
    pub nom: String,
    pub prenom: String,
    #[serde(rename = "dateNaissance")]
    pub date_naissance: NaiveDate,
}

/// Save input: `id` absent for inserts, present for updates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInput {
    #[serde(default)]
    pub id: Option<i32>,
    pub nom: String,
    pub prenom: String,
    #[serde(rename = "dateNaissance")]
    pub date_naissance: NaiveDate,
}

impl StudentInput {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.nom.trim().is_empty() {
            return Err(ServiceError::Validation("nom required".into()));
        }
        if self.prenom.trim().is_empty() {
            return Err(ServiceError::Validation("prenom required".into()));
        }
        Ok(())
    }
}

/// Number of students sharing a birth year.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: i64,
}

/// Group an in-memory student map by birth year, ascending. Shared by the
/// mock and file-backed repositories; the database path does this in SQL.
pub fn year_histogram(students: &HashMap<i32, Student>) -> Vec<YearCount> {
    let mut buckets: BTreeMap<i32, i64> = BTreeMap::new();
    for s in students.values() {
        *buckets.entry(s.date_naissance.year()).or_insert(0) += 1;
    }
    buckets
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: i32, year: i32) -> Student {
        Student {
            id,
            nom: format!("Nom{id}"),
            prenom: format!("Prenom{id}"),
            date_naissance: NaiveDate::from_ymd_opt(year, 6, 1).unwrap(),
        }
    }

    #[test]
    fn histogram_groups_and_sorts_ascending() {
        let mut map = HashMap::new();
        map.insert(1, student(1, 2002));
        map.insert(2, student(2, 1998));
        map.insert(3, student(3, 1998));
        let rows = year_histogram(&map);
        assert_eq!(
            rows,
            vec![
                YearCount { year: 1998, count: 2 },
                YearCount { year: 2002, count: 1 },
            ]
        );
    }

    #[test]
    fn histogram_of_empty_map_is_empty() {
        assert!(year_histogram(&HashMap::new()).is_empty());
    }

    #[test]
    fn input_validation_requires_both_names() {
        let mut input = StudentInput {
            id: None,
            nom: "Dupont".into(),
            prenom: "Marie".into(),
            date_naissance: NaiveDate::from_ymd_opt(2001, 5, 14).unwrap(),
        };
        assert!(input.validate().is_ok());
        input.nom = "   ".into();
        assert!(matches!(input.validate(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn wire_format_uses_camel_case_birth_date() {
        let s = student(7, 2000);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["dateNaissance"], "2000-06-01");
        assert!(json.get("date_naissance").is_none());
    }
}
