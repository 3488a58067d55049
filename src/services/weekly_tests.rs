use std::collections::HashMap;

use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::db::{students, weekly_tests as repository};
use crate::error::AppError;
use crate::models::{
    EvaluationInput, NewTestResultRequest, NewWeeklyTestRequest, ScoreInput,
    StudentTestEvaluation, TestEvaluation, TestResult, TestResultDetails, UpdateWeeklyTestRequest,
    WeeklyTest, WeeklyTestDetails,
};

/// Sums request-supplied points, rejecting totals that do not fit in an `i32`.
fn checked_total(values: impl IntoIterator<Item = i32>) -> Result<i32, AppError> {
    values
        .into_iter()
        .try_fold(0i32, |acc, v| acc.checked_add(v))
        .ok_or_else(|| AppError::Validation("Point values are too large.".to_string()))
}

/// Checks the criteria of a new test: at least one, each named, none
/// negative, and together worth exactly `total_value`.
pub fn validate_evaluations(total_value: i32, evaluations: &[EvaluationInput]) -> Result<(), AppError> {
    if evaluations.is_empty() {
        return Err(AppError::Validation(
            "A test needs at least one evaluation criterion.".to_string(),
        ));
    }
    if evaluations.iter().any(|e| e.name.trim().is_empty()) {
        return Err(AppError::Validation("Every criterion needs a name.".to_string()));
    }
    if evaluations.iter().any(|e| e.max_value < 0) {
        return Err(AppError::Validation(
            "Criterion values cannot be negative.".to_string(),
        ));
    }

    let sum = checked_total(evaluations.iter().map(|e| e.max_value))?;
    if sum != total_value {
        return Err(AppError::Validation(format!(
            "The sum of criteria values ({}) does not match the total value ({}).",
            sum, total_value
        )));
    }
    Ok(())
}

/// Matches scores to the test's criteria and returns the total.
/// Every criterion must be scored exactly once, within `0..=max_value`.
pub fn score_result(evaluations: &[TestEvaluation], scores: &[ScoreInput]) -> Result<i32, AppError> {
    let by_id: HashMap<&str, &TestEvaluation> =
        evaluations.iter().map(|e| (e.id.as_str(), e)).collect();

    let mut seen: HashMap<&str, i32> = HashMap::new();
    for score in scores {
        let evaluation = by_id.get(score.test_evaluation_id.as_str()).ok_or_else(|| {
            AppError::Validation(format!(
                "Criterion {} does not belong to this test.",
                score.test_evaluation_id
            ))
        })?;
        if score.score < 0 || score.score > evaluation.max_value {
            return Err(AppError::Validation(format!(
                "Score for {} must be between 0 and {}.",
                evaluation.name, evaluation.max_value
            )));
        }
        if seen.insert(evaluation.id.as_str(), score.score).is_some() {
            return Err(AppError::Validation(format!(
                "{} was scored more than once.",
                evaluation.name
            )));
        }
    }

    if let Some(missing) = evaluations.iter().find(|e| !seen.contains_key(e.id.as_str())) {
        return Err(AppError::Validation(format!("{} has no score.", missing.name)));
    }

    checked_total(seen.values().copied())
}

pub struct WeeklyTestService {
    db: SqlitePool,
}

impl WeeklyTestService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create_test(
        &self,
        req: NewWeeklyTestRequest,
        created_by: Option<&str>,
    ) -> Result<WeeklyTestDetails, AppError> {
        validate_evaluations(req.total_value, &req.evaluations)?;

        let test = WeeklyTest {
            id: Uuid::new_v4().to_string(),
            created_by: created_by.map(str::to_string),
            date: req.date,
            notes: req.notes.filter(|n| !n.trim().is_empty()),
            total_value: req.total_value,
        };
        let evaluations: Vec<TestEvaluation> = req
            .evaluations
            .into_iter()
            .map(|e| TestEvaluation {
                id: Uuid::new_v4().to_string(),
                test_id: test.id.clone(),
                name: e.name.trim().to_string(),
                max_value: e.max_value,
            })
            .collect();

        repository::insert_test_with_evaluations(&self.db, &test, &evaluations).await?;
        info!(test_id = %test.id, criteria = evaluations.len(), "weekly test created");

        Ok(WeeklyTestDetails {
            test,
            test_evaluations: evaluations,
            test_results: Vec::new(),
        })
    }

    pub async fn record_result(
        &self,
        test_id: &str,
        req: NewTestResultRequest,
    ) -> Result<TestResultDetails, AppError> {
        if repository::find_test_by_id(&self.db, test_id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        if students::find_student_by_id(&self.db, &req.student_id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        let evaluations = repository::fetch_evaluations(&self.db, test_id).await?;
        let total_score = score_result(&evaluations, &req.scores)?;

        let result = TestResult {
            id: Uuid::new_v4().to_string(),
            test_id: test_id.to_string(),
            student_id: req.student_id,
            total_score,
        };
        let scores: Vec<StudentTestEvaluation> = req
            .scores
            .into_iter()
            .map(|s| StudentTestEvaluation {
                id: Uuid::new_v4().to_string(),
                test_result_id: result.id.clone(),
                test_evaluation_id: s.test_evaluation_id,
                score: s.score,
            })
            .collect();

        repository::insert_result_with_scores(&self.db, &result, &scores).await?;
        info!(test_id, student_id = %result.student_id, total_score, "test result recorded");

        Ok(TestResultDetails {
            result,
            student_test_evaluations: scores,
        })
    }

    pub async fn details(&self, test_id: &str) -> Result<WeeklyTestDetails, AppError> {
        let test = repository::find_test_by_id(&self.db, test_id)
            .await?
            .ok_or(AppError::NotFound)?;
        self.expand(test).await
    }

    /// All tests, newest first, each with criteria and results.
    pub async fn list_with_details(&self) -> Result<Vec<WeeklyTestDetails>, AppError> {
        let tests = repository::fetch_tests(&self.db).await?;
        let mut details = Vec::with_capacity(tests.len());
        for test in tests {
            details.push(self.expand(test).await?);
        }
        Ok(details)
    }

    pub async fn update_test(
        &self,
        test_id: &str,
        req: UpdateWeeklyTestRequest,
    ) -> Result<WeeklyTest, AppError> {
        let current = repository::find_test_by_id(&self.db, test_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let total_value = req.total_value.unwrap_or(current.total_value);
        if total_value < 0 {
            return Err(AppError::Validation("Total value cannot be negative.".to_string()));
        }
        let notes = match req.notes {
            Some(n) if n.trim().is_empty() => None,
            Some(n) => Some(n),
            None => current.notes,
        };

        repository::update_test(&self.db, test_id, notes.as_deref(), total_value)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn update_evaluation(
        &self,
        evaluation_id: &str,
        req: EvaluationInput,
    ) -> Result<TestEvaluation, AppError> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Every criterion needs a name.".to_string()));
        }
        if req.max_value < 0 {
            return Err(AppError::Validation(
                "Criterion values cannot be negative.".to_string(),
            ));
        }

        repository::update_evaluation(&self.db, evaluation_id, name, req.max_value)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn delete_test(&self, test_id: &str) -> Result<(), AppError> {
        if !repository::delete_test(&self.db, test_id).await? {
            return Err(AppError::NotFound);
        }
        info!(test_id, "weekly test deleted");
        Ok(())
    }

    pub async fn delete_result(&self, result_id: &str) -> Result<(), AppError> {
        if !repository::delete_result(&self.db, result_id).await? {
            return Err(AppError::NotFound);
        }
        info!(result_id, "test result deleted");
        Ok(())
    }

    async fn expand(&self, test: WeeklyTest) -> Result<WeeklyTestDetails, AppError> {
        let evaluations = repository::fetch_evaluations(&self.db, &test.id).await?;
        let results = repository::fetch_results(&self.db, &test.id).await?;

        let mut test_results = Vec::with_capacity(results.len());
        for result in results {
            let scores = repository::fetch_scores(&self.db, &result.id).await?;
            test_results.push(TestResultDetails {
                result,
                student_test_evaluations: scores,
            });
        }

        Ok(WeeklyTestDetails {
            test,
            test_evaluations: evaluations,
            test_results,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::db::memory_pool;
    use crate::models::NewStudentRequest;

    fn criterion(name: &str, max_value: i32) -> EvaluationInput {
        EvaluationInput {
            name: name.to_string(),
            max_value,
        }
    }

    fn new_test(total_value: i32, evaluations: Vec<EvaluationInput>) -> NewWeeklyTestRequest {
        NewWeeklyTestRequest {
            date: NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
            notes: Some("Juz 30 review".to_string()),
            total_value,
            evaluations,
        }
    }

    #[test]
    fn test_evaluation_sum_must_match_total() {
        assert!(validate_evaluations(20, &[criterion("Tajweed", 5), criterion("Hifz", 15)]).is_ok());
        assert!(matches!(
            validate_evaluations(20, &[criterion("Tajweed", 5), criterion("Hifz", 10)]),
            Err(AppError::Validation(_))
        ));
        assert!(validate_evaluations(0, &[]).is_err());
        assert!(validate_evaluations(5, &[criterion(" ", 5)]).is_err());
    }

    #[test]
    fn test_oversized_criteria_are_rejected() {
        assert!(matches!(
            validate_evaluations(0, &[criterion("Tajweed", i32::MAX), criterion("Hifz", 1)]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_evaluations(
                0,
                &[
                    criterion("Tajweed", i32::MAX),
                    criterion("Hifz", i32::MAX),
                    criterion("Makharij", 2)
                ]
            ),
            Err(AppError::Validation(_))
        ));

        let evaluations = vec![
            TestEvaluation {
                id: "e1".to_string(),
                test_id: "t1".to_string(),
                name: "Tajweed".to_string(),
                max_value: i32::MAX,
            },
            TestEvaluation {
                id: "e2".to_string(),
                test_id: "t1".to_string(),
                name: "Hifz".to_string(),
                max_value: i32::MAX,
            },
        ];
        let scores = vec![
            ScoreInput {
                test_evaluation_id: "e1".to_string(),
                score: i32::MAX,
            },
            ScoreInput {
                test_evaluation_id: "e2".to_string(),
                score: 1,
            },
        ];
        assert!(matches!(
            score_result(&evaluations, &scores),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_test_and_record_result() {
        let pool = memory_pool().await.expect("Failed to create test db");
        let student = students::insert_student(
            &pool,
            NewStudentRequest {
                full_name: "Ismail".to_string(),
                family_name: None,
                family_phone: None,
                current_hifz_page: 0,
            },
            None,
        )
        .await
        .expect("Failed to insert student");
        let service = WeeklyTestService::new(pool);

        let created = service
            .create_test(new_test(20, vec![criterion("Tajweed", 5), criterion("Hifz", 15)]), Some("ustaz-1"))
            .await
            .expect("create failed");
        assert_eq!(created.test_evaluations.len(), 2);

        let scores: Vec<ScoreInput> = created
            .test_evaluations
            .iter()
            .map(|e| ScoreInput {
                test_evaluation_id: e.id.clone(),
                score: e.max_value - 1,
            })
            .collect();
        let result = service
            .record_result(
                &created.test.id,
                NewTestResultRequest {
                    student_id: student.id.clone(),
                    scores,
                },
            )
            .await
            .expect("record failed");
        assert_eq!(result.result.total_score, 18);

        let details = service.details(&created.test.id).await.expect("details failed");
        assert_eq!(details.test_results.len(), 1);
        assert_eq!(details.test_results[0].student_test_evaluations.len(), 2);

        service.delete_result(&result.result.id).await.expect("delete failed");
        let details = service.details(&created.test.id).await.expect("details failed");
        assert!(details.test_results.is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_and_missing_scores_are_rejected() {
        let pool = memory_pool().await.expect("Failed to create test db");
        let student = students::insert_student(
            &pool,
            NewStudentRequest {
                full_name: "Idris".to_string(),
                family_name: None,
                family_phone: None,
                current_hifz_page: 0,
            },
            None,
        )
        .await
        .expect("Failed to insert student");
        let service = WeeklyTestService::new(pool);
        let created = service
            .create_test(new_test(10, vec![criterion("Tajweed", 4), criterion("Hifz", 6)]), None)
            .await
            .expect("create failed");
        let tajweed = created.test_evaluations[0].id.clone();

        let too_high = service
            .record_result(
                &created.test.id,
                NewTestResultRequest {
                    student_id: student.id.clone(),
                    scores: vec![ScoreInput {
                        test_evaluation_id: tajweed.clone(),
                        score: 9,
                    }],
                },
            )
            .await;
        assert!(matches!(too_high, Err(AppError::Validation(_))));

        let partial = service
            .record_result(
                &created.test.id,
                NewTestResultRequest {
                    student_id: student.id.clone(),
                    scores: vec![ScoreInput {
                        test_evaluation_id: tajweed,
                        score: 3,
                    }],
                },
            )
            .await;
        assert!(matches!(partial, Err(AppError::Validation(_))));

        service.delete_test(&created.test.id).await.expect("delete failed");
        assert!(matches!(service.details(&created.test.id).await, Err(AppError::NotFound)));
    }
}
