// src/database.rs
//! SQLite storage for job descriptions, resumes, and evaluations.
//!
//! List fields on resumes and evaluations are serialized as JSON text
//! columns; the row structs own the raw columns and convert into the public
//! entities. The core pipeline never reads these entities back for its own
//! logic, storage is purely downstream.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use crate::evaluation::{CategoryBreakdown, EvaluationRecord, Verdict};
use crate::types::{EducationEntry, ExperienceEntry, ResumeLink};

// ===== Core Database Connection Management =====

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create new database connection with automatic setup
    pub async fn new(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            crate::utils::ensure_dir_exists(parent).await?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url).await.with_context(|| {
            format!("Failed to connect to database: {}", database_path.display())
        })?;

        info!(
            "Database connection established: {}",
            database_path.display()
        );

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get pool reference for custom operations
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS job_descriptions (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                company TEXT,
                jd_text TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS resumes (
                id TEXT PRIMARY KEY,
                candidate_name TEXT NOT NULL,
                email TEXT NOT NULL,
                filename TEXT NOT NULL,
                raw_text TEXT NOT NULL,
                skills TEXT NOT NULL,
                education TEXT NOT NULL,
                experience TEXT NOT NULL,
                links TEXT NOT NULL,
                jd_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (jd_id) REFERENCES job_descriptions(id)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS evaluations (
                id TEXT PRIMARY KEY,
                resume_id TEXT NOT NULL,
                jd_id TEXT NOT NULL,
                score REAL NOT NULL,
                verdict TEXT NOT NULL,
                category_breakdown TEXT NOT NULL,
                matched_skills TEXT NOT NULL,
                missing_skills TEXT NOT NULL,
                pros TEXT NOT NULL,
                cons TEXT NOT NULL,
                feedback TEXT NOT NULL,
                evaluated_at TEXT NOT NULL,
                FOREIGN KEY (resume_id) REFERENCES resumes(id),
                FOREIGN KEY (jd_id) REFERENCES job_descriptions(id)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_resumes_jd_id ON resumes(jd_id);")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_resumes_candidate_name ON resumes(candidate_name);",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_evaluations_jd_id ON evaluations(jd_id);")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_evaluations_resume_id ON evaluations(resume_id);",
        )
        .execute(&self.pool)
        .await?;

        info!("Database migrations completed");
        Ok(())
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}

// ===== Entities =====

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobDescription {
    pub id: String,
    pub title: String,
    pub company: Option<String>,
    pub jd_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    pub id: String,
    pub candidate_name: String,
    pub email: String,
    pub filename: String,
    pub raw_text: String,
    pub skills: Vec<String>,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub links: Vec<ResumeLink>,
    pub jd_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything the upload pipeline hands over for persistence.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub candidate_name: String,
    pub email: String,
    pub filename: String,
    pub raw_text: String,
    pub skills: Vec<String>,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub links: Vec<ResumeLink>,
    pub jd_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: String,
    pub resume_id: String,
    pub jd_id: String,
    pub score: f64,
    pub verdict: Verdict,
    pub category_breakdown: CategoryBreakdown,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub feedback: String,
    pub evaluated_at: DateTime<Utc>,
}

// ===== Row conversion =====

#[derive(sqlx::FromRow)]
struct ResumeRow {
    id: String,
    candidate_name: String,
    email: String,
    filename: String,
    raw_text: String,
    skills: String,
    education: String,
    experience: String,
    links: String,
    jd_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ResumeRow {
    fn into_resume(self) -> Resume {
        Resume {
            id: self.id,
            candidate_name: self.candidate_name,
            email: self.email,
            filename: self.filename,
            raw_text: self.raw_text,
            skills: serde_json::from_str(&self.skills).unwrap_or_default(),
            education: serde_json::from_str(&self.education).unwrap_or_default(),
            experience: serde_json::from_str(&self.experience).unwrap_or_default(),
            links: serde_json::from_str(&self.links).unwrap_or_default(),
            jd_id: self.jd_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EvaluationRow {
    id: String,
    resume_id: String,
    jd_id: String,
    score: f64,
    verdict: String,
    category_breakdown: String,
    matched_skills: String,
    missing_skills: String,
    pros: String,
    cons: String,
    feedback: String,
    evaluated_at: DateTime<Utc>,
}

impl EvaluationRow {
    fn into_evaluation(self) -> Evaluation {
        Evaluation {
            id: self.id,
            resume_id: self.resume_id,
            jd_id: self.jd_id,
            score: self.score,
            verdict: Verdict::from_raw(&self.verdict).unwrap_or(Verdict::NeedsReview),
            category_breakdown: serde_json::from_str(&self.category_breakdown).unwrap_or(
                CategoryBreakdown {
                    technical_skills: 0.0,
                    experience: 0.0,
                    education: 0.0,
                    communication: 0.0,
                },
            ),
            matched_skills: serde_json::from_str(&self.matched_skills).unwrap_or_default(),
            missing_skills: serde_json::from_str(&self.missing_skills).unwrap_or_default(),
            pros: serde_json::from_str(&self.pros).unwrap_or_default(),
            cons: serde_json::from_str(&self.cons).unwrap_or_default(),
            feedback: self.feedback,
            evaluated_at: self.evaluated_at,
        }
    }
}

// ===== Job Description Repository =====

pub struct JobRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> JobRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        title: &str,
        company: Option<&str>,
        jd_text: &str,
    ) -> Result<JobDescription> {
        let now = Utc::now();
        let job = JobDescription {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            company: company.map(str::to_string),
            jd_text: jd_text.to_string(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO job_descriptions (id, title, company, jd_text, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&job.id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.jd_text)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(self.pool)
        .await?;

        info!("Created job description: {} ({})", job.title, job.id);
        Ok(job)
    }

    pub async fn get(&self, id: &str) -> Result<Option<JobDescription>> {
        let job = sqlx::query_as::<_, JobDescription>(
            "SELECT * FROM job_descriptions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(job)
    }

    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<JobDescription>> {
        let jobs = sqlx::query_as::<_, JobDescription>(
            "SELECT * FROM job_descriptions ORDER BY created_at DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool)
        .await?;

        Ok(jobs)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM job_descriptions WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM job_descriptions")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

// ===== Resume Repository =====

pub struct ResumeRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ResumeRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_resume: NewResume) -> Result<Resume> {
        let now = Utc::now();
        let resume = Resume {
            id: Uuid::new_v4().to_string(),
            candidate_name: new_resume.candidate_name,
            email: new_resume.email,
            filename: new_resume.filename,
            raw_text: new_resume.raw_text,
            skills: new_resume.skills,
            education: new_resume.education,
            experience: new_resume.experience,
            links: new_resume.links,
            jd_id: new_resume.jd_id,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO resumes
                (id, candidate_name, email, filename, raw_text, skills, education,
                 experience, links, jd_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&resume.id)
        .bind(&resume.candidate_name)
        .bind(&resume.email)
        .bind(&resume.filename)
        .bind(&resume.raw_text)
        .bind(serde_json::to_string(&resume.skills)?)
        .bind(serde_json::to_string(&resume.education)?)
        .bind(serde_json::to_string(&resume.experience)?)
        .bind(serde_json::to_string(&resume.links)?)
        .bind(&resume.jd_id)
        .bind(resume.created_at)
        .bind(resume.updated_at)
        .execute(self.pool)
        .await?;

        info!(
            "Stored resume for candidate: {} ({})",
            resume.candidate_name, resume.id
        );
        Ok(resume)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Resume>> {
        let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(ResumeRow::into_resume))
    }

    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Resume>> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes ORDER BY created_at DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ResumeRow::into_resume).collect())
    }

    pub async fn list_by_jd(&self, jd_id: &str, skip: i64, limit: i64) -> Result<Vec<Resume>> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE jd_id = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
        )
        .bind(jd_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ResumeRow::into_resume).collect())
    }

    pub async fn search_by_name(&self, name: &str, skip: i64, limit: i64) -> Result<Vec<Resume>> {
        let pattern = format!("%{}%", name);
        let rows = sqlx::query_as::<_, ResumeRow>(
            r#"
            SELECT * FROM resumes WHERE candidate_name LIKE ?
            ORDER BY created_at DESC LIMIT ? OFFSET ?
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ResumeRow::into_resume).collect())
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM resumes")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

// ===== Evaluation Repository =====

pub struct EvaluationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EvaluationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        resume_id: &str,
        jd_id: &str,
        record: &EvaluationRecord,
    ) -> Result<Evaluation> {
        let evaluation = Evaluation {
            id: Uuid::new_v4().to_string(),
            resume_id: resume_id.to_string(),
            jd_id: jd_id.to_string(),
            score: record.score,
            verdict: record.verdict,
            category_breakdown: record.category_breakdown,
            matched_skills: record.matched_skills.clone(),
            missing_skills: record.missing_skills.clone(),
            pros: record.pros.clone(),
            cons: record.cons.clone(),
            feedback: record.feedback.clone(),
            evaluated_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO evaluations
                (id, resume_id, jd_id, score, verdict, category_breakdown,
                 matched_skills, missing_skills, pros, cons, feedback, evaluated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&evaluation.id)
        .bind(&evaluation.resume_id)
        .bind(&evaluation.jd_id)
        .bind(evaluation.score)
        .bind(evaluation.verdict.as_str())
        .bind(serde_json::to_string(&evaluation.category_breakdown)?)
        .bind(serde_json::to_string(&evaluation.matched_skills)?)
        .bind(serde_json::to_string(&evaluation.missing_skills)?)
        .bind(serde_json::to_string(&evaluation.pros)?)
        .bind(serde_json::to_string(&evaluation.cons)?)
        .bind(&evaluation.feedback)
        .bind(evaluation.evaluated_at)
        .execute(self.pool)
        .await?;

        info!(
            "Stored evaluation {} for resume {} against job {}",
            evaluation.id, resume_id, jd_id
        );
        Ok(evaluation)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Evaluation>> {
        let row = sqlx::query_as::<_, EvaluationRow>("SELECT * FROM evaluations WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(EvaluationRow::into_evaluation))
    }

    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Evaluation>> {
        let rows = sqlx::query_as::<_, EvaluationRow>(
            "SELECT * FROM evaluations ORDER BY evaluated_at DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(EvaluationRow::into_evaluation).collect())
    }

    pub async fn list_by_jd(&self, jd_id: &str, skip: i64, limit: i64) -> Result<Vec<Evaluation>> {
        let rows = sqlx::query_as::<_, EvaluationRow>(
            "SELECT * FROM evaluations WHERE jd_id = ? ORDER BY evaluated_at DESC LIMIT ? OFFSET ?",
        )
        .bind(jd_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(EvaluationRow::into_evaluation).collect())
    }

    pub async fn list_by_resume(
        &self,
        resume_id: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Evaluation>> {
        let rows = sqlx::query_as::<_, EvaluationRow>(
            r#"
            SELECT * FROM evaluations WHERE resume_id = ?
            ORDER BY evaluated_at DESC LIMIT ? OFFSET ?
            "#,
        )
        .bind(resume_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(EvaluationRow::into_evaluation).collect())
    }

    /// Highest-scoring evaluations for a job description.
    pub async fn top_by_jd(&self, jd_id: &str, limit: i64) -> Result<Vec<Evaluation>> {
        let rows = sqlx::query_as::<_, EvaluationRow>(
            "SELECT * FROM evaluations WHERE jd_id = ? ORDER BY score DESC LIMIT ?",
        )
        .bind(jd_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(EvaluationRow::into_evaluation).collect())
    }

    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM evaluations")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
