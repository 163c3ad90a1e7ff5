// ABOUTME: Database operations for coach accounts and their one-to-one profiles
// ABOUTME: Registration creates both rows together; profiles are otherwise created lazily
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::{format_timestamp, parse_optional_date, parse_timestamp, parse_uuid};
use crate::constants::error_messages;
use crate::errors::{is_unique_violation, AppError, AppResult};
use crate::models::{Coach, CoachProfile, Gender, Sport};

const COACH_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, created_at";

/// Account fields collected at registration
#[derive(Debug, Clone)]
pub struct NewCoach {
    /// Login name
    pub username: String,
    /// Email, lower-cased by the caller
    pub email: String,
    /// bcrypt hash of the chosen password
    pub password_hash: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

/// Profile page submission, covering both account and profile columns
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Email, lower-cased by the caller
    pub email: String,
    /// Default sport for new teams
    pub sport: Sport,
    /// Optional gender
    pub gender: Option<Gender>,
    /// Optional birthday
    pub birthday: Option<NaiveDate>,
    /// Optional picture reference
    pub profile_picture: Option<String>,
}

/// Coach account manager
pub struct CoachManager {
    pool: SqlitePool,
}

impl CoachManager {
    /// Create a new coach manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a coach together with an empty profile
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the username or email is taken,
    /// or a database error
    pub async fn create(&self, new: &NewCoach) -> AppResult<Coach> {
        let coach = Coach {
            id: Uuid::new_v4(),
            username: new.username.clone(),
            email: new.email.clone(),
            password_hash: new.password_hash.clone(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            created_at: Utc::now(),
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO coaches (id, username, email, password_hash, first_name, last_name, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(coach.id.to_string())
        .bind(&coach.username)
        .bind(&coach.email)
        .bind(&coach.password_hash)
        .bind(&coach.first_name)
        .bind(&coach.last_name)
        .bind(format_timestamp(coach.created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists("Username or email is already registered.")
            } else {
                AppError::database(format!("Failed to create coach: {e}"))
            }
        })?;

        sqlx::query("INSERT INTO coach_profiles (coach_id, sport) VALUES ($1, $2)")
            .bind(coach.id.to_string())
            .bind(Sport::Other.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to create coach profile: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit registration: {e}")))?;

        info!(coach_id = %coach.id, username = %coach.username, "Coach registered");
        Ok(coach)
    }

    /// Get a coach by id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, coach_id: Uuid) -> AppResult<Option<Coach>> {
        let row = sqlx::query(&format!("SELECT {COACH_COLUMNS} FROM coaches WHERE id = $1"))
            .bind(coach_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get coach: {e}")))?;

        row.map(|r| row_to_coach(&r)).transpose()
    }

    /// Find a coach by username (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<Coach>> {
        let row = sqlx::query(&format!(
            "SELECT {COACH_COLUMNS} FROM coaches WHERE username = $1"
        ))
        .bind(username.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find coach by username: {e}")))?;

        row.map(|r| row_to_coach(&r)).transpose()
    }

    /// Find a coach by email (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Coach>> {
        let row = sqlx::query(&format!("SELECT {COACH_COLUMNS} FROM coaches WHERE email = $1"))
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to find coach by email: {e}")))?;

        row.map(|r| row_to_coach(&r)).transpose()
    }

    /// Resolve a login identifier
    ///
    /// Identifiers containing `@` are looked up as an email first; anything
    /// else as a username, falling back to email.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<Coach>> {
        let identifier = identifier.trim();
        if identifier.contains('@') {
            if let Some(coach) = self.find_by_email(identifier).await? {
                return Ok(Some(coach));
            }
            return self.find_by_username(identifier).await;
        }
        if let Some(coach) = self.find_by_username(identifier).await? {
            return Ok(Some(coach));
        }
        self.find_by_email(identifier).await
    }

    /// Whether `username` is registered (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn username_taken(&self, username: &str) -> AppResult<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM coaches WHERE username = $1")
            .bind(username.trim())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check username: {e}")))?;
        Ok(count > 0)
    }

    /// Whether `email` is registered to anyone other than `except`
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn email_taken(&self, email: &str, except: Option<Uuid>) -> AppResult<bool> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM coaches WHERE email = $1 AND id <> $2")
                .bind(email.trim())
                .bind(except.map(|id| id.to_string()).unwrap_or_default())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to check email: {e}")))?;
        Ok(count > 0)
    }

    /// Replace the stored password hash
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the coach does not exist, or a
    /// database error
    pub async fn update_password(&self, coach_id: Uuid, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE coaches SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(coach_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update password: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Coach"));
        }
        info!(coach_id = %coach_id, "Password changed");
        Ok(())
    }

    /// Get the coach's profile, creating an empty one if absent
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn profile(&self, coach_id: Uuid) -> AppResult<CoachProfile> {
        sqlx::query(
            "INSERT INTO coach_profiles (coach_id, sport) VALUES ($1, $2) ON CONFLICT (coach_id) DO NOTHING",
        )
        .bind(coach_id.to_string())
        .bind(Sport::Other.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to provision profile: {e}")))?;

        let row = sqlx::query(
            r"
            SELECT coach_id, sport, gender, birthday, profile_picture
            FROM coach_profiles
            WHERE coach_id = $1
            ",
        )
        .bind(coach_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get profile: {e}")))?;

        row_to_profile(&row)
    }

    /// Apply a profile page submission to both the account and the profile
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the email belongs to another
    /// coach, or a database error
    pub async fn update_profile(&self, coach_id: Uuid, update: &ProfileUpdate) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query("UPDATE coaches SET first_name = $1, last_name = $2, email = $3 WHERE id = $4")
            .bind(&update.first_name)
            .bind(&update.last_name)
            .bind(&update.email)
            .bind(coach_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::already_exists(error_messages::EMAIL_TAKEN)
                } else {
                    AppError::database(format!("Failed to update coach: {e}"))
                }
            })?;

        sqlx::query(
            r"
            INSERT INTO coach_profiles (coach_id, sport, gender, birthday, profile_picture)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (coach_id) DO UPDATE SET
                sport = excluded.sport,
                gender = excluded.gender,
                birthday = excluded.birthday,
                profile_picture = excluded.profile_picture
            ",
        )
        .bind(coach_id.to_string())
        .bind(update.sport.as_str())
        .bind(update.gender.map(|g| g.as_str()))
        .bind(update.birthday.map(|d| d.to_string()))
        .bind(&update.profile_picture)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update profile: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit profile update: {e}")))?;

        info!(coach_id = %coach_id, sport = %update.sport, "Profile updated");
        Ok(())
    }
}

fn row_to_coach(row: &SqliteRow) -> AppResult<Coach> {
    let id: String = row.get("id");
    let created_at: String = row.get("created_at");

    Ok(Coach {
        id: parse_uuid(&id)?,
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        created_at: parse_timestamp(&created_at)?,
    })
}

fn row_to_profile(row: &SqliteRow) -> AppResult<CoachProfile> {
    let coach_id: String = row.get("coach_id");
    let sport: String = row.get("sport");
    let gender: Option<String> = row.get("gender");

    Ok(CoachProfile {
        coach_id: parse_uuid(&coach_id)?,
        sport: Sport::parse_lossy(&sport),
        gender: gender.as_deref().and_then(Gender::parse),
        birthday: parse_optional_date(row.get("birthday"))?,
        profile_picture: row.get("profile_picture"),
    })
}
