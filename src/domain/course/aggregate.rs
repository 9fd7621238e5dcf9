//! Course aggregate and the payload it is created from.
//!
//! # Design Decisions
//!
//! - **Money in cents**: prices are i64 in the smallest currency unit
//! - **Lazy payment plan**: `stripe_price_id` starts empty and is attached
//!   on the first enrollment attempt; a newer plan supersedes an older one

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, Timestamp, UserId, ValidationError};

/// Longest accepted course title, in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Longest accepted slug, in characters.
pub const MAX_SLUG_LEN: usize = 100;

/// Highest accepted price in cents.
pub const MAX_PRICE_CENTS: i64 = 99_999_999;

/// Course aggregate.
///
/// # Invariants
///
/// - `price_cents >= 0`
/// - `slug` is unique across courses (enforced by the store)
/// - at most one payment plan is current; `stripe_price_id` points at it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub price_cents: i64,
    pub slug: String,
    /// Admin who created the course.
    pub user_id: UserId,
    /// External price identifier of the current payment plan.
    pub stripe_price_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Course {
    /// Creates a course from a validated payload, with no payment plan yet.
    pub fn create(id: CourseId, owner: UserId, payload: NewCourse) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            title: payload.title,
            price_cents: payload.price_cents,
            slug: payload.slug,
            user_id: owner,
            stripe_price_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Records a newly provisioned payment plan, replacing any previous one.
    pub fn attach_price(&mut self, price_id: impl Into<String>) {
        self.stripe_price_id = Some(price_id.into());
        self.updated_at = Timestamp::now();
    }

    /// Changes the list price.
    ///
    /// The current plan is left in place; the plan provisioner is responsible
    /// for noticing a stale price on the next enrollment attempt.
    pub fn change_price(&mut self, price_cents: i64) -> Result<(), ValidationError> {
        validate_price(price_cents)?;
        self.price_cents = price_cents;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Returns true once a payment plan has been attached.
    pub fn has_payment_plan(&self) -> bool {
        self.stripe_price_id.is_some()
    }
}

/// Proposed course, as submitted by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCourse {
    pub title: String,
    pub price_cents: i64,
    pub slug: String,
}

impl NewCourse {
    /// Validates the payload, normalising the title whitespace.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        let title_len = title.chars().count();
        if title_len > MAX_TITLE_LEN {
            return Err(ValidationError::out_of_range(
                "title",
                1,
                MAX_TITLE_LEN as i64,
                title_len as i64,
            ));
        }

        validate_price(self.price_cents)?;
        validate_slug(&self.slug)?;

        Ok(Self {
            title,
            price_cents: self.price_cents,
            slug: self.slug,
        })
    }
}

fn validate_price(price_cents: i64) -> Result<(), ValidationError> {
    if !(0..=MAX_PRICE_CENTS).contains(&price_cents) {
        return Err(ValidationError::out_of_range(
            "price_cents",
            0,
            MAX_PRICE_CENTS,
            price_cents,
        ));
    }
    Ok(())
}

/// Slugs are lowercase ASCII words separated by single hyphens.
fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(ValidationError::empty_field("slug"));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(ValidationError::out_of_range(
            "slug",
            1,
            MAX_SLUG_LEN as i64,
            slug.len() as i64,
        ));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ValidationError::invalid_format(
            "slug",
            "only lowercase letters, digits and hyphens are allowed",
        ));
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err(ValidationError::invalid_format(
            "slug",
            "hyphens must separate words",
        ));
    }
    Ok(())
}
