//! Field validation and the reading-status state machine.
//!
//! ```text
//! not_started --start--> reading
//! dropped     --start--> reading
//! reading     --finish--> completed
//! (any)       --update(status = X)--> X
//! ```
//!
//! Only `start` and `finish` are guarded. A direct update may move a book to any
//! status; the engine only derives the read dates that go with the new status.

use super::{Book, BookChanges, CreateBookRequest, NewBook, ReadingStatus, UpdateBookRequest};
use crate::domain::error::{BookError, BookResult};
use chrono::{DateTime, Utc};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

pub fn validate_id(id: i64) -> BookResult<()> {
    if id <= 0 {
        return Err(BookError::InvalidArgument(id.to_string()));
    }
    Ok(())
}

pub fn validate_rating(rating: Option<i32>) -> BookResult<()> {
    match rating {
        Some(r) if !(MIN_RATING..=MAX_RATING).contains(&r) => Err(BookError::BusinessRule(
            format!("rating must be between {MIN_RATING} and {MAX_RATING}: {r}"),
        )),
        _ => Ok(()),
    }
}

fn validate_price(price: i64) -> BookResult<()> {
    if price < 0 {
        return Err(BookError::Validation(format!(
            "purchase_price must not be negative: {price}"
        )));
    }
    Ok(())
}

/// Checks a create request against `now` and returns the fields to persist.
pub fn validate_create(req: CreateBookRequest, now: DateTime<Utc>) -> BookResult<NewBook> {
    let mut missing = Vec::new();
    if req.title.is_empty() {
        missing.push("title");
    }
    if req.author.is_empty() {
        missing.push("author");
    }
    if req.purchase_date.is_none() {
        missing.push("purchase_date");
    }
    if !missing.is_empty() {
        return Err(BookError::Validation(format!(
            "required field(s) missing: {}",
            missing.join(", ")
        )));
    }
    validate_price(req.purchase_price)?;

    let Some(purchase_date) = req.purchase_date else {
        return Err(BookError::Validation("purchase_date is required".to_string()));
    };
    if purchase_date > now {
        return Err(BookError::BusinessRule(
            "purchase_date must not be in the future".to_string(),
        ));
    }

    Ok(NewBook {
        title: req.title,
        author: req.author,
        isbn: req.isbn,
        publisher: req.publisher,
        published_date: req.published_date,
        purchase_date,
        purchase_price: req.purchase_price,
        tags: req.tags,
        notes: req.notes,
    })
}

/// Field checks that do not need the stored record.
pub fn validate_update(req: &UpdateBookRequest) -> BookResult<()> {
    validate_rating(req.rating)?;
    if let Some(price) = req.purchase_price {
        validate_price(price)?;
    }
    Ok(())
}

/// Translates an update request into a store write.
///
/// When the request moves the book to a different status, the read dates that belong
/// to the new status are filled in unless the caller supplied them. Re-sending the
/// current status derives nothing, so repeating an update is idempotent.
pub fn update_changes(current: &Book, req: UpdateBookRequest, now: DateTime<Utc>) -> BookChanges {
    let mut changes = BookChanges {
        title: req.title,
        author: req.author,
        isbn: req.isbn,
        publisher: req.publisher,
        published_date: req.published_date,
        purchase_price: req.purchase_price,
        status: req.status,
        start_read_date: req.start_read_date.map(Some),
        end_read_date: req.end_read_date.map(Some),
        rating: req.rating,
        notes: req.notes,
        tags: req.tags,
    };

    let Some(next) = req.status.filter(|s| *s != current.status) else {
        return changes;
    };

    match next {
        ReadingStatus::NotStarted => {
            changes.start_read_date.get_or_insert(None);
            changes.end_read_date.get_or_insert(None);
        }
        ReadingStatus::Reading => {
            changes.start_read_date.get_or_insert(Some(now));
            changes.end_read_date.get_or_insert(None);
        }
        ReadingStatus::Completed | ReadingStatus::Dropped => {
            changes.end_read_date.get_or_insert(Some(now));
        }
    }
    changes
}

/// Guarded `start` transition.
///
/// A dropped book may be restarted; the previous attempt's dates are discarded.
pub fn start_reading(current: &Book, now: DateTime<Utc>) -> BookResult<BookChanges> {
    match current.status {
        ReadingStatus::Reading => Err(BookError::BusinessRule(
            "book is already being read".to_string(),
        )),
        ReadingStatus::Completed => Err(BookError::BusinessRule(
            "book has already been completed".to_string(),
        )),
        ReadingStatus::NotStarted | ReadingStatus::Dropped => Ok(BookChanges {
            status: Some(ReadingStatus::Reading),
            start_read_date: Some(Some(now)),
            end_read_date: Some(None),
            ..Default::default()
        }),
    }
}

/// Guarded `finish` transition. An absent rating leaves the stored rating alone.
pub fn finish_reading(
    current: &Book,
    rating: Option<i32>,
    now: DateTime<Utc>,
) -> BookResult<BookChanges> {
    if current.status != ReadingStatus::Reading {
        return Err(BookError::BusinessRule(format!(
            "book is not currently being read (status: {})",
            current.status
        )));
    }
    validate_rating(rating)?;
    Ok(BookChanges {
        status: Some(ReadingStatus::Completed),
        end_read_date: Some(Some(now)),
        rating,
        ..Default::default()
    })
}
