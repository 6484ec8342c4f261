//! Aggregate figures over the whole collection.

use crate::domain::book::{Book, ReadingStatus};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct BookStatistics {
    pub total_books: i64,
    pub not_started_books: i64,
    pub reading_books: i64,
    pub completed_books: i64,
    pub dropped_books: i64,
    /// Sum of purchase prices, whole yen.
    pub total_spent: i64,
    /// `null` until at least one book is rated.
    pub average_rating: Option<f64>,
    pub books_this_month: i64,
    pub completed_this_month: i64,
}

impl BookStatistics {
    fn count_status(&mut self, status: ReadingStatus) {
        match status {
            ReadingStatus::NotStarted => self.not_started_books += 1,
            ReadingStatus::Reading => self.reading_books += 1,
            ReadingStatus::Completed => self.completed_books += 1,
            ReadingStatus::Dropped => self.dropped_books += 1,
        }
    }
}

/// Midnight on the first day of `now`'s month, in `now`'s time zone.
pub fn month_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .unwrap_or_else(|| now.date_naive());
    let midnight = first.and_hms_opt(0, 0, 0).unwrap_or_default();
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        // Midnight skipped by a DST jump: fall back to the naive instant.
        .unwrap_or_else(|| midnight.and_utc())
}

/// Folds one snapshot of the collection, so every figure describes the same set of books.
pub fn summarize(books: &[Book], month_start: DateTime<Utc>) -> BookStatistics {
    let mut totals = BookStatistics::default();
    let mut rating_sum: i64 = 0;
    let mut rating_count: i64 = 0;

    for book in books {
        totals.total_books += 1;
        totals.count_status(book.status);
        totals.total_spent += book.purchase_price;

        if let Some(rating) = book.rating {
            rating_sum += i64::from(rating);
            rating_count += 1;
        }

        if book.purchase_date >= month_start {
            totals.books_this_month += 1;
        }

        let finished_this_month = book.end_read_date.is_some_and(|end| end >= month_start);
        if book.status == ReadingStatus::Completed && finished_this_month {
            totals.completed_this_month += 1;
        }
    }

    if rating_count > 0 {
        totals.average_rating = Some(rating_sum as f64 / rating_count as f64);
    }
    totals
}
