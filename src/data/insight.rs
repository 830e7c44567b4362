//! One-line takeaways shown under each chart.

use super::aggregate::{CountryDuration, RatingCount, TypeCount, YearCount};
use super::filter::FilterCriteria;
use super::model::ContentType;

/// Type with the most titles. Ties go to the type listed first.
pub fn dominant_type(distribution: &[TypeCount]) -> Option<ContentType> {
    distribution
        .iter()
        .fold(None::<&TypeCount>, |best, tc| match best {
            Some(b) if b.count >= tc.count => Some(b),
            _ => Some(tc),
        })
        .filter(|tc| tc.count > 0)
        .map(|tc| tc.kind)
}

pub fn most_common_type(distribution: &[TypeCount]) -> Option<String> {
    dominant_type(distribution).map(|kind| format!("Most content is of type {kind}."))
}

/// Year with the most additions; the earliest wins a tie.
pub fn peak_year(over_time: &[YearCount]) -> Option<String> {
    over_time
        .iter()
        .fold(None::<&YearCount>, |best, yc| match best {
            Some(b) if b.count >= yc.count => Some(b),
            _ => Some(yc),
        })
        .map(|yc| format!("Most titles were added in {}.", yc.year))
}

pub fn top_rating(ratings: &[RatingCount]) -> Option<String> {
    ratings
        .first()
        .map(|r| format!("The most frequent rating is {}.", r.rating))
}

pub fn longest_duration(durations: &[CountryDuration]) -> Option<String> {
    durations.first().map(|d| {
        format!(
            "{} has the longest average movie duration: {} minutes.",
            d.country,
            d.mean_minutes.round()
        )
    })
}

pub fn growth(trend: &[YearCount]) -> Option<String> {
    let (first, last) = (trend.first()?, trend.last()?);
    Some(format!(
        "From {} to {}, the catalogue grew to {} titles.",
        first.year, last.year, last.count
    ))
}

/// Sentence describing the whole filtered view.
pub fn view_summary(
    criteria: &FilterCriteria,
    row_count: usize,
    distribution: &[TypeCount],
) -> Option<String> {
    let kind = dominant_type(distribution)?;
    Some(format!(
        "This filtered view contains {row_count} titles spanning {} years, mostly of type {kind}.",
        criteria.years.span()
    ))
}
