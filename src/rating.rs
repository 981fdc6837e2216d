pub const MIN_RATING: f64 = 3.0;
pub const MAX_RATING: f64 = 5.0;

/// Supplies the placeholder rating attached to each record.
pub trait RatingSource {
    fn next_rating(&mut self) -> f64;
}

/// Uniform rating in `[MIN_RATING, MAX_RATING]`.
#[derive(Debug, Default)]
pub struct RandomRating {
    rng: fastrand::Rng,
}

impl RandomRating {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RatingSource for RandomRating {
    fn next_rating(&mut self) -> f64 {
        MIN_RATING + self.rng.f64() * (MAX_RATING - MIN_RATING)
    }
}

/// Always returns the same rating.
#[derive(Debug, Clone, Copy)]
pub struct FixedRating(pub f64);

impl RatingSource for FixedRating {
    fn next_rating(&mut self) -> f64 {
        self.0
    }
}

/// Clamps into the rating range and rounds to one decimal place.
pub fn normalize_rating(raw: f64) -> f64 {
    let clamped = if raw.is_nan() {
        MIN_RATING
    } else {
        raw.clamp(MIN_RATING, MAX_RATING)
    };
    (clamped * 10.0).round() / 10.0
}
