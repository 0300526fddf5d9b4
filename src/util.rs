/// Checked integer conversions.
///
/// This module provides conversions from the arbitrary-precision values of
/// base literals to the narrower types used by radixes and durations. Every
/// conversion returns a `Result` instead of truncating silently.
pub mod num;
