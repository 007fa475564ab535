pub mod consolidate;
pub mod extract;
pub mod geocode;
