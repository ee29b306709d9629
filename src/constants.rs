pub const DEFAULT_API_BASE_URL: &str =
    "https://apollo-backend-0ktt.onrender.com/doctors/filterDoctors";
pub const DEFAULT_USER_AGENT: &str = "doctor-listing/0.1";

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Remaining unscrolled distance at or below which the list counts as "near the end".
pub const NEAR_END_THRESHOLD: u64 = 5;

/// Share of the consultation fee paid back for a doctor-of-the-hour listing.
pub const CASHBACK_RATE: f64 = 0.15;

pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/72";

pub const SUGGESTED_LOCATIONS: [&str; 13] = [
    "New York",
    "Los Angeles",
    "Chicago",
    "San Francisco",
    "Miami",
    "Boston",
    "Seattle",
    "Houston",
    "Dallas",
    "Washington D.C.",
    "Phoenix",
    "San Diego",
    "Pune",
];
