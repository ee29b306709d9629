pub mod api;
pub mod browse;
pub mod cli;
pub mod config;
pub mod constants;
pub mod controller;
pub mod doctor;
pub mod error;
pub mod fetch;
pub mod filters;
pub mod render;

pub use api::{DoctorSearchApi, HttpDoctorSearch};
pub use config::ListingConfig;
pub use controller::{
    FetchMode, FetchOutcome, ListingController, PageCursor, ResultSet, ScrollPosition,
};
pub use doctor::{DoctorRecord, Experience, RawDoctor};
pub use error::ListingError;
pub use filters::{FilterDimension, FilterState, SearchQuery};
