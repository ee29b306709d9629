use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::config::ListingConfig;
use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

#[derive(Parser, Debug)]
#[command(name = "doctor-listing")]
#[command(about = "Filtered, paginated doctor search against the doctor listing API", long_about = None)]
pub struct Args {
    /// Doctor search endpoint.
    #[arg(long, global = true, default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Records requested per page (fixed for the session).
    #[arg(long, global = true, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Per-request timeout; a timed-out request counts as a failed fetch.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    #[arg(long, global = true, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    #[command(subcommand)]
    pub cmd: Command,
}

impl Args {
    pub fn listing_config(&self) -> ListingConfig {
        ListingConfig {
            api_base_url: self.api_base_url.clone(),
            page_size: self.page_size,
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply filters once, load pages, print the listing and exit.
    Fetch(FetchArgs),
    /// Interactive session: change filters and scroll from stdin.
    Browse,
    /// Print every filter option list.
    Options,
}

#[derive(clap::Args, Debug, Clone)]
pub struct FetchArgs {
    /// Specialization / free-text search.
    #[arg(long, default_value = "")]
    pub search: String,

    #[arg(long, default_value = "")]
    pub location: String,

    /// Consult mode ("Hospital Visit", "Online Consult"). Repeatable.
    #[arg(long = "mode")]
    pub modes: Vec<String>,

    /// Start with no consult mode selected instead of both.
    #[arg(long)]
    pub no_default_modes: bool,

    /// Experience bucket (0-5, 6-10, 11-16, 16+). Repeatable.
    #[arg(long)]
    pub experience: Vec<String>,

    /// Fee bucket (100-500, 500-1000, 1000+). Repeatable.
    #[arg(long = "fee")]
    pub fees: Vec<String>,

    #[arg(long = "language")]
    pub languages: Vec<String>,

    /// Facility ("Apollo Hospital", "Other Clinics"). Repeatable.
    #[arg(long = "facility")]
    pub facilities: Vec<String>,

    /// Pages to load at most (page 0 plus continuation pages).
    #[arg(long, default_value_t = 1)]
    pub pages: usize,

    /// Print the result set as JSON instead of cards.
    #[arg(long)]
    pub json: bool,
}
