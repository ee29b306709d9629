use anyhow::{Context, anyhow};

use crate::api::HttpDoctorSearch;
use crate::cli::FetchArgs;
use crate::config::ListingConfig;
use crate::controller::{FetchOutcome, ListingController};
use crate::error::ListingError;
use crate::filters::{FilterDimension, FilterState};
use crate::render::render_listing;

/// Builds the starting filters from command-line flags.
///
/// Passing any `--mode` replaces the default "both modes" selection.
pub fn filters_from_args(args: &FetchArgs) -> Result<FilterState, ListingError> {
    let mut filters = FilterState::default();
    if args.no_default_modes || !args.modes.is_empty() {
        filters.consult_modes.clear();
    }

    filters.apply(FilterDimension::Search, &args.search)?;
    filters.apply(FilterDimension::Location, &args.location)?;

    let selections = [
        (FilterDimension::Mode, &args.modes),
        (FilterDimension::Experience, &args.experience),
        (FilterDimension::Fee, &args.fees),
        (FilterDimension::Language, &args.languages),
        (FilterDimension::Facility, &args.facilities),
    ];
    for (dimension, values) in selections {
        for value in values {
            filters.select(dimension, value)?;
        }
    }
    Ok(filters)
}

pub async fn run(config: ListingConfig, args: FetchArgs) -> anyhow::Result<()> {
    let config = config.validate().context("invalid listing config")?;
    let filters = filters_from_args(&args).context("invalid filter flags")?;
    let api = HttpDoctorSearch::new(&config)?;
    let controller = ListingController::with_filters(api, config.page_size()?, filters);

    tracing::info!(
        "Querying {} (page size {}, up to {} page(s))",
        config.api_base_url,
        config.page_size,
        args.pages.max(1)
    );

    let mut loaded = match controller.load_initial().await {
        FetchOutcome::Loaded { .. } => 1,
        _ => 0,
    };
    while loaded > 0 && loaded < args.pages.max(1) {
        match controller.notify_near_end().await {
            FetchOutcome::Loaded { .. } => loaded += 1,
            _ => break,
        }
    }

    let results = controller.results();
    if args.json {
        let body = serde_json::to_string_pretty(&results).context("serialize result set")?;
        println!("{body}");
    } else {
        print!("{}", render_listing(&results));
    }

    match results.last_error {
        Some(err) => Err(anyhow!(err)),
        None => Ok(()),
    }
}
