use std::fmt::{self, Display, Formatter};

use crate::constants::{PLACEHOLDER_IMAGE_URL, SUGGESTED_LOCATIONS};
use crate::controller::ResultSet;
use crate::doctor::DoctorRecord;
use crate::filters::{FilterDimension, FilterState};

/// One numbered doctor card.
pub struct Card<'a> {
    pub index: usize,
    pub doctor: &'a DoctorRecord,
}

impl Display for Card<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let doctor = self.doctor;
        writeln!(f, "{:>3}. {}", self.index + 1, doctor.name)?;
        writeln!(f, "     {}", doctor.specialization)?;
        writeln!(
            f,
            "     {} YEARS • {}",
            doctor.experience_years, doctor.qualification
        )?;
        writeln!(f, "     {}", doctor.location)?;
        writeln!(f, "     {}", doctor.clinic_name)?;

        write!(f, "     ₹{}", doctor.fee_display)?;
        if !doctor.cashback_label.is_empty() {
            write!(f, "  [{}]", doctor.cashback_label)?;
        }
        writeln!(f)?;

        if let Some(availability) = doctor.availability.as_deref().filter(|s| !s.is_empty()) {
            writeln!(f, "     {availability}")?;
        }
        writeln!(
            f,
            "     {}",
            doctor
                .profile_image_url
                .as_deref()
                .unwrap_or(PLACEHOLDER_IMAGE_URL)
        )
    }
}

/// The doctor list as the listing page shows it: a loading line, the error in
/// place of an empty list, or the cards followed by their footer line.
pub struct Listing<'a>(pub &'a ResultSet);

impl Display for Listing<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let results = self.0;
        if results.is_loading_initial {
            return writeln!(f, "Loading doctors...");
        }

        if results.records.is_empty() {
            return match results.last_error.as_deref() {
                Some(err) => writeln!(f, "{err}"),
                None => writeln!(f, "No doctors found matching your criteria."),
            };
        }

        for (index, doctor) in results.records.iter().enumerate() {
            writeln!(f, "{}", Card { index, doctor })?;
        }

        if let Some(err) = results.last_error.as_deref() {
            writeln!(f, "{err}")?;
        } else if results.is_loading_more {
            writeln!(f, "Loading more doctors...")?;
        } else if results.exhausted {
            writeln!(f, "No more doctors to load.")?;
        }
        Ok(())
    }
}

struct FilterSummary<'a>(&'a FilterState);

impl Display for FilterSummary<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (dimension, value) in self.0.summary() {
            let shown = if value.is_empty() { "(any)" } else { value.as_str() };
            writeln!(f, "{:<11} {shown}", format!("{dimension}:"))?;
        }
        Ok(())
    }
}

struct OptionLists;

impl Display for OptionLists {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for dimension in FilterDimension::ALL {
            if dimension.is_text() {
                continue;
            }
            writeln!(f, "{dimension}: {}", dimension.options().join(" | "))?;
        }
        writeln!(f, "location (suggested): {}", SUGGESTED_LOCATIONS.join(" | "))
    }
}

pub fn render_card(index: usize, doctor: &DoctorRecord) -> String {
    Card { index, doctor }.to_string()
}

pub fn render_listing(results: &ResultSet) -> String {
    Listing(results).to_string()
}

pub fn render_filters(filters: &FilterState) -> String {
    FilterSummary(filters).to_string()
}

pub fn render_options() -> String {
    OptionLists.to_string()
}
