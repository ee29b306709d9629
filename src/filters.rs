use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ListingError;

/// A closed list of checkbox options for one filter dimension.
///
/// Declaration order is display order, and the derived `Ord` keeps sets in that
/// order, so the joined query value does not depend on toggle history.
pub trait FilterOption: Copy + Ord + Sized + 'static {
    const ALL: &'static [Self];

    fn token(self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|opt| opt.token().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConsultMode {
    HospitalVisit,
    OnlineConsult,
}

impl FilterOption for ConsultMode {
    const ALL: &'static [Self] = &[ConsultMode::HospitalVisit, ConsultMode::OnlineConsult];

    fn token(self) -> &'static str {
        match self {
            ConsultMode::HospitalVisit => "Hospital Visit",
            ConsultMode::OnlineConsult => "Online Consult",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExperienceBucket {
    ZeroToFive,
    SixToTen,
    ElevenToSixteen,
    SixteenPlus,
}

impl FilterOption for ExperienceBucket {
    const ALL: &'static [Self] = &[
        ExperienceBucket::ZeroToFive,
        ExperienceBucket::SixToTen,
        ExperienceBucket::ElevenToSixteen,
        ExperienceBucket::SixteenPlus,
    ];

    fn token(self) -> &'static str {
        match self {
            ExperienceBucket::ZeroToFive => "0-5",
            ExperienceBucket::SixToTen => "6-10",
            ExperienceBucket::ElevenToSixteen => "11-16",
            ExperienceBucket::SixteenPlus => "16+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeeBucket {
    From100To500,
    From500To1000,
    Over1000,
}

impl FilterOption for FeeBucket {
    const ALL: &'static [Self] = &[
        FeeBucket::From100To500,
        FeeBucket::From500To1000,
        FeeBucket::Over1000,
    ];

    fn token(self) -> &'static str {
        match self {
            FeeBucket::From100To500 => "100-500",
            FeeBucket::From500To1000 => "500-1000",
            FeeBucket::Over1000 => "1000+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    English,
    Hindi,
    Telugu,
    Punjabi,
    Bengali,
    Marathi,
    Urdu,
    Gujarati,
    Tamil,
    Kannada,
    Oriya,
    Persian,
    Assamese,
}

impl FilterOption for Language {
    const ALL: &'static [Self] = &[
        Language::English,
        Language::Hindi,
        Language::Telugu,
        Language::Punjabi,
        Language::Bengali,
        Language::Marathi,
        Language::Urdu,
        Language::Gujarati,
        Language::Tamil,
        Language::Kannada,
        Language::Oriya,
        Language::Persian,
        Language::Assamese,
    ];

    fn token(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Telugu => "Telugu",
            Language::Punjabi => "Punjabi",
            Language::Bengali => "Bengali",
            Language::Marathi => "Marathi",
            Language::Urdu => "Urdu",
            Language::Gujarati => "Gujarati",
            Language::Tamil => "Tamil",
            Language::Kannada => "Kannada",
            Language::Oriya => "Oriya",
            Language::Persian => "Persian",
            Language::Assamese => "Assamese",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Facility {
    ApolloHospital,
    OtherClinics,
}

impl FilterOption for Facility {
    const ALL: &'static [Self] = &[Facility::ApolloHospital, Facility::OtherClinics];

    fn token(self) -> &'static str {
        match self {
            Facility::ApolloHospital => "Apollo Hospital",
            Facility::OtherClinics => "Other Clinics",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDimension {
    Location,
    Search,
    Mode,
    Experience,
    Fee,
    Language,
    Facility,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 7] = [
        FilterDimension::Location,
        FilterDimension::Search,
        FilterDimension::Mode,
        FilterDimension::Experience,
        FilterDimension::Fee,
        FilterDimension::Language,
        FilterDimension::Facility,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterDimension::Location => "location",
            FilterDimension::Search => "search",
            FilterDimension::Mode => "mode",
            FilterDimension::Experience => "experience",
            FilterDimension::Fee => "fee",
            FilterDimension::Language => "language",
            FilterDimension::Facility => "facility",
        }
    }

    pub fn is_text(self) -> bool {
        matches!(self, FilterDimension::Location | FilterDimension::Search)
    }

    /// Option tokens for checkbox dimensions; empty for free-text ones.
    pub fn options(self) -> Vec<&'static str> {
        match self {
            FilterDimension::Location | FilterDimension::Search => Vec::new(),
            FilterDimension::Mode => tokens::<ConsultMode>(),
            FilterDimension::Experience => tokens::<ExperienceBucket>(),
            FilterDimension::Fee => tokens::<FeeBucket>(),
            FilterDimension::Language => tokens::<Language>(),
            FilterDimension::Facility => tokens::<Facility>(),
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterDimension {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "location" => Ok(FilterDimension::Location),
            "search" | "specialization" => Ok(FilterDimension::Search),
            "mode" | "consult" => Ok(FilterDimension::Mode),
            "experience" => Ok(FilterDimension::Experience),
            "fee" | "fees" => Ok(FilterDimension::Fee),
            "language" => Ok(FilterDimension::Language),
            "facility" => Ok(FilterDimension::Facility),
            _ => Err(ListingError::InvalidFilterDimension(s.to_string())),
        }
    }
}

fn tokens<T: FilterOption>() -> Vec<&'static str> {
    T::ALL.iter().map(|opt| opt.token()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub location_text: String,
    pub search_text: String,
    pub consult_modes: BTreeSet<ConsultMode>,
    pub experience: BTreeSet<ExperienceBucket>,
    pub fees: BTreeSet<FeeBucket>,
    pub languages: BTreeSet<Language>,
    pub facilities: BTreeSet<Facility>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            location_text: String::new(),
            search_text: String::new(),
            consult_modes: ConsultMode::ALL.iter().copied().collect(),
            experience: BTreeSet::new(),
            fees: BTreeSet::new(),
            languages: BTreeSet::new(),
            facilities: BTreeSet::new(),
        }
    }
}

impl FilterState {
    /// Replaces the text of a free-text dimension or toggles a checkbox option.
    ///
    /// Nothing is mutated when the value is not a valid option.
    pub fn apply(&mut self, dimension: FilterDimension, value: &str) -> Result<(), ListingError> {
        match dimension {
            FilterDimension::Location => self.location_text = value.to_string(),
            FilterDimension::Search => self.search_text = value.to_string(),
            FilterDimension::Mode => toggle(&mut self.consult_modes, dimension, value)?,
            FilterDimension::Experience => toggle(&mut self.experience, dimension, value)?,
            FilterDimension::Fee => toggle(&mut self.fees, dimension, value)?,
            FilterDimension::Language => toggle(&mut self.languages, dimension, value)?,
            FilterDimension::Facility => toggle(&mut self.facilities, dimension, value)?,
        }
        Ok(())
    }

    /// Adds a checkbox option without toggling it off when already selected.
    pub fn select(&mut self, dimension: FilterDimension, value: &str) -> Result<(), ListingError> {
        if dimension.is_text() || !self.is_selected(dimension, value)? {
            self.apply(dimension, value)?;
        }
        Ok(())
    }

    pub fn is_selected(&self, dimension: FilterDimension, value: &str) -> Result<bool, ListingError> {
        Ok(match dimension {
            FilterDimension::Location => self.location_text == value,
            FilterDimension::Search => self.search_text == value,
            FilterDimension::Mode => self
                .consult_modes
                .contains(&parse_option::<ConsultMode>(dimension, value)?),
            FilterDimension::Experience => self
                .experience
                .contains(&parse_option::<ExperienceBucket>(dimension, value)?),
            FilterDimension::Fee => self
                .fees
                .contains(&parse_option::<FeeBucket>(dimension, value)?),
            FilterDimension::Language => self
                .languages
                .contains(&parse_option::<Language>(dimension, value)?),
            FilterDimension::Facility => self
                .facilities
                .contains(&parse_option::<Facility>(dimension, value)?),
        })
    }

    /// Builds the query for one page. Empty sets leave their parameter out entirely.
    pub fn to_query(&self, page: usize, size: usize) -> SearchQuery {
        SearchQuery {
            specialization: self.search_text.clone(),
            location: self.location_text.clone(),
            page,
            size,
            mode: join_tokens(&self.consult_modes),
            experience: join_tokens(&self.experience),
            fee: join_tokens(&self.fees),
            language: join_tokens(&self.languages),
            facility: join_tokens(&self.facilities),
        }
    }

    pub fn summary(&self) -> Vec<(FilterDimension, String)> {
        let query = self.to_query(0, 0);
        vec![
            (FilterDimension::Search, query.specialization),
            (FilterDimension::Location, query.location),
            (FilterDimension::Mode, query.mode.unwrap_or_default()),
            (FilterDimension::Experience, query.experience.unwrap_or_default()),
            (FilterDimension::Fee, query.fee.unwrap_or_default()),
            (FilterDimension::Language, query.language.unwrap_or_default()),
            (FilterDimension::Facility, query.facility.unwrap_or_default()),
        ]
    }
}

fn parse_option<T: FilterOption>(dimension: FilterDimension, value: &str) -> Result<T, ListingError> {
    T::parse(value).ok_or_else(|| ListingError::InvalidFilterValue {
        dimension: dimension.to_string(),
        value: value.to_string(),
    })
}

fn toggle<T: FilterOption>(
    set: &mut BTreeSet<T>,
    dimension: FilterDimension,
    value: &str,
) -> Result<(), ListingError> {
    let opt = parse_option::<T>(dimension, value)?;
    if !set.remove(&opt) {
        set.insert(opt);
    }
    Ok(())
}

fn join_tokens<T: FilterOption>(set: &BTreeSet<T>) -> Option<String> {
    if set.is_empty() {
        return None;
    }
    Some(
        set.iter()
            .map(|opt| opt.token())
            .collect::<Vec<_>>()
            .join(","),
    )
}

/// Query parameters for one doctor-search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub specialization: String,
    pub location: String,
    pub page: usize,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility: Option<String>,
}

impl SearchQuery {
    /// The parameter list in wire order.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut out = vec![
            ("specialization", self.specialization.clone()),
            ("location", self.location.clone()),
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ];
        let optional = [
            ("mode", &self.mode),
            ("experience", &self.experience),
            ("fee", &self.fee),
            ("language", &self.language),
            ("facility", &self.facility),
        ];
        for (name, value) in optional {
            if let Some(v) = value {
                out.push((name, v.clone()));
            }
        }
        out
    }
}
