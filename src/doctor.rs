use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::CASHBACK_RATE;

/// Body of a doctor-search response. A body without `doctors` fails to decode.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub doctors: Vec<RawDoctor>,
}

/// One doctor as the API sends it. Missing or null fields decode to their
/// defaults so a single sparse record cannot fail the whole page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDoctor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub specialization: String,
    #[serde(default)]
    pub experience: Option<Experience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub qualification: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub clinic_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fees: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub doctor_of_the_hour: bool,
    #[serde(default)]
    pub available_time: Option<String>,
}

/// Years of experience, sent either as a number or as free text (`"5"`, `"10+"`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Experience {
    Years(f64),
    Text(String),
}

impl Experience {
    fn display(&self) -> String {
        match self {
            Experience::Years(years) => format_number(*years),
            Experience::Text(text) => text.trim().to_string(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorRecord {
    pub name: String,
    pub profile_image_url: Option<String>,
    pub specialization: String,
    pub experience_years: String,
    pub qualification: String,
    pub clinic_name: String,
    pub location: String,
    pub fee_display: String,
    /// Empty unless the doctor is featured as doctor of the hour.
    pub cashback_label: String,
    pub availability: Option<String>,
}

impl From<RawDoctor> for DoctorRecord {
    fn from(raw: RawDoctor) -> Self {
        let cashback_label = if raw.doctor_of_the_hour {
            format!("{} Cashback", round_half_up(raw.fees * CASHBACK_RATE))
        } else {
            String::new()
        };

        Self {
            name: raw.name,
            profile_image_url: raw
                .profile_image_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            specialization: raw.specialization,
            experience_years: raw
                .experience
                .as_ref()
                .map(Experience::display)
                .unwrap_or_default(),
            qualification: raw.qualification,
            clinic_name: raw.clinic_name,
            location: raw.location,
            fee_display: format_number(raw.fees),
            cashback_label,
            availability: raw.available_time,
        }
    }
}

/// Whole numbers render without a decimal point (`600`, not `600.0`).
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Rounds halves toward positive infinity (`89.5` -> `90`, `-0.5` -> `0`).
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(fees: f64, featured: bool) -> RawDoctor {
        RawDoctor {
            name: "Dr. Asha Rao".to_string(),
            profile_image_url: None,
            specialization: "General Physician".to_string(),
            experience: Some(Experience::Years(12.0)),
            qualification: "MBBS, MD".to_string(),
            clinic_name: "Apollo Clinic".to_string(),
            location: "Pune".to_string(),
            fees,
            doctor_of_the_hour: featured,
            available_time: Some("10:00 AM".to_string()),
        }
    }

    #[test]
    fn featured_doctor_gets_cashback_label() {
        let record = DoctorRecord::from(raw(600.0, true));
        assert_eq!(record.fee_display, "600");
        assert_eq!(record.cashback_label, "90 Cashback");
    }

    #[test]
    fn regular_doctor_has_empty_cashback() {
        let record = DoctorRecord::from(raw(600.0, false));
        assert_eq!(record.cashback_label, "");
        assert_eq!(record.experience_years, "12");
        assert_eq!(record.availability.as_deref(), Some("10:00 AM"));
    }

    #[test]
    fn cashback_rounds_half_up() {
        // 510 * 0.15 = 76.5
        assert_eq!(DoctorRecord::from(raw(510.0, true)).cashback_label, "77 Cashback");
        // 499 * 0.15 = 74.85
        assert_eq!(DoctorRecord::from(raw(499.0, true)).cashback_label, "75 Cashback");
    }

    #[test]
    fn fractional_fee_keeps_decimals() {
        assert_eq!(format_number(99.5), "99.5");
        assert_eq!(format_number(1000.0), "1000");
    }

    #[test]
    fn decodes_api_field_names() {
        let body = r#"{
            "doctors": [{
                "name": "Dr. Vikram Shah",
                "profileImageUrl": "",
                "specialization": "Dermatologist",
                "experience": 8,
                "qualification": "MBBS",
                "clinicName": "Skin Care Centre",
                "location": "Chicago",
                "fees": 750,
                "doctorOfTheHour": true,
                "availableTime": "Available in 15 minutes"
            }]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        let record = DoctorRecord::from(parsed.doctors[0].clone());
        assert_eq!(record.profile_image_url, None);
        assert_eq!(record.clinic_name, "Skin Care Centre");
        assert_eq!(record.fee_display, "750");
        assert_eq!(record.cashback_label, "113 Cashback");
    }

    #[test]
    fn sparse_record_decodes_with_defaults() {
        let body = r#"{
            "doctors": [
                {
                    "name": "Dr. Neha Kulkarni",
                    "profileImageUrl": null,
                    "specialization": null,
                    "experience": "5",
                    "qualification": null,
                    "clinicName": null,
                    "location": "Pune",
                    "fees": 400,
                    "doctorOfTheHour": null,
                    "availableTime": null
                },
                { "name": "Dr. Imran Khan", "experience": 7.5, "fees": 650, "doctorOfTheHour": true },
                { "name": null, "experience": null, "fees": null }
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        let records: Vec<DoctorRecord> = parsed.doctors.into_iter().map(DoctorRecord::from).collect();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].qualification, "");
        assert_eq!(records[0].specialization, "");
        assert_eq!(records[0].experience_years, "5");
        assert_eq!(records[0].cashback_label, "");

        assert_eq!(records[1].experience_years, "7.5");
        assert_eq!(records[1].cashback_label, "98 Cashback");

        assert_eq!(records[2].name, "");
        assert_eq!(records[2].experience_years, "");
        assert_eq!(records[2].fee_display, "0");
    }

    #[test]
    fn missing_doctors_array_fails_to_decode() {
        assert!(serde_json::from_str::<SearchResponse>(r#"{"items": []}"#).is_err());
        assert!(serde_json::from_str::<SearchResponse>(r#"{"doctors": null}"#).is_err());
    }
}
