use super::lenient;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Employment categories offered on the profile form.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Unemployed,
    Student,
    BusinessOwner,
}

impl EmploymentStatus {
    /// Human readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Employed => "Employed",
            Self::SelfEmployed => "Self Employed",
            Self::Unemployed => "Unemployed",
            Self::Student => "Student",
            Self::BusinessOwner => "Business Owner",
        }
    }
}

/// Extended profile attributes attached to a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub employment_status: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub monthly_income: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::percent")]
    pub profile_completion_percentage: Option<u8>,
}

/// Number of profile fields counted towards completion.
pub const PROFILE_COMPLETION_FIELDS: usize = 8;

/// An authenticated account as reported by the API.
///
/// The server is authoritative; the copy held by the client may go stale until
/// the next profile fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Account identifier (a UUID on current backends, an integer on older ones).
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub id_number: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_verified: bool,
    #[serde(default, alias = "created_at")]
    pub date_joined: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

impl User {
    /// `first last`, trimmed; empty when neither name is known.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Name to greet the user by, falling back to the phone number.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = self.full_name();
        if name.is_empty() {
            self.phone_number.clone()
        } else {
            name
        }
    }

    /// Initials for the avatar badge.
    #[must_use]
    pub fn initials(&self) -> String {
        [&self.first_name, &self.last_name]
            .iter()
            .filter_map(|part| part.trim().chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Percentage of the tracked profile fields that are filled in, rounded.
    #[must_use]
    pub fn completion_percentage(&self) -> u8 {
        let profile = self.profile.clone().unwrap_or_default();
        let filled = [
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            Some(self.email.as_str()),
            Some(self.phone_number.as_str()),
            Some(self.id_number.as_str()),
            profile.date_of_birth.as_deref(),
            profile.employment_status.as_deref(),
            profile.occupation.as_deref(),
        ]
        .iter()
        .filter(|value| value.is_some_and(|text| !text.trim().is_empty()))
        .count();
        #[allow(clippy::cast_possible_truncation)]
        let percent = ((filled * 100 + PROFILE_COMPLETION_FIELDS / 2) / PROFILE_COMPLETION_FIELDS) as u8;
        percent
    }
}

/// Payload for `users/profile/update/`. Unset fields are omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<String>,
}

impl ProfileUpdate {
    pub const FIELDS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "email",
        "date_of_birth",
        "gender",
        "county",
        "town",
        "employment_status",
        "occupation",
        "monthly_income",
    ];

    /// Seeds an edit form from the current user.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        let profile = user.profile.clone().unwrap_or_default();
        Self {
            first_name: Some(user.first_name.clone()),
            last_name: Some(user.last_name.clone()),
            email: Some(user.email.clone()),
            date_of_birth: profile.date_of_birth,
            gender: profile.gender,
            county: profile.county,
            town: profile.town,
            employment_status: profile.employment_status,
            occupation: profile.occupation,
            monthly_income: profile.monthly_income.map(|income| income.to_string()),
        }
    }

    /// Drops blank strings so the backend keeps its stored values.
    #[must_use]
    pub fn without_blanks(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty())
        }
        Self {
            first_name: keep(self.first_name),
            last_name: keep(self.last_name),
            email: keep(self.email),
            date_of_birth: keep(self.date_of_birth),
            gender: keep(self.gender),
            county: keep(self.county),
            town: keep(self.town),
            employment_status: keep(self.employment_status),
            occupation: keep(self.occupation),
            monthly_income: keep(self.monthly_income),
        }
    }
}

/// Consent categories recorded through `users/consent/`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConsentType {
    MpesaAnalysis,
    DataSharing,
    Marketing,
}

/// Payload for `users/consent/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsentRequest {
    pub consent_type: ConsentType,
    pub consented: bool,
}
