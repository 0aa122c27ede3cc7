use std::sync::OnceLock;

use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const MIN_COURSE: u8 = 1;
pub const MAX_COURSE: u8 = 6;

/// Which of the two careers forms a submission came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationType {
    #[default]
    Applicant,
    Student,
}

impl ApplicationType {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationType::Applicant => "applicant",
            ApplicationType::Student => "student",
        }
    }
}

/// Raw field values as typed into either careers form.
///
/// Applicant-only and student-only fields live side by side; the submitted payload keeps only
/// those belonging to the chosen [`ApplicationType`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFields {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: Option<String>,
    pub portfolio_url: Option<String>,
    pub position: Option<String>,
    pub experience_years: Option<u32>,
    pub cover_letter: Option<String>,
    pub university: Option<String>,
    pub course: Option<u8>,
    pub specialty: Option<String>,
    pub direction: Option<String>,
    pub motivation_letter: Option<String>,
}

/// Body POSTed to the submission endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationPayload {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub application_type: ApplicationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(rename = "experience", skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motivation_letter: Option<String>,
}

/// Form-level constraint violations; nothing here is a business rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("field `{0}` is required")]
    MissingField(&'static str),
    #[error("'{0}' is not a valid e-mail address")]
    InvalidEmail(String),
    #[error("course must be between {MIN_COURSE} and {MAX_COURSE}, got {0}")]
    CourseOutOfRange(u8),
    #[error("'{0}' is not a valid http(s) link")]
    InvalidUrl(String),
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
        )
        .expect("e-mail pattern compiles")
    })
}

pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn optional_url(value: &Option<String>) -> Result<Option<String>, ValidationError> {
    let Some(raw) = optional(value) else {
        return Ok(None);
    };
    match Url::parse(&raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Some(raw)),
        _ => Err(ValidationError::InvalidUrl(raw)),
    }
}

impl ApplicationFields {
    /// Apply the form constraints and build the payload for `application_type`.
    pub fn validate(
        &self,
        application_type: ApplicationType,
    ) -> Result<ApplicationPayload, ValidationError> {
        let name = required(&self.name, "name")?;
        let surname = required(&self.surname, "surname")?;
        let email = required(&self.email, "email")?;
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail(email));
        }

        let mut payload = ApplicationPayload {
            name,
            surname,
            email,
            application_type,
            phone: optional(&self.phone),
            portfolio_url: optional_url(&self.portfolio_url)?,
            position: None,
            experience_years: None,
            cover_letter: None,
            university: None,
            course: None,
            specialty: None,
            direction: None,
            motivation_letter: None,
        };

        match application_type {
            ApplicationType::Applicant => {
                payload.position = optional(&self.position);
                payload.experience_years = self.experience_years;
                payload.cover_letter = optional(&self.cover_letter);
            }
            ApplicationType::Student => {
                if let Some(course) = self.course {
                    if !(MIN_COURSE..=MAX_COURSE).contains(&course) {
                        return Err(ValidationError::CourseOutOfRange(course));
                    }
                }
                payload.university = optional(&self.university);
                payload.course = self.course;
                payload.specialty = optional(&self.specialty);
                payload.direction = optional(&self.direction);
                payload.motivation_letter = optional(&self.motivation_letter);
            }
        }

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ivan() -> ApplicationFields {
        ApplicationFields {
            name: "Иван".to_string(),
            surname: "Иванов".to_string(),
            email: "ivan@example.com".to_string(),
            ..ApplicationFields::default()
        }
    }

    #[test]
    fn minimal_applicant_serializes_to_core_fields() {
        let payload = ivan()
            .validate(ApplicationType::Applicant)
            .expect("valid applicant");
        let value = serde_json::to_value(&payload).expect("serializes");
        assert_eq!(
            value,
            json!({
                "name": "Иван",
                "surname": "Иванов",
                "email": "ivan@example.com",
                "application_type": "applicant"
            })
        );
    }

    #[test]
    fn required_fields_are_trimmed_and_enforced() {
        let mut fields = ivan();
        fields.surname = "   ".to_string();
        assert_eq!(
            fields.validate(ApplicationType::Applicant),
            Err(ValidationError::MissingField("surname"))
        );

        let mut fields = ivan();
        fields.name = "  Иван ".to_string();
        let payload = fields
            .validate(ApplicationType::Student)
            .expect("whitespace trimmed");
        assert_eq!(payload.name, "Иван");
    }

    #[test]
    fn email_pattern_rejects_malformed_addresses() {
        for bad in ["ivan", "ivan@", "@example.com", "iv an@example.com", "ivan@-bad.com"] {
            let mut fields = ivan();
            fields.email = bad.to_string();
            assert!(
                matches!(
                    fields.validate(ApplicationType::Applicant),
                    Err(ValidationError::InvalidEmail(_))
                ),
                "{bad} should be rejected"
            );
        }
        assert!(is_valid_email("maria.petrova+hr@mail.example.ru"));
    }

    #[test]
    fn student_course_must_be_in_range() {
        let mut fields = ivan();
        fields.course = Some(7);
        assert_eq!(
            fields.validate(ApplicationType::Student),
            Err(ValidationError::CourseOutOfRange(7))
        );
        fields.course = Some(0);
        assert!(fields.validate(ApplicationType::Student).is_err());
        fields.course = Some(6);
        assert!(fields.validate(ApplicationType::Student).is_ok());
    }

    #[test]
    fn course_is_ignored_for_applicants() {
        let mut fields = ivan();
        fields.course = Some(9);
        let payload = fields
            .validate(ApplicationType::Applicant)
            .expect("student fields ignored");
        assert_eq!(payload.course, None);
    }

    #[test]
    fn payload_keeps_only_fields_of_the_chosen_form() {
        let mut fields = ivan();
        fields.phone = Some("+7 (999) 123-45-67".to_string());
        fields.position = Some("Frontend Developer".to_string());
        fields.experience_years = Some(3);
        fields.university = Some("МГУ".to_string());
        fields.motivation_letter = Some("  ".to_string());

        let applicant = fields
            .validate(ApplicationType::Applicant)
            .expect("applicant valid");
        assert_eq!(applicant.position.as_deref(), Some("Frontend Developer"));
        assert_eq!(applicant.experience_years, Some(3));
        assert_eq!(applicant.university, None);

        let student = fields.validate(ApplicationType::Student).expect("student valid");
        assert_eq!(student.university.as_deref(), Some("МГУ"));
        assert_eq!(student.position, None);
        assert_eq!(student.motivation_letter, None);
        assert_eq!(student.phone.as_deref(), Some("+7 (999) 123-45-67"));

        let value = serde_json::to_value(&applicant).expect("serializes");
        assert_eq!(value["experience"], json!(3));
    }

    #[test]
    fn portfolio_link_must_be_http() {
        let mut fields = ivan();
        fields.portfolio_url = Some("ftp://files.example.com".to_string());
        assert!(matches!(
            fields.validate(ApplicationType::Applicant),
            Err(ValidationError::InvalidUrl(_))
        ));
        fields.portfolio_url = Some("https://linkedin.com/in/ivan".to_string());
        assert!(fields.validate(ApplicationType::Applicant).is_ok());
    }
}
