//! Client-side form validation.
//!
//! Each form validates to a [`FieldErrors`] map of field name to inline
//! message. A form that fails validation is never sent to the API.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Email;

/// Inline, per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for FieldErrors {}

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message per field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `Ok(())` when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    fn required(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "This field is required");
        }
    }

    fn email(&mut self, field: &'static str, value: &str) {
        if let Err(e) = Email::parse(value) {
            self.add(field, e.to_string());
        }
    }

    fn price(&mut self, field: &'static str, value: &str) {
        match Decimal::from_str(value.trim()) {
            Ok(amount) if amount > Decimal::ZERO => {}
            Ok(_) => self.add(field, "Price must be greater than zero"),
            Err(_) if value.trim().is_empty() => self.add(field, "This field is required"),
            Err(_) => self.add(field, "Price must be a number"),
        }
    }
}

/// A form that can be checked before submission.
pub trait Validate {
    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the inline messages for each failing field.
    fn validate(&self) -> Result<(), FieldErrors>;
}

/// An uploaded file (testimonial photo, blog cover, service image).
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Public contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
}

impl Validate for ContactForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.required("name", &self.name);
        errors.email("email", &self.email);
        errors.required("message", &self.message);
        errors.into_result()
    }
}

/// Ebook purchase request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EbookOrder {
    pub name: String,
    pub email: String,
    pub payment_type: String,
}

impl Validate for EbookOrder {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.required("name", &self.name);
        errors.email("email", &self.email);
        errors.required("payment_type", &self.payment_type);
        errors.into_result()
    }
}

/// Reservation contact details. Items come from the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`, 24-hour.
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Validate for ReservationForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.required("name", &self.name);
        errors.email("email", &self.email);
        errors.required("phone", &self.phone);
        if NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").is_err() {
            errors.add("date", "Choose a reservation date");
        }
        if NaiveTime::parse_from_str(self.time.trim(), "%H:%M").is_err() {
            errors.add("time", "Choose a reservation time");
        }
        errors.into_result()
    }
}

/// Dashboard login.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.email("email", &self.email);
        errors.required("password", &self.password);
        errors.into_result()
    }
}

/// Dashboard account registration.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl RegisterForm {
    /// Minimum password length accepted by the API.
    pub const MIN_PASSWORD_LENGTH: usize = 8;
}

impl Validate for RegisterForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.required("name", &self.name);
        errors.email("email", &self.email);
        if self.password.chars().count() < Self::MIN_PASSWORD_LENGTH {
            errors.add(
                "password",
                format!(
                    "Password must be at least {} characters",
                    Self::MIN_PASSWORD_LENGTH
                ),
            );
        }
        if self.password != self.password_confirmation {
            errors.add("password_confirmation", "Passwords do not match");
        }
        errors.into_result()
    }
}

/// Create or edit a testimonial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestimonialForm {
    pub name: String,
    pub message: String,
    pub rating: Option<u8>,
    pub image: Option<FileUpload>,
}

impl Validate for TestimonialForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.required("name", &self.name);
        errors.required("message", &self.message);
        if let Some(rating) = self.rating
            && !(1..=5).contains(&rating)
        {
            errors.add("rating", "Rating must be between 1 and 5");
        }
        errors.into_result()
    }
}

/// Create a blog post. The cover image is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogForm {
    pub title: String,
    pub short_description: String,
    pub body: String,
    pub cover_image: Option<FileUpload>,
}

impl Validate for BlogForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.required("title", &self.title);
        errors.required("short_description", &self.short_description);
        errors.required("body", &self.body);
        if self.cover_image.is_none() {
            errors.add("cover_image", "A cover image is required");
        }
        errors.into_result()
    }
}

/// Create or edit a service or package. `price` is the raw text input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogForm {
    pub title: String,
    pub description: String,
    pub price: String,
    /// Duration label for services; ignored for packages.
    pub duration: Option<String>,
    /// Bullet points for packages; ignored for services.
    pub features: Vec<String>,
    pub image: Option<FileUpload>,
}

impl Validate for CatalogForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.required("title", &self.title);
        errors.price("price", &self.price);
        errors.into_result()
    }
}

/// Admin edit of a contact message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactUpdate {
    pub is_read: bool,
}

impl Validate for ContactUpdate {
    fn validate(&self) -> Result<(), FieldErrors> {
        Ok(())
    }
}
