//! Field-level validation for listing, account and booking records.
//!
//! Each check returns `Err(message)`; [`FieldErrors`] gathers them so a
//! request reports every failing field at once.

use std::sync::OnceLock;

use regex::Regex;

use crate::{
    dto::hotels::CreateHotelRequest,
    error::{AppError, AppResult, FieldError},
    models::Location,
};

#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.0.push(FieldError::new(field, message));
        }
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> AppResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationFailed(self.0))
        }
    }
}

pub fn validate_required(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{label} is required"));
    }
    Ok(())
}

pub fn validate_hotel_name(name: &str) -> Result<(), String> {
    validate_required(name, "Hotel name")?;

    static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = NAME_REGEX
        .get_or_init(|| Regex::new(r"^[A-Za-z\s]+$").expect("Failed to compile hotel name regex"));

    if !regex.is_match(name) {
        return Err("Name should only contain letters and spaces".to_string());
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    validate_required(email, "Email")?;

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Please fill a valid email address".to_string());
    }
    Ok(())
}

pub fn validate_phone_number(phone: &str) -> Result<(), String> {
    validate_required(phone, "Phone number")?;
    if phone.len() != 10 || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err("Phone number must be 10 digits".to_string());
    }
    Ok(())
}

pub fn validate_price(price: f64, label: &str) -> Result<(), String> {
    if !price.is_finite() {
        return Err(format!("{label} must be a number"));
    }
    if price < 0.0 {
        return Err(format!("{label} cannot be negative"));
    }
    Ok(())
}

pub fn validate_in_range(value: f64, min: f64, max: f64, label: &str) -> Result<(), String> {
    if !value.is_finite() || value < min || value > max {
        return Err(format!("{label} must be between {min} and {max}"));
    }
    Ok(())
}

fn validate_location(location: &Location, errors: &mut FieldErrors) {
    errors.check(
        "location.name",
        validate_required(&location.name, "Location name"),
    );
    errors.check(
        "location.address",
        validate_required(&location.address, "Address"),
    );
    errors.check(
        "location.latitude",
        validate_in_range(location.latitude, -90.0, 90.0, "Latitude"),
    );
    errors.check(
        "location.longitude",
        validate_in_range(location.longitude, -180.0, 180.0, "Longitude"),
    );
}

/// Validate a complete hotel record, as created or after a patch is merged.
pub fn validate_hotel(hotel: &CreateHotelRequest) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    errors.check("name", validate_hotel_name(&hotel.name));
    errors.check("base_price", validate_price(hotel.base_price, "Base price"));
    if hotel.number_of_rooms < 1 {
        errors.push("number_of_rooms", "Number of rooms must be at least 1");
    }
    validate_location(&hotel.location, &mut errors);
    if let Some(ratings) = hotel.ratings {
        errors.check("ratings", validate_in_range(ratings, 0.0, 5.0, "Ratings"));
    }
    errors.check(
        "property_type",
        validate_required(&hotel.property_type, "Property type"),
    );
    if hotel.images.is_empty() {
        errors.push("images", "At least one image is required");
    }
    errors.check("email", validate_email(&hotel.email));
    errors.check("phone_number", validate_phone_number(&hotel.phone_number));
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel() -> CreateHotelRequest {
        CreateHotelRequest {
            name: "Sea Breeze".into(),
            base_price: 150.0,
            number_of_rooms: 10,
            location: Location {
                name: "Lisbon".into(),
                address: "Rua Augusta 1".into(),
                latitude: 38.71,
                longitude: -9.14,
            },
            ratings: None,
            property_type: "Resort".into(),
            images: vec!["/uploads/a.jpg".into()],
            email: "front.desk@seabreeze.com".into(),
            description: None,
            phone_number: "0123456789".into(),
        }
    }

    #[test]
    fn accepts_a_well_formed_hotel() {
        assert!(validate_hotel(&hotel()).is_ok());
    }

    #[test]
    fn reports_every_failing_field() {
        let mut bad = hotel();
        bad.name = "Hotel 42".into();
        bad.number_of_rooms = 0;
        bad.location.latitude = 91.0;
        bad.ratings = Some(5.5);
        bad.images.clear();
        bad.phone_number = "12345".into();

        let Err(AppError::ValidationFailed(errors)) = validate_hotel(&bad) else {
            panic!("expected validation failure");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "name",
                "number_of_rooms",
                "location.latitude",
                "ratings",
                "images",
                "phone_number"
            ]
        );
    }

    #[test]
    fn phone_numbers_are_exactly_ten_digits() {
        assert!(validate_phone_number("0123456789").is_ok());
        assert!(validate_phone_number("012345678a").is_err());
        assert!(validate_phone_number("01234567890").is_err());
    }

    #[test]
    fn email_shape_is_checked() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("").is_err());
    }
}
