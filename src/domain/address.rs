//! Decomposition of free-text address labels into structured fields.
//!
//! Geocoder labels for Vietnam follow
//! `"<number> <street>, <ward>, <district>, <city>, <country>"`. Labels with
//! fewer segments are accepted: missing positions are left empty.

use serde::Serialize;

use super::order::ShippingAddress;

pub const COUNTRY_CODE: &str = "VN";

/// Structured components a provider may return next to its label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressComponents {
    pub house_number: String,
    pub street: String,
    pub district: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedAddress {
    pub street_and_number: String,
    pub house_number: String,
    pub street: String,
    pub ward: String,
    pub district: String,
    pub city: String,
}

impl ParsedAddress {
    /// `"<street and number>, <ward>, <district>"`, skipping empty parts.
    pub fn street_line1(&self) -> String {
        [
            self.street_and_number.as_str(),
            self.ward.as_str(),
            self.district.as_str(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// Street, city and district are all known.
    pub fn is_deliverable(&self) -> bool {
        !self.street_and_number.is_empty() && !self.city.is_empty() && !self.district.is_empty()
    }

    /// Fills positions the label left empty from provider components. A
    /// provider house number and street replace the label's first segment.
    pub fn with_components(mut self, components: &AddressComponents) -> Self {
        if !components.house_number.is_empty() && !components.street.is_empty() {
            self.house_number = components.house_number.clone();
            self.street = components.street.clone();
            self.street_and_number = format!("{} {}", self.house_number, self.street);
        }
        if self.district.is_empty() {
            self.district = components.district.clone();
        }
        if self.city.is_empty() {
            self.city = components.city.clone();
        }
        if self.street_and_number.is_empty() && !self.street.is_empty() {
            self.street_and_number = self.street.clone();
        }
        self
    }
}

pub fn parse_label(label: &str) -> ParsedAddress {
    let mut segments = label.split(", ").map(str::trim);
    let street_and_number = segments.next().unwrap_or_default().to_string();
    let ward = segments.next().unwrap_or_default().to_string();
    let district = segments.next().unwrap_or_default().to_string();
    let city = segments.next().unwrap_or_default().to_string();
    let (house_number, street) = split_house_number(&street_and_number);

    ParsedAddress {
        street_and_number,
        house_number,
        street,
        ward,
        district,
        city,
    }
}

/// `"12 Nguyen Van A"` → `("12", "Nguyen Van A")`. Without a leading number
/// the whole segment is the street.
fn split_house_number(segment: &str) -> (String, String) {
    if let Some((head, tail)) = segment.split_once(char::is_whitespace) {
        let tail = tail.trim_start();
        if !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()) && !tail.is_empty() {
            return (head.to_string(), tail.to_string());
        }
    }
    (String::new(), segment.to_string())
}

/// Customer fields carried alongside a resolved address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub full_name: String,
    pub phone_number: String,
    pub company: String,
}

/// Address emitted by the resolution helper to the checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructuredAddress {
    pub label: String,
    pub parsed: ParsedAddress,
    pub contact: Contact,
}

/// Builds the backend address input: province mirrors city, postal code is
/// not collected, country is fixed.
pub fn shipping_address(parsed: &ParsedAddress, contact: &Contact) -> ShippingAddress {
    ShippingAddress {
        full_name: contact.full_name.clone(),
        phone_number: contact.phone_number.clone(),
        street_line1: parsed.street_line1(),
        street_line2: String::new(),
        city: parsed.city.clone(),
        province: parsed.city.clone(),
        postal_code: String::new(),
        country_code: COUNTRY_CODE.to_string(),
        company: contact.company.clone(),
    }
}
