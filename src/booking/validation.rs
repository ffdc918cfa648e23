use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::BookingForm;
use crate::domain::{LocationField, RideCatalog, RideTiming};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    PickupLocation,
    DropoffLocation,
    Ride,
    ScheduledDate,
    ScheduledTime,
}

impl From<LocationField> for FormField {
    fn from(field: LocationField) -> Self {
        match field {
            LocationField::Pickup => FormField::PickupLocation,
            LocationField::Dropoff => FormField::DropoffLocation,
        }
    }
}

/// Field-keyed validation messages. Empty means the form may be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<FormField, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Clears one field's message. Returns whether anything was removed.
    pub fn remove(&mut self, field: FormField) -> bool {
        self.0.remove(&field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Checks the form against the submission rules. Scheduled dates before `today` are rejected.
pub fn validate(form: &BookingForm, catalog: &RideCatalog, today: NaiveDate) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if form.pickup.trim().is_empty() {
        errors.insert(FormField::PickupLocation, "Pickup location is required");
    }
    if form.dropoff.trim().is_empty() {
        errors.insert(FormField::DropoffLocation, "Dropoff location is required");
    }
    if !form.ride_type.as_deref().is_some_and(|id| catalog.contains(id)) {
        errors.insert(FormField::Ride, "Please select a ride type");
    }

    if let RideTiming::Scheduled { date, time } = form.timing {
        match date {
            None => errors.insert(FormField::ScheduledDate, "Please select a date"),
            Some(date) if date < today => {
                errors.insert(FormField::ScheduledDate, "Scheduled date cannot be in the past")
            }
            Some(_) => {}
        }
        if time.is_none() {
            errors.insert(FormField::ScheduledTime, "Please select a time");
        }
    }

    errors
}
