use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use tracing::{debug, info, warn};

use crate::error::ValidationError;
use crate::models::contact::ContactMap;
use crate::models::listing::{ListingCategory, ListingDraft, ListingPayload};

/// Times used when a draft carries a date but no time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDefaults {
    pub event_time: NaiveTime,
    pub travel_time: NaiveTime,
    pub other_time: NaiveTime,
}

impl Default for ListingDefaults {
    fn default() -> Self {
        Self {
            event_time: hour(19),
            travel_time: hour(9),
            other_time: hour(9),
        }
    }
}

fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap_or_default()
}

// Category specific part of the payload, merged in after the common fields
struct CategoryFields {
    event_type: String,
    event_date: String,
    location: String,
    venue: Option<String>,
    ticket_type: Option<String>,
    origin: Option<String>,
    destination: Option<String>,
    travel_date: Option<String>,
    transport_mode: Option<String>,
    item_type: Option<String>,
}

/// Validates listing drafts and assembles the payload sent to the marketplace API
#[derive(Debug, Clone, Default)]
pub struct ListingPayloadBuilder {
    defaults: ListingDefaults,
}

impl ListingPayloadBuilder {
    pub fn new(defaults: ListingDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ListingDefaults {
        &self.defaults
    }

    /// Validate `draft` and build its payload.
    ///
    /// Rules are checked in a fixed order and the first one broken is
    /// returned: title, price, quantity, category fields, then contacts.
    pub fn build(
        &self,
        draft: &ListingDraft,
        contacts: &ContactMap,
    ) -> Result<ListingPayload, ValidationError> {
        self.build_at(draft, contacts, Utc::now())
    }

    /// Same as [`build`](Self::build) with an explicit clock, used for
    /// `other` listings that carry no date.
    pub fn build_at(
        &self,
        draft: &ListingDraft,
        contacts: &ContactMap,
        now: DateTime<Utc>,
    ) -> Result<ListingPayload, ValidationError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(ValidationError::TitleRequired);
        }

        let price = parse_price(&draft.price).ok_or(ValidationError::InvalidPrice)?;
        let quantity_available =
            parse_quantity(&draft.quantity_available).ok_or(ValidationError::InvalidQuantity)?;

        let fields = match draft.category {
            ListingCategory::Event => self.event_fields(draft)?,
            ListingCategory::Travel => self.travel_fields(draft)?,
            ListingCategory::Other => self.other_fields(draft, now)?,
        };

        if contacts.is_empty() {
            return Err(ValidationError::ContactRequired);
        }

        let description = draft
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        info!(
            "Built {} listing payload '{}' with {} contact methods",
            draft.category,
            title,
            contacts.len()
        );

        Ok(ListingPayload {
            title: title.to_string(),
            price,
            category: draft.category,
            quantity_available,
            description,
            contact_info: contacts.clone(),
            event_type: fields.event_type,
            event_date: fields.event_date,
            location: fields.location,
            venue: fields.venue,
            ticket_type: fields.ticket_type,
            origin: fields.origin,
            destination: fields.destination,
            travel_date: fields.travel_date,
            transport_mode: fields.transport_mode,
            item_type: fields.item_type,
        })
    }

    fn event_fields(&self, draft: &ListingDraft) -> Result<CategoryFields, ValidationError> {
        let venue = required(&draft.venue, "venue")?;
        let location = required(&draft.location, "location")?;
        let date = required(&draft.event_date, "event date")?;
        let event_date = compose_instant(
            date,
            draft.event_time.as_deref(),
            self.defaults.event_time,
            ("event date", "event time"),
        )?;

        Ok(CategoryFields {
            event_type: draft.event_type.trim().to_string(),
            event_date,
            location: location.to_string(),
            venue: Some(venue.to_string()),
            ticket_type: Some(draft.ticket_type.trim().to_string()),
            origin: None,
            destination: None,
            travel_date: None,
            transport_mode: None,
            item_type: None,
        })
    }

    fn travel_fields(&self, draft: &ListingDraft) -> Result<CategoryFields, ValidationError> {
        let origin = required(&draft.origin, "origin")?;
        let destination = required(&draft.destination, "destination")?;
        let date = required(&draft.travel_date, "travel date")?;
        let travel_date = compose_instant(
            date,
            draft.travel_time.as_deref(),
            self.defaults.travel_time,
            ("travel date", "travel time"),
        )?;

        // Event-shaped mirror fields for consumers that only read event records
        Ok(CategoryFields {
            event_type: ListingCategory::Travel.as_str().to_string(),
            event_date: travel_date.clone(),
            location: destination.to_string(),
            venue: Some(format!("{} → {}", origin, destination)),
            ticket_type: None,
            origin: Some(origin.to_string()),
            destination: Some(destination.to_string()),
            travel_date: Some(travel_date),
            transport_mode: Some(draft.transport_mode.trim().to_string()),
            item_type: None,
        })
    }

    fn other_fields(
        &self,
        draft: &ListingDraft,
        now: DateTime<Utc>,
    ) -> Result<CategoryFields, ValidationError> {
        let location = required(&draft.location, "location")?;

        let date = draft.event_date.trim();
        let event_date = if date.is_empty() {
            debug!("No date collected for other listing, using current time");
            now.to_rfc3339_opts(SecondsFormat::Millis, true)
        } else {
            compose_instant(
                date,
                draft.event_time.as_deref(),
                self.defaults.other_time,
                ("event date", "event time"),
            )?
        };

        Ok(CategoryFields {
            event_type: ListingCategory::Other.as_str().to_string(),
            event_date,
            location: location.to_string(),
            venue: None,
            ticket_type: None,
            origin: None,
            destination: None,
            travel_date: None,
            transport_mode: None,
            item_type: Some(draft.item_type.trim().to_string()),
        })
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

/// Parse a form price: any finite number strictly above zero
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price > 0.0)
}

/// Parse a form quantity: a whole number strictly above zero
pub fn parse_quantity(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|quantity| *quantity > 0)
}

/// Combine a `YYYY-MM-DD` date and optional `HH:MM` time into a UTC instant
/// formatted like `2025-12-01T19:30:00.000Z`.
pub fn compose_instant(
    date: &str,
    time: Option<&str>,
    default_time: NaiveTime,
    (date_field, time_field): (&'static str, &'static str),
) -> Result<String, ValidationError> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|e| {
        warn!("Rejecting {} '{}': {}", date_field, date, e);
        ValidationError::InvalidField(date_field)
    })?;

    let time = match time.map(str::trim).filter(|t| !t.is_empty()) {
        Some(raw) => NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map_err(|e| {
                warn!("Rejecting {} '{}': {}", time_field, raw, e);
                ValidationError::InvalidField(time_field)
            })?,
        None => default_time,
    };

    Ok(date
        .and_time(time)
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Millis, true))
}
