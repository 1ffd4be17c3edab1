/// Display-ready response shaping
///
/// Raw joined rows become flat, display-ready JSON here: formatted currency
/// strings, derived fields (property age, price per square foot), owner
/// display names, and map-marker titles that vary by search mode.

pub mod currency;
pub mod property_card;

pub use currency::format_currency;
pub use property_card::{
    price_per_sqft, property_age, shape_ownership, shape_property, shape_property_at,
    shape_transaction,
};
