//! Pure, synchronous derivation of display fields

mod catalog_card;
mod detail_view;
mod media;

pub use catalog_card::CatalogCard;
pub use detail_view::{
    Attribute, BACK_LABEL, DETAIL_TITLE, DetailScreen, DetailView, FailureView, LOADING_MESSAGE,
    RETRY_HINT,
};
pub use media::{extract_media_numbers, trailing_number};
