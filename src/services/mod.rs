pub mod card_mapper;
pub mod facet_service;
pub mod pagination;
pub mod sanitizer;

pub use card_mapper::get_data_for_card;
pub use facet_service::{facet_codes, process_filter_data, sort_range_by_index};
pub use pagination::{get_pager, Pager};
pub use sanitizer::{ResourceNameSanitizer, Sanitized};
