pub mod autocomplete;
pub mod logging;
