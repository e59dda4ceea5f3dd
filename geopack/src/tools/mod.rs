pub mod build;
pub mod inspect_style;
