pub mod editor;
pub mod media;
pub mod models;
pub mod validation;
