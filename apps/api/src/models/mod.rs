pub mod custom_block;
pub mod custom_field;
pub mod document;
pub mod items;
pub mod metadata;
pub mod section;
