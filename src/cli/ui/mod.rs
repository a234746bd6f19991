pub mod formatting;
pub mod header;
pub mod summary;
pub mod table_renderer;
