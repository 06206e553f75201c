pub mod markdown_buffer;
pub mod media;
