pub mod command_list;
pub mod helpers;
pub mod image_menu;
