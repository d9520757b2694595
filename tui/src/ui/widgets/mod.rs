pub mod input_box;
pub mod popups;
pub mod search_select;
