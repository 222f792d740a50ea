pub mod grid_view;
pub mod messages;
