pub mod controls_panel;
pub mod detail_modal;
pub mod map_view;
