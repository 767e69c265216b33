pub mod assistant_page;
pub mod dashboard_page;
pub mod health_page;
pub mod location_page;
pub mod map_component;
pub mod navigation_output;
pub mod sos_button;
pub mod status;
