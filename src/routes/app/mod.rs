pub mod dashboard_route;
pub mod export_route;
pub mod sheet_route;
pub mod upload_route;
