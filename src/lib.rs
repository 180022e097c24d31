pub mod alert_file_client;
pub mod check_service;
pub mod config_client;
pub mod error;
pub mod gitlab_client;
pub mod metrics_client;
pub mod model;
pub mod report_client;
pub mod wavefront_client;
