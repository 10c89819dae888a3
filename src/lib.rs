// Library for tests to access modules

pub mod config;
pub mod docker_repo;
pub mod error;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod sysinfo_repo;
pub mod timeline;
pub mod version;
pub mod worker;
