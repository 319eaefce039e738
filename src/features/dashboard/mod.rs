//! Per-user storage dashboard.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/dashboard/storage` | Used bytes, quota, status and per-category usage |
//! | GET | `/api/dashboard/summary` | File counts, recent uploads and storage |
//! | GET | `/api/dashboard/cleanup` | Large and old files |
//! | GET | `/api/dashboard/export` | JSON backup of file metadata |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::DashboardService;
