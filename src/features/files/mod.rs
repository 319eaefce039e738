//! File upload, browsing and management.
//!
//! File content is stored base64 encoded in the `files` table and handed to
//! clients as `data:` URLs. All operations are scoped to the session user.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/upload` | Upload a file (multipart field `file`) |
//! | GET | `/api/files` | List, search, filter and sort files |
//! | DELETE | `/api/files?id=` | Delete a file |
//! | GET | `/api/files/{id}` | Get a single file |
//! | GET | `/api/files/{id}/download` | Download raw content |
//! | PATCH | `/api/files/{id}/favorite` | Toggle favorite |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{FileRepository, PgFileRepository};
pub use routes::routes;
pub use services::FileService;
