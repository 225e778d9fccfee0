//! HTTP front end subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (axum::serve)
//!     → request.rs (request ID, tracing span)
//!     → cors.rs (CORS headers on every response, OPTIONS → 204)
//!     → server.rs routing
//!         POST /convert  → handlers::convert → bridge → response.rs
//!         GET/HEAD other → handlers::serve_static → static_files.rs
//!         anything else  → 404, empty body
//!     → Send to client
//! ```

pub mod cors;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;
pub mod static_files;

pub use handlers::CONVERT_PATH;
pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
pub use static_files::{StaticFile, StaticFiles};
