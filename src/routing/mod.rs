//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     (template, defaults)[]
//!     → pattern.rs (template → anchored regex)
//!     → router.rs (append to RouteTable, registration order kept)
//!     → Freeze behind Arc
//!
//! Incoming Request (raw query string)
//!     → query.rs (separate route path from query parameters)
//!     → router.rs (first matching entry)
//!     → casing.rs (controller/action → identifiers)
//!     → Return: ResolvedDispatch or NoRouteMatch
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same table and path always give the same result
//! - First match wins (registration order is the only priority)
//! - Broken patterns fail at registration, never at dispatch

pub mod casing;
pub mod pattern;
pub mod query;
pub mod router;

pub use pattern::{RouteError, RoutePattern};
pub use query::{decode_path, normalize_query};
pub use router::{NoRouteMatch, ResolvedDispatch, RouteTable, SelectorGroup, Variables};
