// src/constants.rs
//! Domain constants that define the operational boundaries of the backfill.
//!
//! Each constant is named for the domain concept it constrains. Reading them
//! in order tells how a run proceeds: where history starts, how much one
//! request returns, when a window counts as stuck, and how far it may be split.

// ---------------------------------------------------------------------------
// Upstream search API boundaries
// ---------------------------------------------------------------------------

/// How many orders the search API returns per page.
///
/// A page shorter than this is the upstream's end-of-results signal.
pub const SEARCH_PAGE_SIZE: usize = 100;

/// Order status codes requested on every search.
pub const SEARCHED_ORDER_STATUSES: [i64; 4] = [1, 2, 3, 4];

/// Header that carries the API credential unless overridden.
pub const DEFAULT_AUTH_HEADER: &str = "X-Api-Key";

/// Per-request timeout in seconds for the search API.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Window ingestion
// ---------------------------------------------------------------------------

/// Consecutive full pages with zero new orders after which a window is stuck.
///
/// Three is enough to tell a reshuffled result set from a page that happened
/// to repeat a handful of boundary records.
pub const STUCK_PAGE_THRESHOLD: u32 = 3;

/// Maximum number of times a window may be halved.
///
/// Ten halvings of a calendar month leave windows of roughly 45 minutes.
pub const MAX_BISECTION_DEPTH: u32 = 10;

/// First instant of history covered when `--since` is not given.
pub const DEFAULT_HISTORY_START: &str = "2020-01-01";

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// SQLite database path used when `--database` is not given.
pub const DEFAULT_DATABASE_PATH: &str = "orders.db";

/// Order attribute normalized into the nullable `paid` column.
pub const PAID_ATTRIBUTE: &str = "paid";

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
