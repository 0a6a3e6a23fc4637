//! # Repository Module
//!
//! Repository implementations for database entities.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Repository Pattern                                  │
//! │                                                                         │
//! │  Caller ──► SchemeRepository ──► SQL ──► SQLite                         │
//! │                                                                         │
//! │  Each repository:                                                      │
//! │  • Owns the SQL for one aggregate                                      │
//! │  • Translates rows into aurum-core domain types                        │
//! │  • Returns DbResult for uniform error handling                         │
//! │  • Holds a cloned SqlitePool (cheap: pools are Arc internally)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod scheme;
