//! Database Macros System
//!
//! Query macros for SQLx with PostgreSQL. The macros work with any struct that
//! implements the `DatabaseResource` trait and take the pool explicitly.
//!
//! ## Overview
//!
//! - Table name generation (PascalCase to snake_case + pluralization)
//! - SQL type casting and parameter binding through `DatabaseValue`
//! - Timestamp management (created_at, updated_at, expires_at)
//! - UUID generation for IDs
//! - Conditional updates that act as compare-and-set
//!
//! ## Module Structure
//!
//! - `connection.rs` - Pool creation and migrations
//! - `traits.rs` - DatabaseResource trait definition
//! - `values.rs` - DatabaseValue enum for type-safe database values
//! - `clauses.rs` - SQL fragment builders shared by the macros
//! - `query_macros.rs` - Macros for finding and retrieving resources
//! - `insert_macros.rs` - Macros for creating new resources
//! - `update_macros.rs` - Macros for conditional updates
//! - `delete_macros.rs` - Macros for deleting resources
//!
//! ## Quick Start
//!
//! ```rust
//! let params = vec![("status", "Pending".into())];
//! let pending = find_all_resources_where_fields!(&pool, Resource, params).await?;
//!
//! let approved = update_resource_where_fields!(
//!     &pool,
//!     Resource,
//!     vec![("status", "Approved".into())],
//!     vec![("id", id.into()), ("status", "Pending".into())]
//! )
//! .await?;
//! ```

pub mod clauses;
pub mod connection;
pub mod delete_macros;
pub mod insert_macros;
pub mod query_macros;
pub mod traits;
pub mod update_macros;
pub mod values;
