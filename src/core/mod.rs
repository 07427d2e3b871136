/*!
 * Core Module
 * Shared helpers used across the storage layer
 */

pub mod serde;
