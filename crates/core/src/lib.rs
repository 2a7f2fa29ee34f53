//! Pricelist Core - Shared domain types.
//!
//! This crate provides the types shared by every Pricelist component:
//! - `storefront` - Reactive cart, search and catalog state
//! - `cli` - Command-line front end over the storefront state
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage, no HTTP clients.
//! Every type validates its input at construction (or deserialization), so
//! code holding a [`CartLine`] or [`Product`] never has to re-check it.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, variant labels,
//!   quantities, plus the [`Product`] and [`CartLine`] records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
