//! Pricelist storefront library.
//!
//! Client-side state for a small price-list shop: the catalog fetched from
//! the price-list API, a debounced search that filters it, a persisted cart
//! keyed by product and scent, and the order message sent over WhatsApp.
//!
//! State flows through [`reactive::Subject`] holders; every module that
//! publishes changes does so synchronously to its subscribers.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod aroma;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod reactive;
pub mod search;
pub mod selection;
pub mod state;
pub mod storage;
