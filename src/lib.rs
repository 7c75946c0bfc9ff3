//! REST backend for a restaurant review application.
//!
//! Restaurants (with their nested reviews) live in an Elasticsearch index,
//! uploaded photos in a directory on local disk. Callers authenticate with
//! bearer tokens issued by an external OpenID provider.

pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod helpers;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
