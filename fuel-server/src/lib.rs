//! Fuel price finder server.
//!
//! A web application that answers: "where is the cheapest fuel near
//! me?" Stations come from a periodically refreshed price sheet, the
//! search origin from a postal code, place name or the device's
//! position.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod locator;
pub mod ranker;
pub mod web;
