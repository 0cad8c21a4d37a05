//! Bike Angels opportunity server.
//!
//! Reads a snapshot of bike-share stations and their Bike Angels points and
//! answers: "which single trip earns the most points per mile ridden?"

pub mod cache;
pub mod clock;
pub mod domain;
pub mod feed;
pub mod ranking;
pub mod web;
