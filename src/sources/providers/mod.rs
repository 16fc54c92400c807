// src/sources/providers/mod.rs
pub mod nws;
pub mod open_meteo;
pub mod rss;
pub mod ticketmaster;
pub mod tomtom;
pub mod yahoo;
