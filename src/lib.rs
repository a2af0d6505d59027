//! Group control screen for a Bluetooth Mesh provisioning/control application.
//!
//! [`controller::GroupControl`] groups the models of a [`network::MeshNetwork`] subscribed to one
//! group by Application Key and model type ([`grouping`]), serves them as grid data and turns taps
//! on the grid [`cells`] into access messages ([`models`]) sent through a
//! [`manager::MeshNetworkManager`].
//Might re-enable clippy::restriction later.
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::use_self,
    clippy::doc_markdown,
    clippy::module_name_repetitions
)]

#[macro_use]
extern crate slog;

pub mod access;
pub mod address;
pub mod cells;
pub mod config;
pub mod controller;
pub mod crypto;
pub mod grouping;
pub mod manager;
pub mod mesh;
pub mod models;
pub mod network;
pub mod random;
pub mod samples;
