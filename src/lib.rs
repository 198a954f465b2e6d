extern crate alloc;

pub mod config;
mod constructors;
pub mod controllers;
pub mod entities;
pub mod images;
pub mod interactors;
pub mod mail;
pub mod notifier;
pub mod repositories;
pub mod usecases;
pub mod utils;

pub use constructors::*;
