pub mod controller;

pub use controller::{KitchenController, SessionReport};
