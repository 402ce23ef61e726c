pub mod controller;
pub mod deck;
pub mod state;
pub mod timer;
