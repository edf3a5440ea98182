// Adapters layer: concrete implementations of the collaborators around the grid engine
// (sheet export rows, batch persistence, frame file transfer).

pub mod sheet;
pub mod store;
pub mod transfer;
