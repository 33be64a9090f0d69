pub mod model;

pub use model::{Coordinates, NewProperty, Property, PropertyPatch, VoteDirection};
