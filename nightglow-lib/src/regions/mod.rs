//! Coordinates and the query regions built from them
//!
//! A [`Region`] is the spatial filter handed to a remote reduction: either a disc of
//! a given radius around a [`Coordinate`], or a named national boundary. Regions are
//! cheap values, built per metric call and dropped afterwards.

mod coordinate;
mod region;

pub use coordinate::{Coordinate, EARTH_RADIUS_KM};
pub use region::Region;
