pub mod time;
pub mod coords;
pub mod ephemeris;
pub mod orbits;
