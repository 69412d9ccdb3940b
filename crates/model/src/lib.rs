pub mod household;
pub mod imputed;
pub mod leg;
pub mod person;
pub mod place;
pub mod purpose;
pub mod trip;

/// A traffic analysis zone code.
pub type ZoneId = u32;

/// The expansion factor that weights a surveyed unit to the population.
pub type ExpansionFactor = f64;
