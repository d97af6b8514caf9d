// Entity Models
//
// Each entity has:
// - Identity that the owning store addresses it by
// - Values changed only through validating setters
// - A line form in the data files (see crate::codec)

pub mod car;
pub mod car_maker;

pub use car::{Car, Colours, COLOUR_SLOTS};
pub use car_maker::{CarMaker, ModelChoice, ANY_MODEL};
