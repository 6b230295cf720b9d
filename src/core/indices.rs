use hashbrown::HashSet;

use crate::types::Plate;

/// Set of plates currently active in a slot or the waiting queue.
pub type PlateSet = HashSet<Plate>;
