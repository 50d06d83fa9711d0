//! Board representation and game-state types.
//!
//! Contains the variant map (provinces, adjacency, powers), units, orders,
//! and the per-game ledger of occupancy and supply-center control.

pub mod adjacency;
pub mod map;
pub mod order;
pub mod province;
pub mod state;
pub mod unit;
pub mod variant;

pub use adjacency::{AdjacencyEntry, AdjacencyIndex};
pub use map::Board;
pub use order::{Location, Order, OrderKind, OrderUnit};
pub use province::{Coast, PowerId, ProvinceId, ProvinceInfo, Terrain};
pub use state::{DislodgedUnit, Ledger, Phase, Season};
pub use unit::{Unit, UnitType};
pub use variant::{load_variant, VariantDef, VariantError};
