//! Instance type sizing primitives
//!
//! - Parsing instance types into family and size
//! - The ordered size ladder with capacity multipliers
//! - Per-family minimum size floors

mod floor;
mod ladder;
mod parser;

pub use floor::{floor_for, is_burstable};
pub use ladder::{SizeTier, LADDER};
pub use parser::{base_family, parse, split_instance_type, InstanceType};
