//! SWC neuron morphology format
//!
//! One node per line: `id type x y z radius parent`, space separated, with
//! integer id/type/parent columns and six-decimal float columns. A parent of
//! `-1` marks a root.

mod codec;
mod node;

pub use codec::{
    format_node, ids_are_sequential, load_swc, parse_swc, reconstruct_edges, save_swc,
    to_swc_string, write_swc, SwcError, SwcResult,
};
pub use node::{SwcNode, ROOT_PARENT};
