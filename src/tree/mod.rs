//! Box tree representation and tree walks

pub mod box_tree;
pub mod walk;

pub use box_tree::AreaId;
pub use box_tree::BoxArea;
pub use box_tree::Layout;
pub use box_tree::LayoutNode;
