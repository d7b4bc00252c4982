/// Fixed board layout: laser slots, reserved cells and adjacency.
pub mod geometry;

/// Cells and the grid of cells holding the pieces.
pub mod grid;
