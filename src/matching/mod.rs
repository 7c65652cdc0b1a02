pub mod edit_distance;
pub mod min_heap;

pub use edit_distance::edit_distance;
pub use min_heap::MinHeap;
