//! Chart builders. Each is a pure function of the dataset (and, for the
//! importance bars, the model) returning a plotly figure description.

pub mod figure;
pub mod heatmap;
pub mod importance;
pub mod scatter;

pub use figure::Figure;
