mod affine;
mod splitter;

pub use affine::{affine, patient_position};
pub use splitter::{AxisSlice, AxisSplitter, SplitDescriptor, Splits};
