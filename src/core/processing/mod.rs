pub mod background;
pub mod color;
pub mod pipeline;
pub mod resize;
pub mod sketch;
pub mod tensor;
