use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("unknown fruit tier {0}")]
    UnknownFruit(usize),
    #[error("degenerate boundary segment at ({x}, {y})")]
    DegenerateSegment { x: f32, y: f32 },
    #[error("invalid world parameter: {0}")]
    InvalidParams(&'static str),
    #[error("non-finite particle position")]
    NonFinitePosition,
}
