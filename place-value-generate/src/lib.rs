mod generate;

pub use generate::{
    distract,
    format_number,
    generate,
    generate_from_flags,
    round_to_significant,
};

#[allow(non_snake_case)]
pub mod Engine {
    pub use crate::generate::engine::*;
}

#[allow(non_snake_case)]
pub mod Model {
    pub use crate::generate::question::*;
}
