pub mod id_generator;

pub use id_generator::{CodeGenerator, RandomCodeGenerator};

#[cfg(test)]
pub use id_generator::MockCodeGenerator;
