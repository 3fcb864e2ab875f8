//! Use case implementations.

mod resolve_dimensions_use_case;

pub use resolve_dimensions_use_case::ResolveDimensionsUseCase;
