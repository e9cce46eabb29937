// Application layer - Use case interactors

pub mod batch_interactor;
pub mod container;
pub mod inspect_interactor;
pub mod library_interactor;

// Re-export interactors
pub use batch_interactor::BatchInteractor;
pub use inspect_interactor::InspectInteractor;
pub use library_interactor::{LibraryInteractor, LibraryOptions};
