use std::sync::Arc;

use crate::adapters::ProcessToolAdapter;
use crate::app::{
    batch_interactor::BatchInteractor, inspect_interactor::InspectInteractor,
    library_interactor::{LibraryInteractor, LibraryOptions},
};
use crate::domain::errors::DomainError;
use crate::ports::MediaToolPort;

pub trait AppContainer: Send + Sync {
    fn library_interactor(&self, options: LibraryOptions) -> LibraryInteractor;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
    fn batch_interactor(&self) -> Arc<BatchInteractor>;
}

pub struct DefaultAppContainer {
    tools: Arc<dyn MediaToolPort>,
    inspect_interactor: Arc<InspectInteractor>,
    batch_interactor: Arc<BatchInteractor>,
}

impl DefaultAppContainer {
    /// Wire the interactors to the process-backed media tools
    pub fn new() -> Result<Self, DomainError> {
        let tools = Arc::new(ProcessToolAdapter::new()?);
        Ok(Self::with_tools(tools))
    }

    pub fn with_tools(tools: Arc<dyn MediaToolPort>) -> Self {
        let inspect_interactor = Arc::new(InspectInteractor::new(Arc::clone(&tools)));
        let batch_interactor = Arc::new(BatchInteractor::new(Arc::clone(&tools)));
        Self {
            tools,
            inspect_interactor,
            batch_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn library_interactor(&self, options: LibraryOptions) -> LibraryInteractor {
        LibraryInteractor::new(Arc::clone(&self.tools), options)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }

    fn batch_interactor(&self) -> Arc<BatchInteractor> {
        Arc::clone(&self.batch_interactor)
    }
}
