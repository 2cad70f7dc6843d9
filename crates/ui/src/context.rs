use std::sync::Arc;

use quiz_core::model::QuizId;
use services::AppServices;

use crate::platform::LinkOpenerRef;

pub trait UiApp: Send + Sync {
    fn services(&self) -> AppServices;
    fn link_opener(&self) -> LinkOpenerRef;
}

#[derive(Clone)]
pub struct AppContext {
    services: AppServices,
    link_opener: LinkOpenerRef,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            services: app.services(),
            link_opener: app.link_opener(),
        }
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.services.quiz_id()
    }

    #[must_use]
    pub fn services(&self) -> AppServices {
        self.services.clone()
    }

    #[must_use]
    pub fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.link_opener)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
