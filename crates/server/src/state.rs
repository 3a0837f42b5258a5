//! State

use std::sync::Arc;

use spiel_app::context::AppContext;

use crate::graphql::{self, SpielSchema};

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) schema: SpielSchema,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext) -> Self {
        let schema = graphql::schema(app.games.clone(), app.identity.clone());

        Self { app, schema }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: AppContext) -> Arc<Self> {
        Arc::new(Self::new(app))
    }
}
