use std::sync::Mutex;

use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Bills,
    NewBill,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Bills => "#employee/bills",
            Route::NewBill => "#employee/bill/new",
        }
    }
}

/// Switches the displayed view. Side-effect only.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

impl<F> Navigator for F
where
    F: Fn(Route) + Send + Sync,
{
    fn navigate(&self, route: Route) {
        self(route)
    }
}

/// Navigator that keeps the visited routes. Navigating to the route that
/// is already displayed does nothing, so repeated navigations are harmless.
pub struct Router {
    initial: Route,
    history: Mutex<Vec<Route>>,
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            initial,
            history: Mutex::new(vec![initial]),
        }
    }

    pub fn current(&self) -> Route {
        let history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        history.last().copied().unwrap_or(self.initial)
    }

    pub fn history(&self) -> Vec<Route> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Navigator for Router {
    fn navigate(&self, route: Route) {
        let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        if history.last() == Some(&route) {
            debug!(path = route.path(), "already displayed");
            return;
        }
        info!(path = route.path(), "navigate");
        history.push(route);
    }
}
