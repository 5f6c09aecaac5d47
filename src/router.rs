// Shell/Router - two static paths, one view each
//
// Leaving a route unmounts its view: the form is cleared and any request it
// still has in flight is dropped, so a late response cannot land on a view
// the user is no longer looking at.

use tracing::info;

use crate::views::{CreateAccountView, CustomerLookupView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    CreateCurrentAccount,
    GetCustomer,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::CreateCurrentAccount, Route::GetCustomer];

    pub fn path(&self) -> &'static str {
        match self {
            Route::CreateCurrentAccount => "/create-account/current",
            Route::GetCustomer => "/get-customer",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        Route::ALL.into_iter().find(|route| route.path() == trimmed)
    }

    /// Navigation label
    pub fn title(&self) -> &'static str {
        match self {
            Route::CreateCurrentAccount => "Create a Current Account",
            Route::GetCustomer => "Get a Customer by ID",
        }
    }

    /// Heading shown above the form
    pub fn heading(&self) -> &'static str {
        match self {
            Route::CreateCurrentAccount => "Create Current Account",
            Route::GetCustomer => "Get Customer by ID",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Route::CreateCurrentAccount => Route::GetCustomer,
            Route::GetCustomer => Route::CreateCurrentAccount,
        }
    }

    pub fn previous(&self) -> Self {
        // Two routes: previous and next coincide
        self.next()
    }
}

#[derive(Debug)]
pub struct Shell {
    route: Route,
    pub create_account: CreateAccountView,
    pub customer_lookup: CustomerLookupView,
}

impl Shell {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            create_account: CreateAccountView::new(),
            customer_lookup: CustomerLookupView::new(),
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }

        match self.route {
            Route::CreateCurrentAccount => self.create_account.reset(),
            Route::GetCustomer => self.customer_lookup.reset(),
        }

        info!(from = self.route.path(), to = route.path(), "navigating");
        self.route = route;
    }

    /// Returns false for paths that match no route; the current route is kept.
    pub fn navigate_path(&mut self, path: &str) -> bool {
        match Route::from_path(path) {
            Some(route) => {
                self.navigate(route);
                true
            }
            None => false,
        }
    }

    pub fn next_route(&mut self) {
        self.navigate(self.route.next());
    }

    pub fn previous_route(&mut self) {
        self.navigate(self.route.previous());
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(Route::CreateCurrentAccount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::{CreateAccountField, LookupField};

    #[test]
    fn test_paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(
            Route::from_path("/get-customer/"),
            Some(Route::GetCustomer)
        );
        assert_eq!(Route::from_path("/"), None);
        assert_eq!(Route::from_path("/create-account/savings"), None);
    }

    #[test]
    fn test_route_cycling() {
        assert_eq!(Route::CreateCurrentAccount.next(), Route::GetCustomer);
        assert_eq!(Route::GetCustomer.next(), Route::CreateCurrentAccount);
        assert_eq!(Route::GetCustomer.previous(), Route::CreateCurrentAccount);
    }

    #[test]
    fn test_navigation_unmounts_leaving_view() {
        let mut shell = Shell::new(Route::GetCustomer);
        shell.customer_lookup.on_change(LookupField::CustomerId, "7");
        let (ticket, _) = shell.customer_lookup.submit().unwrap();

        shell.navigate(Route::CreateCurrentAccount);

        assert_eq!(shell.route(), Route::CreateCurrentAccount);
        assert_eq!(shell.customer_lookup.value(LookupField::CustomerId), "");
        assert!(shell.customer_lookup.state().is_idle());
        assert!(!shell
            .customer_lookup
            .complete(ticket, Err(crate::error::ClientError::Status { status: 500, message: None })));
    }

    #[test]
    fn test_navigating_to_same_route_keeps_state() {
        let mut shell = Shell::default();
        shell
            .create_account
            .on_change(CreateAccountField::CustomerId, "42");

        shell.navigate(Route::CreateCurrentAccount);

        assert_eq!(shell.create_account.value(CreateAccountField::CustomerId), "42");
    }

    #[test]
    fn test_unknown_path_is_rejected() {
        let mut shell = Shell::default();
        assert!(!shell.navigate_path("/transfer"));
        assert_eq!(shell.route(), Route::CreateCurrentAccount);

        assert!(shell.navigate_path("/get-customer"));
        assert_eq!(shell.route(), Route::GetCustomer);
    }
}
