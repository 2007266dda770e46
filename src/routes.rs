//! Client-side route table
//!
//! Paths mirror the page names; role requirements are the ones the route
//! guard enforces before a page mounts.

use crate::models::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    AdminLogin,
    AdminRegister,
    ForgotPassword,
    ResetPassword(String),
    Home,
    StudentDashboard,
    AdminDashboard,
    Books,
    BookDetail(i64),
    BorrowReturn,
    Settings,
    Privacy,
    Terms,
    Users,
    UserDetail(i64),
    ValidateLoan,
}

const BOTH: &[Role] = &[Role::Admin, Role::Student];
const ADMIN: &[Role] = &[Role::Admin];
const STUDENT: &[Role] = &[Role::Student];

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".into(),
            Route::Register => "/register".into(),
            Route::AdminLogin => "/admin/login".into(),
            Route::AdminRegister => "/admin/register".into(),
            Route::ForgotPassword => "/forgot-password".into(),
            Route::ResetPassword(token) => {
                format!("/reset-password/{}", urlencoding::encode(token))
            }
            Route::Home => "/".into(),
            Route::StudentDashboard => "/dashboard".into(),
            Route::AdminDashboard => "/admin/dashboard".into(),
            Route::Books => "/books".into(),
            Route::BookDetail(id) => format!("/books/{}", id),
            Route::BorrowReturn => "/borrow-return".into(),
            Route::Settings => "/settings".into(),
            Route::Privacy => "/privacy".into(),
            Route::Terms => "/terms".into(),
            Route::Users => "/users".into(),
            Route::UserDetail(id) => format!("/users/{}", id),
            Route::ValidateLoan => "/admin/validate-loan".into(),
        }
    }

    /// Match a path against the table. Unknown paths give `None`; the caller
    /// sends those to the signed-in user's dashboard.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

        let route = match segments.as_slice() {
            [] | [""] => Route::Home,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["admin", "login"] => Route::AdminLogin,
            ["admin", "register"] => Route::AdminRegister,
            ["admin", "dashboard"] => Route::AdminDashboard,
            ["admin", "validate-loan"] => Route::ValidateLoan,
            ["forgot-password"] => Route::ForgotPassword,
            ["reset-password", token] if !token.is_empty() => {
                Route::ResetPassword(urlencoding::decode(token).ok()?.into_owned())
            }
            ["dashboard"] => Route::StudentDashboard,
            ["books"] => Route::Books,
            ["books", id] => Route::BookDetail(id.parse().ok()?),
            ["borrow-return"] => Route::BorrowReturn,
            ["settings"] => Route::Settings,
            ["privacy"] => Route::Privacy,
            ["terms"] => Route::Terms,
            ["users"] => Route::Users,
            ["users", id] => Route::UserDetail(id.parse().ok()?),
            _ => return None,
        };
        Some(route)
    }

    /// Roles allowed to open the page; `None` for public pages.
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Route::Login
            | Route::Register
            | Route::AdminLogin
            | Route::AdminRegister
            | Route::ForgotPassword
            | Route::ResetPassword(_) => None,
            Route::Home
            | Route::Books
            | Route::BookDetail(_)
            | Route::BorrowReturn
            | Route::Settings
            | Route::Privacy
            | Route::Terms => Some(BOTH),
            Route::StudentDashboard => Some(STUDENT),
            Route::AdminDashboard | Route::Users | Route::UserDetail(_) | Route::ValidateLoan => {
                Some(ADMIN)
            }
        }
    }

    pub fn dashboard_for(role: Role) -> Route {
        match role {
            Role::Admin => Route::AdminDashboard,
            Role::Student => Route::StudentDashboard,
        }
    }
}

/// Outcome of the route guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(Route),
}

/// Decide whether a visitor with `role` (None when signed out) may open `route`.
pub fn guard(route: &Route, role: Option<Role>) -> Access {
    let Some(allowed) = route.allowed_roles() else {
        return Access::Allow;
    };
    let Some(role) = role else {
        return Access::Redirect(Route::Login);
    };
    if *route == Route::Home || !allowed.contains(&role) {
        return Access::Redirect(Route::dashboard_for(role));
    }
    Access::Allow
}
